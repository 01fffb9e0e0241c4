use {
    anyhow::{Context, Result},
    clap::Parser,
    profit_horizon::{AppConfig, AppContext, BinanceProvider, Cli, SqliteStorage, router},
    std::{panic, sync::Arc},
};

#[tokio::main]
async fn main() -> Result<()> {
    panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        log::error!("CRITICAL PANIC:\n{}\nStack Trace:\n{}", info, backtrace);
    }));

    let (global_level, my_code_level) = if cfg!(debug_assertions) {
        (log::LevelFilter::Warn, log::LevelFilter::Info)
    } else {
        (log::LevelFilter::Error, log::LevelFilter::Error)
    };

    let mut builder = env_logger::Builder::new();

    builder
        .filter(None, global_level)
        .filter(Some("profit_horizon"), my_code_level)
        .parse_default_env()
        .init();

    let args = Cli::parse();
    let config = AppConfig::from_cli(&args);

    let store = SqliteStorage::open(&config.db_path)
        .await
        .with_context(|| format!("Failed to open price store at {}", config.db_path.display()))?;
    let provider = BinanceProvider::new().context("Failed to configure Binance client")?;

    let addr = config.socket_addr();
    let ctx = AppContext::new(config, Arc::new(store), Arc::new(provider));
    let app = router(ctx);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    log::info!("Profit horizon service listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server stopped unexpectedly")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received, stopping.");
}
