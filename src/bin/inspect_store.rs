use anyhow::{Context, Result};
use clap::Parser;
use profit_horizon::{
    PriceStore, PricePoint, SqliteStorage, config::PERSISTENCE, utils::format_store_timestamp,
};
use std::path::PathBuf;
use tabled::{Table, Tabled, settings::Style};

/// Print the size and both ends of the stored price history.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct InspectArgs {
    /// SQLite file holding the price history
    #[arg(long, env = "PROFIT_HORIZON_DB_PATH", default_value = PERSISTENCE.store.db_path)]
    db_path: PathBuf,

    /// Rows shown from each end of the history
    #[arg(long, default_value_t = 5)]
    rows: u32,
}

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "timestamp")]
    timestamp: String,
    #[tabled(rename = "close")]
    close: String,
}

impl From<&PricePoint> for Row {
    fn from(p: &PricePoint) -> Self {
        Self {
            timestamp: format_store_timestamp(p.timestamp),
            close: format!("{:.2}", p.close),
        }
    }
}

fn print_rows(title: &str, rows: &[PricePoint]) {
    println!("{}", title);
    let mut table = Table::new(rows.iter().map(Row::from));
    table.with(Style::rounded());
    println!("{}", table);
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = InspectArgs::parse();

    let storage = SqliteStorage::open(&args.db_path)
        .await
        .with_context(|| format!("Failed to open price store at {}", args.db_path.display()))?;

    let count = storage.count().await?;
    println!("{}: {} rows", args.db_path.display(), count);
    if count == 0 {
        return Ok(());
    }

    print_rows("First rows", &storage.head(args.rows).await?);
    print_rows("Last rows", &storage.tail(args.rows).await?);
    Ok(())
}
