use std::path::PathBuf;

use crate::{
    Cli,
    config::{ModelSettings, PERSISTENCE, SERVICE},
};

/// Runtime configuration. Built once in `main` and threaded through the service,
/// so nothing below the service layer reads file paths from globals.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub model_path: PathBuf,
    pub bind: String,
    pub port: u16,
    pub distinct_status_codes: bool,
    pub model: ModelSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(PERSISTENCE.store.db_path),
            model_path: PathBuf::from(PERSISTENCE.model.model_path),
            bind: SERVICE.bind.to_string(),
            port: SERVICE.port,
            distinct_status_codes: SERVICE.distinct_status_codes,
            model: ModelSettings::default(),
        }
    }
}

impl AppConfig {
    pub fn from_cli(args: &Cli) -> Self {
        let defaults = Self::default();
        Self {
            db_path: args.db_path.clone().unwrap_or(defaults.db_path),
            model_path: args.model_path.clone().unwrap_or(defaults.model_path),
            bind: args.bind.clone().unwrap_or(defaults.bind),
            port: args.port.unwrap_or(defaults.port),
            distinct_status_codes: args.distinct_status_codes,
            model: defaults.model,
        }
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
