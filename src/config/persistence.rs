//! File persistence configuration

/// Configuration for the price table
pub struct PriceStoreConfig {
    /// SQLite database file
    pub db_path: &'static str,
    /// Rows per batched insert. Two binds per row keeps us far below SQLite's 32k limit.
    pub insert_chunk: usize,
    pub max_connections: u32,
    pub busy_timeout_secs: u64,
}

/// Configuration for the trained model artifact
pub struct ModelPersistenceConfig {
    /// Path of the serialized model (overwritten on every training run)
    pub model_path: &'static str,
    /// Bumped whenever the serialized layout of the model changes
    pub format_version: u32,
}

/// The Master Persistence Configuration
pub struct PersistenceConfig {
    pub store: PriceStoreConfig,
    pub model: ModelPersistenceConfig,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    store: PriceStoreConfig {
        db_path: "price_history.sqlite",
        insert_chunk: 3000,
        max_connections: 5,
        busy_timeout_secs: 60,
    },
    model: ModelPersistenceConfig {
        model_path: "forecast_model.bin",
        format_version: 1,
    },
};
