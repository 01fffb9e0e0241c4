use {
    crate::{
        config::PERSISTENCE,
        domain::PricePoint,
        utils::{format_store_timestamp, parse_store_timestamp},
    },
    anyhow::{Context, Result},
    async_trait::async_trait,
    sqlx::{
        ConnectOptions, Pool, QueryBuilder, Row, Sqlite,
        sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow,
            SqliteSynchronous,
        },
    },
    std::{path::Path, time::Duration},
};

#[cfg(debug_assertions)]
use crate::config::DF;

/// Durable (timestamp, close) table. One close per timestamp; duplicates are ignored, never overwritten.
#[async_trait]
pub trait PriceStore: Send + Sync {
    async fn initialize(&self) -> Result<()>;
    /// Returns the number of rows actually added.
    async fn insert(&self, points: &[PricePoint]) -> Result<u64>;
    /// All rows, ascending by timestamp.
    async fn read_all(&self) -> Result<Vec<PricePoint>>;
    async fn clear(&self) -> Result<u64>;
    async fn count(&self) -> Result<u64>;
    /// First `n` rows, ascending.
    async fn head(&self, n: u32) -> Result<Vec<PricePoint>>;
    /// Last `n` rows, ascending.
    async fn tail(&self, n: u32) -> Result<Vec<PricePoint>>;
}

pub struct SqliteStorage {
    pool: Pool<Sqlite>,
}

impl SqliteStorage {
    pub async fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();
        let connection_options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(PERSISTENCE.store.busy_timeout_secs))
            .synchronous(SqliteSynchronous::Normal)
            .log_slow_statements(log::LevelFilter::Warn, Duration::from_secs(10));

        let pool = SqlitePoolOptions::new()
            .max_connections(PERSISTENCE.store.max_connections)
            .connect_with(connection_options)
            .await
            .with_context(|| format!("Failed to open price store at {}", db_path.display()))?;

        Ok(Self { pool })
    }

    /// Opens and creates the table in one go.
    pub async fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let storage = Self::new(db_path).await?;
        storage.initialize().await?;
        Ok(storage)
    }

    fn decode(rows: &[SqliteRow]) -> Result<Vec<PricePoint>> {
        rows.iter()
            .map(|row| -> Result<PricePoint> {
                let ts: String = row.try_get("timestamp")?;
                let timestamp = parse_store_timestamp(&ts)
                    .with_context(|| format!("Malformed timestamp '{}' in price store", ts))?;
                Ok(PricePoint::new(timestamp, row.try_get("close")?))
            })
            .collect()
    }
}

#[async_trait]
impl PriceStore for SqliteStorage {
    async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS price_history (
                timestamp TEXT PRIMARY KEY,
                close REAL NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create price_history table")?;

        Ok(())
    }

    /// Batches points in chunks to stay within SQLite's bind parameter limit.
    async fn insert(&self, points: &[PricePoint]) -> Result<u64> {
        if points.is_empty() {
            return Ok(0);
        }

        let mut added = 0;
        let mut tx = self.pool.begin().await?;
        for chunk in points.chunks(PERSISTENCE.store.insert_chunk) {
            let mut query_builder =
                QueryBuilder::<Sqlite>::new("INSERT OR IGNORE INTO price_history (timestamp, close) ");

            query_builder.push_values(chunk, |mut b, p| {
                b.push_bind(format_store_timestamp(p.timestamp))
                    .push_bind(p.close);
            });

            added += query_builder
                .build()
                .execute(&mut *tx)
                .await
                .context("Batched insert into price_history failed")?
                .rows_affected();
        }
        tx.commit().await?;

        #[cfg(debug_assertions)]
        if DF.log_store_writes {
            log::info!("STORE: {} of {} points were new.", added, points.len());
        }

        Ok(added)
    }

    async fn read_all(&self) -> Result<Vec<PricePoint>> {
        let rows = sqlx::query(
            r#"
            SELECT timestamp, close
            FROM price_history
            ORDER BY timestamp ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Self::decode(&rows)
    }

    async fn clear(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM price_history")
            .execute(&self.pool)
            .await
            .context("Failed to clear price_history")?;
        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM price_history")
            .fetch_one(&self.pool)
            .await?;
        let n: i64 = row.try_get("n")?;
        Ok(n as u64)
    }

    async fn head(&self, n: u32) -> Result<Vec<PricePoint>> {
        let rows = sqlx::query(
            r#"
            SELECT timestamp, close
            FROM price_history
            ORDER BY timestamp ASC
            LIMIT ?
            "#,
        )
        .bind(n as i64)
        .fetch_all(&self.pool)
        .await?;

        Self::decode(&rows)
    }

    async fn tail(&self, n: u32) -> Result<Vec<PricePoint>> {
        let rows = sqlx::query(
            r#"
            SELECT timestamp, close FROM (
                SELECT timestamp, close
                FROM price_history
                ORDER BY timestamp DESC
                LIMIT ?
            )
            ORDER BY timestamp ASC
            "#,
        )
        .bind(n as i64)
        .fetch_all(&self.pool)
        .await?;

        Self::decode(&rows)
    }
}
