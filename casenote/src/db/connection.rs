use libsql::{Builder, Connection};

use crate::config::DatabaseConfig;
use crate::error::Result;

use super::schema;

/// Handle to the SQLite database.
///
/// Every `connect()` hands out a clone of one shared connection. libsql
/// gives each fresh connection on a `:memory:` database its own private
/// store, and PRAGMAs are per-connection, so the schema and settings
/// applied here must stay on the connection callers actually use.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let busy_timeout_ms = std::env::var("DATABASE_BUSY_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(5000);

        let db = if config.url == ":memory:" {
            Builder::new_local(":memory:").build().await?
        } else {
            let path = config.url.strip_prefix("file:").unwrap_or(&config.url);
            Builder::new_local(path).build().await?
        };

        let conn = db.connect()?;
        configure_connection(&conn, busy_timeout_ms).await?;
        schema::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// In-memory database for tests.
    pub async fn in_memory() -> Result<Self> {
        Self::new(&DatabaseConfig {
            url: ":memory:".to_string(),
        })
        .await
    }

    pub fn connect(&self) -> Result<Connection> {
        Ok(self.conn.clone())
    }
}

async fn configure_connection(conn: &Connection, busy_timeout_ms: u64) -> Result<()> {
    let busy_timeout_sql = format!("PRAGMA busy_timeout = {busy_timeout_ms}");
    if let Err(error) = conn.execute_batch(&busy_timeout_sql).await {
        tracing::warn!(
            busy_timeout_ms,
            error = %error,
            "Failed to set SQLite busy_timeout"
        );
    }

    // Cascade deletes from cases to notes/interactions depend on this.
    conn.execute_batch("PRAGMA foreign_keys = ON").await?;

    Ok(())
}
