//! Database connection manager backed by an r2d2 SQLite pool.

use std::path::{Path, PathBuf};

use play_domain::{PlayError, Result};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use tracing::info;

use crate::errors::InfraError;

pub type SqliteConnection = PooledConnection<SqliteConnectionManager>;

/// Database manager that owns the connection pool.
pub struct DbManager {
    pool: Pool<SqliteConnectionManager>,
    path: PathBuf,
}

impl DbManager {
    /// Open (or create) the database at `db_path` with up to `pool_size`
    /// connections.
    pub fn new<P: AsRef<Path>>(db_path: P, pool_size: u32) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();

        let manager = SqliteConnectionManager::file(&path).with_init(|conn| {
            conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA busy_timeout = 5000;")
        });

        let pool = Pool::builder()
            .max_size(pool_size.max(1))
            .build(manager)
            .map_err(|e| PlayError::from(InfraError::from(e)))?;

        info!(
            db_path = %path.display(),
            max_connections = pool.max_size(),
            "sqlite pool initialised"
        );

        Ok(Self { pool, path })
    }

    /// Acquire a connection from the pool.
    pub fn get_connection(&self) -> Result<SqliteConnection> {
        self.pool.get().map_err(|e| PlayError::from(InfraError::from(e)))
    }

    /// Create the table backing `collection` if it does not exist.
    pub fn ensure_collection(&self, collection: &str) -> Result<()> {
        let table = table_name(collection)?;
        let conn = self.get_connection()?;
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id TEXT PRIMARY KEY NOT NULL,
                document TEXT NOT NULL,
                seq INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS {index} ON {table} (seq);",
            index = format!("\"idx_{collection}_seq\""),
        ))
        .map_err(map_sql_error)
    }

    /// Return the configured database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Perform a health check to verify database connectivity.
    pub fn health_check(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.query_row("SELECT 1", params![], |row| row.get::<_, i32>(0))
            .map_err(map_sql_error)?;
        Ok(())
    }
}

/// Quoted table name for a collection.
///
/// Collection names are restricted to ASCII alphanumerics and `_` so they can
/// be interpolated into DDL.
pub(crate) fn table_name(collection: &str) -> Result<String> {
    let valid = !collection.is_empty()
        && collection.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(PlayError::Config(format!("invalid collection name '{collection}'")));
    }
    Ok(format!("\"{collection}\""))
}

pub(crate) fn map_sql_error(err: rusqlite::Error) -> PlayError {
    PlayError::from(InfraError::from(err))
}
