//! SQLite document backend.
//!
//! One table per collection: `(id TEXT PRIMARY KEY, document TEXT, seq
//! INTEGER)`. `seq` preserves insertion order. All statements run on the
//! blocking pool.

use std::sync::Arc;

use async_trait::async_trait;
use play_domain::{PlayError, Result};
use rusqlite::{params, OptionalExtension};

use super::document::{DocumentBackend, StoredDocument};
use super::manager::{map_sql_error, table_name, DbManager};
use crate::errors::conversions::is_unique_violation;
use crate::errors::InfraError;

/// Document backend persisting collections in SQLite.
pub struct SqliteBackend {
    db: Arc<DbManager>,
}

impl SqliteBackend {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    pub fn manager(&self) -> &Arc<DbManager> {
        &self.db
    }

    async fn blocking<R, F>(&self, work: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&DbManager) -> Result<R> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || work(&db))
            .await
            .map_err(|e| PlayError::from(InfraError::from(e)))?
    }
}

#[async_trait]
impl DocumentBackend for SqliteBackend {
    fn kind(&self) -> &'static str {
        "sqlite"
    }

    async fn ensure_collection(&self, collection: &str) -> Result<()> {
        let collection = collection.to_string();
        self.blocking(move |db| db.ensure_collection(&collection)).await
    }

    async fn load_all(&self, collection: &str) -> Result<Vec<StoredDocument>> {
        let table = table_name(collection)?;
        self.blocking(move |db| {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!("SELECT id, document FROM {table} ORDER BY seq"))
                .map_err(map_sql_error)?;
            let documents = stmt
                .query_map(params![], |row| {
                    Ok(StoredDocument { key: row.get(0)?, body: row.get(1)? })
                })
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            Ok(documents)
        })
        .await
    }

    async fn load(&self, collection: &str, key: &str) -> Result<Option<StoredDocument>> {
        let table = table_name(collection)?;
        let key = key.to_string();
        self.blocking(move |db| {
            let conn = db.get_connection()?;
            let body: Option<String> = conn
                .query_row(&format!("SELECT document FROM {table} WHERE id = ?1"), params![key], |row| {
                    row.get(0)
                })
                .optional()
                .map_err(map_sql_error)?;
            Ok(body.map(|body| StoredDocument { key, body }))
        })
        .await
    }

    async fn insert(&self, collection: &str, document: StoredDocument) -> Result<()> {
        let table = table_name(collection)?;
        let collection = collection.to_string();
        self.blocking(move |db| {
            let conn = db.get_connection()?;
            conn.execute(
                &format!(
                    "INSERT INTO {table} (id, document, seq)
                     VALUES (?1, ?2, (SELECT COALESCE(MAX(seq), 0) + 1 FROM {table}))"
                ),
                params![document.key, document.body],
            )
            .map_err(|err| {
                if is_unique_violation(&err) {
                    PlayError::Persistence(format!(
                        "duplicate key '{}' in collection '{collection}'",
                        document.key
                    ))
                } else {
                    map_sql_error(err)
                }
            })?;
            Ok(())
        })
        .await
    }

    async fn replace(&self, collection: &str, key: &str, body: String) -> Result<bool> {
        let table = table_name(collection)?;
        let key = key.to_string();
        self.blocking(move |db| {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(&format!("UPDATE {table} SET document = ?2 WHERE id = ?1"), params![
                    key, body
                ])
                .map_err(map_sql_error)?;
            Ok(changed > 0)
        })
        .await
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<bool> {
        let table = table_name(collection)?;
        let key = key.to_string();
        self.blocking(move |db| {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(&format!("DELETE FROM {table} WHERE id = ?1"), params![key])
                .map_err(map_sql_error)?;
            Ok(changed > 0)
        })
        .await
    }

    async fn health_check(&self) -> Result<()> {
        self.blocking(|db| db.health_check()).await
    }
}
