// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StoreAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use famulus_config::model::StorageConfig;
use famulus_core::types::{MeetLink, NoteEntry};
use famulus_core::{AdapterType, FamulusError, HealthStatus, PluginAdapter, StoreAdapter};

use crate::database::Database;
use crate::queries;

/// SQLite-backed store adapter.
///
/// Wraps a [`Database`] handle and delegates all collection operations to
/// the typed query modules. The database is lazily opened on the first
/// call to [`StoreAdapter::initialize`].
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`] is called.
    ///
    /// [`initialize`]: StoreAdapter::initialize
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, FamulusError> {
        self.db.get().ok_or_else(|| FamulusError::Storage {
            source: "store not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, FamulusError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), FamulusError> {
        // Checkpoint if the DB was initialized; safe to call repeatedly.
        if let Some(db) = self.db.get() {
            db.connection()
                .call(|conn| -> Result<(), rusqlite::Error> {
                    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                    Ok(())
                })
                .await
                .map_err(crate::database::map_tr_err)?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StoreAdapter for SqliteStore {
    async fn initialize(&self) -> Result<(), FamulusError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| FamulusError::Storage {
            source: "store already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), FamulusError> {
        let db = self.db()?;
        // Checkpoint WAL before close.
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        db.close().await?;
        debug!("store closed");
        Ok(())
    }

    // --- session credential ---

    async fn load_credential(&self) -> Result<Option<Vec<u8>>, FamulusError> {
        queries::credential::load_credential(self.db()?).await
    }

    async fn save_credential(&self, blob: &[u8]) -> Result<(), FamulusError> {
        queries::credential::save_credential(self.db()?, blob).await
    }

    // --- notes ---

    async fn list_notes(&self) -> Result<Vec<NoteEntry>, FamulusError> {
        queries::notes::list_notes(self.db()?).await
    }

    async fn create_note(&self, text: &str) -> Result<NoteEntry, FamulusError> {
        queries::notes::create_note(self.db()?, text).await
    }

    async fn delete_notes_by_text(&self, text: &str) -> Result<u64, FamulusError> {
        queries::notes::delete_notes_by_text(self.db()?, text).await
    }

    // --- singleton list ---

    async fn get_list(&self) -> Result<Option<Vec<String>>, FamulusError> {
        queries::list::get_list(self.db()?).await
    }

    async fn put_list(&self, items: &[String]) -> Result<(), FamulusError> {
        queries::list::put_list(self.db()?, items).await
    }

    async fn delete_list(&self) -> Result<bool, FamulusError> {
        queries::list::delete_list(self.db()?).await
    }

    // --- meeting links ---

    async fn get_link(&self, subject: &str) -> Result<Option<MeetLink>, FamulusError> {
        queries::links::get_link(self.db()?, subject).await
    }

    async fn upsert_link(&self, subject: &str, link: &str) -> Result<(), FamulusError> {
        queries::links::upsert_link(self.db()?, subject, link).await
    }
}
