// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;

use tokio_rusqlite::Connection;
use tracing::debug;

use famulus_core::FamulusError;

use crate::migrations;

/// Handle to the agent's SQLite database.
///
/// Owns a [`tokio_rusqlite::Connection`], which proxies all calls onto a
/// single background thread. Opening runs the embedded migrations.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (creating if necessary) the database at `path`, applies
    /// PRAGMAs and runs pending migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, FamulusError> {
        if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| FamulusError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = Connection::open(path).await.map_err(map_tr_err)?;

        conn.call(move |conn| -> Result<(), FamulusError> {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL").map_err(map_tr_err)?;
            }
            conn.pragma_update(None, "synchronous", "NORMAL").map_err(map_tr_err)?;
            conn.pragma_update(None, "foreign_keys", "ON").map_err(map_tr_err)?;
            conn.pragma_update(None, "busy_timeout", 5000).map_err(map_tr_err)?;
            migrations::run_migrations(conn)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The underlying connection handle.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Closes the background connection, flushing pending work.
    pub async fn close(&self) -> Result<(), FamulusError> {
        self.conn.clone().close().await.map_err(map_tr_err)
    }
}

/// Wrap a connection-level error into the workspace error type.
pub fn map_tr_err<E>(err: E) -> FamulusError
where
    E: std::error::Error + Send + Sync + 'static,
{
    FamulusError::Storage {
        source: Box::new(err),
    }
}
