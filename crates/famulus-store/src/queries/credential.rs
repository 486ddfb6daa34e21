// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport credential singleton.
//!
//! A single row (id = 1) holds the opaque blob the channel transport hands
//! back after pairing. Saving always overwrites; there is never more than
//! one credential.

use chrono::Utc;
use famulus_core::FamulusError;
use rusqlite::{OptionalExtension, params};

use crate::database::Database;

/// Load the persisted reconnection credential, if one has been saved.
pub async fn load_credential(db: &Database) -> Result<Option<Vec<u8>>, FamulusError> {
    db.connection()
        .call(|conn| -> Result<Option<Vec<u8>>, rusqlite::Error> {
            let blob = conn
                .query_row(
                    "SELECT blob FROM session_credential WHERE id = 1",
                    [],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(blob)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Upsert the reconnection credential: create-if-absent, overwrite-if-present.
pub async fn save_credential(db: &Database, blob: &[u8]) -> Result<(), FamulusError> {
    let blob = blob.to_vec();
    let now = Utc::now().to_rfc3339();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO session_credential (id, blob, updated_at) VALUES (1, ?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET
                     blob = excluded.blob,
                     updated_at = excluded.updated_at",
                params![blob, now],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
