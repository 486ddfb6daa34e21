// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Note CRUD operations.
//!
//! Notes are append-only rows ordered by rowid; deletion matches the note
//! text exactly (case-sensitive) and removes every row that matches.

use chrono::{DateTime, Utc};
use famulus_core::FamulusError;
use rusqlite::params;

use crate::database::Database;
use crate::models::NoteEntry;

/// All notes in creation order.
pub async fn list_notes(db: &Database) -> Result<Vec<NoteEntry>, FamulusError> {
    db.connection()
        .call(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, text, created_at FROM notes ORDER BY id ASC")?;
            let rows = stmt.query_map([], |row| {
                let raw: String = row.get(2)?;
                Ok(NoteEntry {
                    id: row.get(0)?,
                    text: row.get(1)?,
                    created_at: parse_created_at(2, &raw)?,
                })
            })?;
            let mut notes = Vec::new();
            for row in rows {
                notes.push(row?);
            }
            Ok(notes)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert a note and return it with its assigned id.
pub async fn create_note(db: &Database, text: &str) -> Result<NoteEntry, FamulusError> {
    let text = text.to_string();
    let now = Utc::now();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO notes (text, created_at) VALUES (?1, ?2)",
                params![text, now.to_rfc3339()],
            )?;
            Ok(NoteEntry {
                id: conn.last_insert_rowid(),
                text,
                created_at: now,
            })
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete every note whose text matches exactly. Returns the number deleted.
pub async fn delete_notes_by_text(db: &Database, text: &str) -> Result<u64, FamulusError> {
    let text = text.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.execute("DELETE FROM notes WHERE text = ?1", params![text])?;
            Ok(n as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

fn parse_created_at(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}
