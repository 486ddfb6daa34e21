// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Meeting links keyed by subject.
//!
//! Subjects are stored lowercased so that lookups match case-insensitively.

use chrono::Utc;
use famulus_core::FamulusError;
use rusqlite::{OptionalExtension, params};

use crate::database::Database;
use crate::models::MeetLink;

/// Look up a meeting link by subject, matching case-insensitively.
pub async fn get_link(db: &Database, subject: &str) -> Result<Option<MeetLink>, FamulusError> {
    let subject = subject.to_string();
    db.connection()
        .call(move |conn| {
            let link = conn
                .query_row(
                    "SELECT subject, link FROM meet_links WHERE subject = lower(?1)",
                    params![subject],
                    |row| {
                        Ok(MeetLink {
                            subject: row.get(0)?,
                            link: row.get(1)?,
                        })
                    },
                )
                .optional()?;
            Ok(link)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Create or replace the meeting link for a subject.
pub async fn upsert_link(db: &Database, subject: &str, link: &str) -> Result<(), FamulusError> {
    let subject = subject.to_string();
    let link = link.to_string();
    let now = Utc::now().to_rfc3339();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO meet_links (subject, link, updated_at) VALUES (lower(?1), ?2, ?3)
                 ON CONFLICT(subject) DO UPDATE SET
                     link = excluded.link,
                     updated_at = excluded.updated_at",
                params![subject, link, now],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
