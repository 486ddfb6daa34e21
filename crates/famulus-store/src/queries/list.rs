// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The singleton list document.
//!
//! The `list_document` row distinguishes "no list" (`None`) from "a list
//! with zero items" (`Some(vec![])`); callers word their replies
//! differently for the two. Read-modify-write cycles are composed by the
//! caller from [`get_list`] and [`put_list`].

use chrono::Utc;
use famulus_core::FamulusError;
use rusqlite::{OptionalExtension, params};

use crate::database::Database;

/// The list items in order, or `None` when no list document exists.
pub async fn get_list(db: &Database) -> Result<Option<Vec<String>>, FamulusError> {
    db.connection()
        .call(|conn| {
            let exists = conn
                .query_row("SELECT id FROM list_document WHERE id = 1", [], |row| {
                    row.get::<_, i64>(0)
                })
                .optional()?
                .is_some();
            if !exists {
                return Ok(None);
            }
            let mut stmt = conn.prepare("SELECT item FROM list_items ORDER BY position ASC")?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            let mut items = Vec::new();
            for row in rows {
                items.push(row?);
            }
            Ok(Some(items))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Replace the whole list document, creating it when absent.
pub async fn put_list(db: &Database, items: &[String]) -> Result<(), FamulusError> {
    let items = items.to_vec();
    let now = Utc::now().to_rfc3339();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT OR IGNORE INTO list_document (id, created_at) VALUES (1, ?1)",
                params![now],
            )?;
            tx.execute("DELETE FROM list_items", [])?;
            {
                let mut stmt =
                    tx.prepare("INSERT INTO list_items (position, item) VALUES (?1, ?2)")?;
                for (i, item) in items.iter().enumerate() {
                    stmt.execute(params![i as i64, item])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete the list document and its items. Returns whether a document existed.
pub async fn delete_list(db: &Database) -> Result<bool, FamulusError> {
    db.connection()
        .call(|conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM list_items", [])?;
            let n = tx.execute("DELETE FROM list_document WHERE id = 1", [])?;
            tx.commit()?;
            Ok(n > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    fn items(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn absent_document_reads_as_none() {
        let (db, _dir) = setup_db().await;
        assert_eq!(get_list(&db).await.unwrap(), None);
    }

    #[tokio::test]
    async fn empty_document_reads_as_some_empty() {
        let (db, _dir) = setup_db().await;
        put_list(&db, &[]).await.unwrap();
        assert_eq!(get_list(&db).await.unwrap(), Some(vec![]));
    }

    #[tokio::test]
    async fn put_preserves_item_order() {
        let (db, _dir) = setup_db().await;
        put_list(&db, &items(&["eggs", "bread", "coffee"])).await.unwrap();

        let got = get_list(&db).await.unwrap().unwrap();
        assert_eq!(got, items(&["eggs", "bread", "coffee"]));
    }

    #[tokio::test]
    async fn put_replaces_the_previous_document() {
        let (db, _dir) = setup_db().await;
        put_list(&db, &items(&["old-1", "old-2"])).await.unwrap();
        put_list(&db, &items(&["new"])).await.unwrap();

        let got = get_list(&db).await.unwrap().unwrap();
        assert_eq!(got, items(&["new"]));
    }

    #[tokio::test]
    async fn delete_reports_whether_a_document_existed() {
        let (db, _dir) = setup_db().await;
        assert!(!delete_list(&db).await.unwrap());

        put_list(&db, &items(&["something"])).await.unwrap();
        assert!(delete_list(&db).await.unwrap());
        assert_eq!(get_list(&db).await.unwrap(), None);

        // Gone means gone: a second delete is a no-op.
        assert!(!delete_list(&db).await.unwrap());
    }
}
