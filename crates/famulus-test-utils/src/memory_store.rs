// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory store adapter for router and handler tests.
//!
//! Implements the full `StoreAdapter` contract over plain collections and
//! counts calls per operation, so tests can assert not just on state but
//! on how many store round trips a code path made (the meet-link cache
//! tests rely on this).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use famulus_core::types::{AdapterType, HealthStatus, MeetLink, NoteEntry};
use famulus_core::{FamulusError, PluginAdapter, StoreAdapter};

#[derive(Default)]
struct Collections {
    credential: Option<Vec<u8>>,
    notes: Vec<NoteEntry>,
    next_note_id: i64,
    list: Option<Vec<String>>,
    links: HashMap<String, MeetLink>,
}

/// An in-memory `StoreAdapter` with per-operation call counters.
pub struct MemoryStore {
    inner: Arc<Mutex<Collections>>,
    calls: Arc<Mutex<HashMap<&'static str, u64>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Collections {
                next_note_id: 1,
                ..Collections::default()
            })),
            calls: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// How many times the named operation has been called
    /// (e.g. `"get_link"`, `"put_list"`).
    pub async fn call_count(&self, operation: &str) -> u64 {
        self.calls.lock().await.get(operation).copied().unwrap_or(0)
    }

    async fn record(&self, operation: &'static str) {
        *self.calls.lock().await.entry(operation).or_insert(0) += 1;
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, FamulusError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), FamulusError> {
        Ok(())
    }
}

#[async_trait]
impl StoreAdapter for MemoryStore {
    async fn initialize(&self) -> Result<(), FamulusError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), FamulusError> {
        Ok(())
    }

    async fn load_credential(&self) -> Result<Option<Vec<u8>>, FamulusError> {
        self.record("load_credential").await;
        Ok(self.inner.lock().await.credential.clone())
    }

    async fn save_credential(&self, blob: &[u8]) -> Result<(), FamulusError> {
        self.record("save_credential").await;
        self.inner.lock().await.credential = Some(blob.to_vec());
        Ok(())
    }

    async fn list_notes(&self) -> Result<Vec<NoteEntry>, FamulusError> {
        self.record("list_notes").await;
        Ok(self.inner.lock().await.notes.clone())
    }

    async fn create_note(&self, text: &str) -> Result<NoteEntry, FamulusError> {
        self.record("create_note").await;
        let mut inner = self.inner.lock().await;
        let note = NoteEntry {
            id: inner.next_note_id,
            text: text.to_string(),
            created_at: chrono::Utc::now(),
        };
        inner.next_note_id += 1;
        inner.notes.push(note.clone());
        Ok(note)
    }

    async fn delete_notes_by_text(&self, text: &str) -> Result<u64, FamulusError> {
        self.record("delete_notes_by_text").await;
        let mut inner = self.inner.lock().await;
        let before = inner.notes.len();
        inner.notes.retain(|n| n.text != text);
        Ok((before - inner.notes.len()) as u64)
    }

    async fn get_list(&self) -> Result<Option<Vec<String>>, FamulusError> {
        self.record("get_list").await;
        Ok(self.inner.lock().await.list.clone())
    }

    async fn put_list(&self, items: &[String]) -> Result<(), FamulusError> {
        self.record("put_list").await;
        self.inner.lock().await.list = Some(items.to_vec());
        Ok(())
    }

    async fn delete_list(&self) -> Result<bool, FamulusError> {
        self.record("delete_list").await;
        Ok(self.inner.lock().await.list.take().is_some())
    }

    async fn get_link(&self, subject: &str) -> Result<Option<MeetLink>, FamulusError> {
        self.record("get_link").await;
        Ok(self
            .inner
            .lock()
            .await
            .links
            .get(&subject.to_lowercase())
            .cloned())
    }

    async fn upsert_link(&self, subject: &str, link: &str) -> Result<(), FamulusError> {
        self.record("upsert_link").await;
        let key = subject.to_lowercase();
        self.inner.lock().await.links.insert(
            key.clone(),
            MeetLink {
                subject: key,
                link: link.to_string(),
            },
        );
        Ok(())
    }
}
