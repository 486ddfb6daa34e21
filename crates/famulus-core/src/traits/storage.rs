// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store adapter trait for the persisted collections.

use async_trait::async_trait;

use crate::error::FamulusError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{MeetLink, NoteEntry};

/// Adapter for the document store backing the agent's four collections:
/// the session credential singleton, notes, the singleton list, and
/// meeting links keyed by subject.
///
/// Every operation is a future returning result-or-error, sequenced by
/// callers before the outbound reply is composed. Read-modify-write
/// cycles (list append, index removal) are composed by the caller from
/// these primitives; the store itself does not wrap them in transactions.
#[async_trait]
pub trait StoreAdapter: PluginAdapter {
    /// Initializes the backend (migrations, connection), must be called once
    /// before any other operation.
    async fn initialize(&self) -> Result<(), FamulusError>;

    /// Closes the backend, flushing pending writes.
    async fn close(&self) -> Result<(), FamulusError>;

    // --- session credential (singleton) ---

    /// Loads the persisted reconnection credential, if any.
    async fn load_credential(&self) -> Result<Option<Vec<u8>>, FamulusError>;

    /// Upserts the reconnection credential: create-if-absent,
    /// overwrite-if-present, single row.
    async fn save_credential(&self, blob: &[u8]) -> Result<(), FamulusError>;

    // --- notes ---

    /// All notes in creation order.
    async fn list_notes(&self) -> Result<Vec<NoteEntry>, FamulusError>;

    /// Creates a note and returns it.
    async fn create_note(&self, text: &str) -> Result<NoteEntry, FamulusError>;

    /// Deletes every note whose text matches exactly (case-sensitive).
    /// Returns the number deleted.
    async fn delete_notes_by_text(&self, text: &str) -> Result<u64, FamulusError>;

    // --- singleton list ---

    /// The list items in order, or `None` when the list document does not exist.
    async fn get_list(&self) -> Result<Option<Vec<String>>, FamulusError>;

    /// Replaces the whole list document (creating it when absent).
    async fn put_list(&self, items: &[String]) -> Result<(), FamulusError>;

    /// Deletes the list document. Returns whether it existed.
    async fn delete_list(&self) -> Result<bool, FamulusError>;

    // --- meeting links ---

    /// Looks up a meeting link by subject (case-insensitive).
    async fn get_link(&self, subject: &str) -> Result<Option<MeetLink>, FamulusError>;

    /// Creates or replaces the meeting link for a subject.
    async fn upsert_link(&self, subject: &str, link: &str) -> Result<(), FamulusError>;
}
