// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for stored entities.
//!
//! The canonical types are defined in `famulus-core::types` for use across
//! adapter trait boundaries. This module re-exports them for convenience
//! within the store crate.

pub use famulus_core::types::{MeetLink, NoteEntry};
