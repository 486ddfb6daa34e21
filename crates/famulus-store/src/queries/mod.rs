// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for the four persisted collections.

pub mod credential;
pub mod links;
pub mod list;
pub mod notes;
