// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test doubles for the Famulus adapter traits.
//!
//! Fast, deterministic, CI-runnable substitutes for the real transport,
//! store, and HTTP services:
//!
//! - [`MockTransport`] - channel adapter with event injection and outbound
//!   capture
//! - [`MemoryStore`] - in-memory store with per-operation call counting
//! - [`MockWeather`] / [`MockSpeech`] / [`MockExec`] / [`MockMail`] -
//!   scripted service adapters

pub mod memory_store;
pub mod mock_services;
pub mod mock_transport;

pub use memory_store::MemoryStore;
pub use mock_services::{MockExec, MockMail, MockSpeech, MockWeather};
pub use mock_transport::{text_event, MockTransport};
