// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP surface for the Famulus agent.
//!
//! Three routes, served by axum next to the chat loop:
//!
//! - `GET /` - public status page, also refreshes the channel presence
//! - `POST /sleep` - pauses the agent for the night, guarded by the
//!   `X-Famulus-Secret` header
//! - `POST /webhook` - forwards external notifications into chat after
//!   striking secrets from the text

pub mod auth;
pub mod handlers;
pub mod redact;
pub mod server;

pub use server::{router, start_server, GatewayState};
