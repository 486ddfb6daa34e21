// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Access gate applied to every inbound event before any other processing.
//!
//! The gate owns the three admission controls (broadcast filtering,
//! introvert whitelisting, the global active toggle) and consumes the
//! commands that flip them: `!whitelist`, `!start`, `!pause`.

use famulus_core::types::InboundEvent;

use crate::state::RuntimeState;

/// Outcome of the admission check for one inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Route the event to the dialog engine or command table.
    Process,
    /// Drop the event with no reply.
    Drop,
    /// Answer with this text and stop routing.
    Reply(String),
}

/// Decides whether `event` may be processed, mutating `state` where the
/// event is one of the gate-owned toggles.
///
/// Rules, in order: broadcast statuses are never processed; an owner
/// `!whitelist` is honored even while gated; introvert mode silently drops
/// non-whitelisted conversations; while paused, only `!start` is heard.
pub fn admit(state: &mut RuntimeState, event: &InboundEvent, owner: Option<&str>) -> Admission {
    if event.is_broadcast_status {
        return Admission::Drop;
    }

    let body = event.body.trim();

    // The owner can whitelist the requesting conversation even while the
    // introvert gate would otherwise drop it.
    if body == "!whitelist" && owner == Some(event.sender_id.as_str()) {
        return if state.whitelist.insert(event.conversation_id.clone()) {
            Admission::Reply("Whitelisted. ✅".to_string())
        } else {
            Admission::Reply("Already whitelisted.".to_string())
        };
    }

    if state.introvert && !state.whitelist.contains(&event.conversation_id) {
        return Admission::Drop;
    }

    if body == "!start" {
        return if state.active {
            Admission::Reply("Already active!".to_string())
        } else {
            state.active = true;
            Admission::Reply("Active!".to_string())
        };
    }

    if !state.active {
        return Admission::Drop;
    }

    if body == "!pause" {
        state.active = false;
        return Admission::Reply("OKAY :(".to_string());
    }

    Admission::Process
}
