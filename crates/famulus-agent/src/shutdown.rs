// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graceful shutdown coordination with signal handling.
//!
//! SIGTERM and SIGINT (Ctrl+C) trigger a [`CancellationToken`] that the
//! router loop monitors. Conversation workers drain their queued events
//! before the process exits.

use std::collections::HashMap;
use std::time::Duration;

use famulus_core::types::ConversationId;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::worker::ConversationWorker;

/// Installs signal handlers for SIGTERM and SIGINT.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal
/// arrives. The handler task runs in the background until then.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm =
                signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

            tokio::select! {
                _ = ctrl_c => {
                    info!("received SIGINT (Ctrl+C), initiating shutdown");
                }
                _ = sigterm.recv() => {
                    info!("received SIGTERM, initiating shutdown");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, initiating shutdown");
        }

        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}

/// Closes every worker mailbox and waits up to `timeout` for the workers
/// to finish the events already queued.
pub(crate) async fn drain_workers(
    workers: HashMap<ConversationId, ConversationWorker>,
    timeout: Duration,
) {
    if workers.is_empty() {
        info!("no conversation workers to drain");
        return;
    }

    info!(count = workers.len(), "draining conversation workers");
    let handles: Vec<_> = workers
        .into_values()
        .map(ConversationWorker::into_handle)
        .collect();

    match tokio::time::timeout(timeout, futures::future::join_all(handles)).await {
        Ok(_) => info!("all conversation workers drained"),
        Err(_) => warn!("timeout reached, some conversation workers interrupted"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::harness;
    use famulus_test_utils::text_event;

    #[tokio::test]
    async fn install_signal_handler_returns_token() {
        let token = install_signal_handler();
        // Token should not be cancelled yet.
        assert!(!token.is_cancelled());
        // Cancel it manually to clean up the background task.
        token.cancel();
    }

    #[tokio::test]
    async fn drain_empty_workers() {
        let workers = HashMap::new();
        // Should complete immediately with no workers.
        drain_workers(workers, Duration::from_millis(10)).await;
    }

    #[tokio::test]
    async fn drain_waits_for_queued_events() {
        let fixture = harness();
        let conversation = ConversationId::from("chat@c.us");
        let worker = ConversationWorker::spawn(conversation.clone(), fixture.ctx.clone());
        worker
            .submit(text_event("chat@c.us", "user@c.us", "!ping"))
            .await
            .unwrap();

        let mut workers = HashMap::new();
        workers.insert(conversation, worker);
        drain_workers(workers, Duration::from_secs(5)).await;

        assert_eq!(fixture.transport.sent_count().await, 1);
    }
}
