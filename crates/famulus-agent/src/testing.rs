// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared test fixtures: an [`AgentContext`] wired to scripted adapters,
//! with typed handles kept on the side for assertions.

use std::sync::Arc;
use std::time::Instant;

use famulus_config::FamulusConfig;
use famulus_core::types::OutboundContent;
use famulus_test_utils::{MemoryStore, MockExec, MockMail, MockSpeech, MockTransport, MockWeather};

use crate::{AgentContext, Services};

pub(crate) struct Harness {
    pub ctx: Arc<AgentContext>,
    pub transport: Arc<MockTransport>,
    pub store: Arc<MemoryStore>,
    pub mail: Arc<MockMail>,
    pub weather: Arc<MockWeather>,
    pub speech: Arc<MockSpeech>,
    pub exec: Arc<MockExec>,
}

/// Default test config: owner set, introvert mode off.
pub(crate) fn config() -> FamulusConfig {
    let mut config = FamulusConfig::default();
    config.agent.owner = Some("owner@c.us".to_string());
    config.agent.introvert = false;
    config
}

pub(crate) fn harness() -> Harness {
    harness_with(config())
}

pub(crate) fn harness_with(config: FamulusConfig) -> Harness {
    build(
        config,
        Arc::new(MockWeather::sunny()),
        Arc::new(MockSpeech::default()),
        Arc::new(MockExec::printing("hello\n")),
        Arc::new(MockMail::new()),
    )
}

/// Every external service scripted to fail.
pub(crate) fn degraded_harness() -> Harness {
    let mail = Arc::new(MockMail::new());
    mail.set_failing(true);
    build(
        config(),
        Arc::new(MockWeather::failing()),
        Arc::new(MockSpeech::failing()),
        Arc::new(MockExec::failing()),
        mail,
    )
}

pub(crate) fn harness_with_exec_output(output: &str) -> Harness {
    build(
        config(),
        Arc::new(MockWeather::sunny()),
        Arc::new(MockSpeech::default()),
        Arc::new(MockExec::printing(output)),
        Arc::new(MockMail::new()),
    )
}

fn build(
    config: FamulusConfig,
    weather: Arc<MockWeather>,
    speech: Arc<MockSpeech>,
    exec: Arc<MockExec>,
    mail: Arc<MockMail>,
) -> Harness {
    let transport = Arc::new(MockTransport::new());
    let store = Arc::new(MemoryStore::new());
    let services = Services {
        weather: weather.clone(),
        speech: speech.clone(),
        exec: exec.clone(),
        mail: mail.clone(),
    };
    let ctx = Arc::new(AgentContext::new(
        transport.clone(),
        store.clone(),
        services,
        config,
        Instant::now(),
    ));
    Harness {
        ctx,
        transport,
        store,
        mail,
        weather,
        speech,
        exec,
    }
}

/// Text bodies of everything the transport was asked to send, in order.
pub(crate) async fn sent_texts(fixture: &Harness) -> Vec<String> {
    fixture
        .transport
        .sent_messages()
        .await
        .into_iter()
        .filter_map(|message| match message.content {
            OutboundContent::Text(text) => Some(text),
            OutboundContent::Media(_) => None,
        })
        .collect()
}
