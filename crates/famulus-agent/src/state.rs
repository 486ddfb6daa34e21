// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide runtime flags shared across conversation workers.

use std::collections::HashSet;

use famulus_config::FamulusConfig;
use famulus_core::types::ConversationId;

/// Mutable runtime state shared by every conversation, behind the router's
/// `RwLock`. Mutation sites are exactly: `!start`, `!pause`, `!whitelist`,
/// `!ttslang`, and the gateway sleep endpoint.
#[derive(Debug, Clone)]
pub struct RuntimeState {
    /// Global on/off toggle. While false, only `!start` is processed.
    pub active: bool,
    /// While true, only whitelisted conversations are answered.
    pub introvert: bool,
    /// Conversations exempt from introvert mode. In-memory only; does not
    /// survive a restart.
    pub whitelist: HashSet<ConversationId>,
    /// Language code used by `!tts` until `!ttslang` switches it.
    pub tts_lang: String,
}

impl RuntimeState {
    /// Builds the boot-time state from configuration. The agent always
    /// starts active; introvert mode and the seed whitelist come from the
    /// `[agent]` section.
    pub fn from_config(config: &FamulusConfig) -> Self {
        Self {
            active: true,
            introvert: config.agent.introvert,
            whitelist: config
                .agent
                .whitelist
                .iter()
                .map(|id| ConversationId(id.clone()))
                .collect(),
            tts_lang: config.tts.default_language.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boot_state_comes_from_config() {
        let mut config = FamulusConfig::default();
        config.agent.introvert = false;
        config.agent.whitelist = vec!["friend@c.us".to_string()];
        config.tts.default_language = "hi-in".to_string();

        let state = RuntimeState::from_config(&config);
        assert!(state.active);
        assert!(!state.introvert);
        assert!(state.whitelist.contains(&ConversationId::from("friend@c.us")));
        assert_eq!(state.tts_lang, "hi-in");
    }

    #[test]
    fn defaults_are_introverted_and_active() {
        let state = RuntimeState::from_config(&FamulusConfig::default());
        assert!(state.active);
        assert!(state.introvert);
        assert!(state.whitelist.is_empty());
        assert_eq!(state.tts_lang, "en-us");
    }
}
