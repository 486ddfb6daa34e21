// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted service adapters: weather, speech, code execution, mail.
//!
//! Each mock either answers with a pre-configured value or fails with a
//! `Service` error, and counts its calls so tests can assert that a code
//! path did (or did not) reach the external adapter.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use famulus_core::types::{
    AdapterType, ExecOutcome, ExecRuntime, HealthStatus, MailMessage, SpeechLanguage,
    WeatherReport,
};
use famulus_core::{
    ExecService, FamulusError, MailService, PluginAdapter, SpeechService, WeatherService,
};

macro_rules! impl_plugin_adapter {
    ($ty:ty, $name:literal) => {
        #[async_trait]
        impl PluginAdapter for $ty {
            fn name(&self) -> &str {
                $name
            }

            fn version(&self) -> semver::Version {
                semver::Version::new(0, 1, 0)
            }

            fn adapter_type(&self) -> AdapterType {
                AdapterType::Service
            }

            async fn health_check(&self) -> Result<HealthStatus, FamulusError> {
                Ok(HealthStatus::Healthy)
            }

            async fn shutdown(&self) -> Result<(), FamulusError> {
                Ok(())
            }
        }
    };
}

/// Weather service answering with one fixed report, or always failing.
pub struct MockWeather {
    report: Option<WeatherReport>,
    calls: AtomicUsize,
}

impl MockWeather {
    /// Always answers with `report`.
    pub fn with_report(report: WeatherReport) -> Self {
        Self {
            report: Some(report),
            calls: AtomicUsize::new(0),
        }
    }

    /// A convenient clear-sky report.
    pub fn sunny() -> Self {
        Self::with_report(WeatherReport {
            condition: "Clear".to_string(),
            description: "clear sky".to_string(),
            temp_celsius: 25.0,
        })
    }

    /// Always fails with a `Service` error.
    pub fn failing() -> Self {
        Self {
            report: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// How many lookups were made.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl_plugin_adapter!(MockWeather, "mock-weather");

#[async_trait]
impl WeatherService for MockWeather {
    async fn current(&self, _city: &str) -> Result<WeatherReport, FamulusError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.report
            .clone()
            .ok_or_else(|| FamulusError::service("scripted weather failure"))
    }
}

/// Speech service answering with fixed audio bytes, or always failing.
pub struct MockSpeech {
    audio: Option<Vec<u8>>,
    calls: AtomicUsize,
}

impl MockSpeech {
    pub fn with_audio(audio: Vec<u8>) -> Self {
        Self {
            audio: Some(audio),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            audio: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockSpeech {
    fn default() -> Self {
        Self::with_audio(b"ID3-mock-mp3".to_vec())
    }
}

impl_plugin_adapter!(MockSpeech, "mock-speech");

#[async_trait]
impl SpeechService for MockSpeech {
    fn languages(&self) -> Vec<SpeechLanguage> {
        vec![
            SpeechLanguage {
                code: "en-us".to_string(),
                name: "English (United States)".to_string(),
            },
            SpeechLanguage {
                code: "hi-in".to_string(),
                name: "Hindi".to_string(),
            },
        ]
    }

    async fn synthesize(&self, _text: &str, _language: &str) -> Result<Vec<u8>, FamulusError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.audio
            .clone()
            .ok_or_else(|| FamulusError::service("scripted speech failure"))
    }
}

/// Code execution service answering with one fixed outcome, or failing.
pub struct MockExec {
    outcome: Option<ExecOutcome>,
    calls: AtomicUsize,
}

impl MockExec {
    pub fn with_outcome(outcome: ExecOutcome) -> Self {
        Self {
            outcome: Some(outcome),
            calls: AtomicUsize::new(0),
        }
    }

    /// A successful python run printing `output`.
    pub fn printing(output: &str) -> Self {
        Self::with_outcome(ExecOutcome {
            language: "python".to_string(),
            version: "3.10.0".to_string(),
            output: output.to_string(),
            exit_code: Some(0),
        })
    }

    pub fn failing() -> Self {
        Self {
            outcome: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl_plugin_adapter!(MockExec, "mock-exec");

#[async_trait]
impl ExecService for MockExec {
    fn runtimes(&self) -> Vec<ExecRuntime> {
        vec![
            ExecRuntime {
                language: "python".to_string(),
                version: "3.10.0".to_string(),
            },
            ExecRuntime {
                language: "javascript".to_string(),
                version: "18.15.0".to_string(),
            },
        ]
    }

    async fn run(&self, language: &str, _source: &str) -> Result<ExecOutcome, FamulusError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self
            .runtimes()
            .iter()
            .any(|r| r.language == language.to_lowercase())
        {
            return Err(FamulusError::service(format!(
                "language {language} not in the allow-list"
            )));
        }
        self.outcome
            .clone()
            .ok_or_else(|| FamulusError::service("scripted execution failure"))
    }
}

/// Mail service capturing every submitted message.
pub struct MockMail {
    sent: Arc<Mutex<Vec<MailMessage>>>,
    fail: AtomicBool,
}

impl MockMail {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent `send` fail.
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    /// Everything submitted so far, in order.
    pub async fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

impl Default for MockMail {
    fn default() -> Self {
        Self::new()
    }
}

impl_plugin_adapter!(MockMail, "mock-mail");

#[async_trait]
impl MailService for MockMail {
    async fn send(&self, message: &MailMessage) -> Result<(), FamulusError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(FamulusError::service("scripted mail failure"));
        }
        self.sent.lock().await.push(message.clone());
        Ok(())
    }
}
