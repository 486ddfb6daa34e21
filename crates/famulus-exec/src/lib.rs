// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Piston remote code execution adapter for the Famulus chat agent.
//!
//! Implements [`ExecService`]: a fixed runtime allow-list consulted by the
//! `!run` handler before anything leaves the process, and single-shot
//! execution against a Piston-compatible API. A failed compile stage wins
//! over the run stage when composing the reported output.

pub mod client;
pub mod runtimes;
pub mod types;

use async_trait::async_trait;
use tracing::debug;

use famulus_config::model::ExecConfig;
use famulus_core::types::{AdapterType, ExecOutcome, ExecRuntime, HealthStatus};
use famulus_core::{ExecService, FamulusError, PluginAdapter};

use crate::client::ExecClient;

/// Piston-backed implementation of [`ExecService`].
pub struct Piston {
    client: ExecClient,
}

impl Piston {
    /// Creates the adapter from configuration.
    pub fn new(config: &ExecConfig) -> Result<Self, FamulusError> {
        Ok(Self {
            client: ExecClient::new(config.base_url.clone())?,
        })
    }
}

#[async_trait]
impl PluginAdapter for Piston {
    fn name(&self) -> &str {
        "piston"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Service
    }

    async fn health_check(&self) -> Result<HealthStatus, FamulusError> {
        // The public deployment rate-limits aggressively; no probe call.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), FamulusError> {
        debug!("exec adapter shutting down");
        Ok(())
    }
}

#[async_trait]
impl ExecService for Piston {
    fn runtimes(&self) -> Vec<ExecRuntime> {
        runtimes::allowed_runtimes()
    }

    async fn run(&self, language: &str, source: &str) -> Result<ExecOutcome, FamulusError> {
        let language = language.to_ascii_lowercase();
        let version = runtimes::version_for(&language).ok_or_else(|| {
            FamulusError::service(format!("language not in the runtime allow-list: {language}"))
        })?;

        let response = self.client.execute(&language, version, source).await?;

        // A compile failure carries the text the user needs; the run stage
        // never executed in that case.
        let (output, exit_code) = match &response.compile {
            Some(compile) if compile.code != Some(0) => {
                (compile.output.clone(), compile.code)
            }
            _ => (response.run.output.clone(), response.run.code),
        };

        Ok(ExecOutcome {
            language: response.language,
            version: response.version,
            output,
            exit_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter(base_url: &str) -> Piston {
        Piston::new(&ExecConfig {
            base_url: base_url.to_string(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn adapter_identity_and_allow_list() {
        let piston = adapter("http://unused.invalid");
        assert_eq!(piston.name(), "piston");
        assert!(piston.runtimes().iter().any(|r| r.language == "python"));
    }

    #[tokio::test]
    async fn run_maps_the_run_stage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/execute"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "language": "python",
                "version": "3.10.0",
                "run": {"stdout": "42\n", "stderr": "", "output": "42\n", "code": 0, "signal": null}
            })))
            .mount(&server)
            .await;

        let outcome = adapter(&server.uri()).run("python", "print(42)").await.unwrap();
        assert_eq!(outcome.language, "python");
        assert_eq!(outcome.output, "42\n");
        assert_eq!(outcome.exit_code, Some(0));
    }

    #[tokio::test]
    async fn failed_compile_stage_wins_over_run_stage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/execute"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "language": "c",
                "version": "10.2.0",
                "compile": {"stdout": "", "stderr": "main.c:1: error", "output": "main.c:1: error", "code": 1, "signal": null},
                "run": {"stdout": "", "stderr": "", "output": "", "code": null, "signal": null}
            })))
            .mount(&server)
            .await;

        let outcome = adapter(&server.uri()).run("c", "int main( {}").await.unwrap();
        assert_eq!(outcome.output, "main.c:1: error");
        assert_eq!(outcome.exit_code, Some(1));
    }

    #[tokio::test]
    async fn disallowed_language_fails_without_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = adapter(&server.uri()).run("brainfuck", "+++").await.unwrap_err();
        assert!(err.to_string().contains("allow-list"), "got: {err}");
    }

    #[tokio::test]
    async fn language_lookup_is_case_insensitive() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/execute"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "language": "python",
                "version": "3.10.0",
                "run": {"stdout": "", "stderr": "", "output": "", "code": 0, "signal": null}
            })))
            .mount(&server)
            .await;

        assert!(adapter(&server.uri()).run("Python", "pass").await.is_ok());
    }
}
