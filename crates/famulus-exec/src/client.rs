// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Piston execution API.

use std::time::Duration;

use famulus_core::FamulusError;
use tracing::debug;

use crate::types::{ApiErrorResponse, ExecuteRequest, ExecuteResponse, FileEntry};

/// HTTP client for Piston communication.
#[derive(Debug, Clone)]
pub struct ExecClient {
    client: reqwest::Client,
    base_url: String,
}

impl ExecClient {
    /// Creates a new execution API client.
    pub fn new(base_url: String) -> Result<Self, FamulusError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| FamulusError::Service {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self { client, base_url })
    }

    /// Submits `source` for execution under the exact runtime version.
    pub async fn execute(
        &self,
        language: &str,
        version: &str,
        source: &str,
    ) -> Result<ExecuteResponse, FamulusError> {
        let request = ExecuteRequest {
            language: language.to_string(),
            version: version.to_string(),
            files: vec![FileEntry {
                content: source.to_string(),
            }],
        };

        let url = format!("{}/execute", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| FamulusError::Service {
                message: format!("execution request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, language, "execution response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                format!("execution API error ({status}): {}", api_err.message)
            } else {
                format!("execution API returned {status}: {body}")
            };
            return Err(FamulusError::Service {
                message,
                source: None,
            });
        }

        response
            .json::<ExecuteResponse>()
            .await
            .map_err(|e| FamulusError::Service {
                message: format!("failed to parse execution response: {e}"),
                source: Some(Box::new(e)),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn execute_posts_language_version_and_source() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/execute"))
            .and(body_partial_json(serde_json::json!({
                "language": "python",
                "version": "3.10.0",
                "files": [{"content": "print('hi')"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "language": "python",
                "version": "3.10.0",
                "run": {"stdout": "hi\n", "stderr": "", "output": "hi\n", "code": 0, "signal": null}
            })))
            .mount(&server)
            .await;

        let client = ExecClient::new(server.uri()).unwrap();
        let result = client.execute("python", "3.10.0", "print('hi')").await.unwrap();

        assert_eq!(result.run.output, "hi\n");
        assert_eq!(result.run.code, Some(0));
        assert!(result.compile.is_none());
    }

    #[tokio::test]
    async fn api_error_message_is_surfaced() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/execute"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "message": "runtime is unknown"
            })))
            .mount(&server)
            .await;

        let client = ExecClient::new(server.uri()).unwrap();
        let err = client.execute("python", "9.9.9", "x = 1").await.unwrap_err();
        assert!(err.to_string().contains("runtime is unknown"), "got: {err}");
    }
}
