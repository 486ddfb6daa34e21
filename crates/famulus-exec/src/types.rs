// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Piston execution API.

use serde::{Deserialize, Serialize};

/// Request body of `POST /execute`.
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteRequest {
    pub language: String,
    pub version: String,
    pub files: Vec<FileEntry>,
}

/// One source file in an execution request.
#[derive(Debug, Clone, Serialize)]
pub struct FileEntry {
    pub content: String,
}

/// Response body of `POST /execute`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteResponse {
    pub language: String,
    pub version: String,
    pub run: StageResult,
    /// Present only for compiled languages.
    #[serde(default)]
    pub compile: Option<StageResult>,
}

/// Captured result of one execution stage (compile or run).
#[derive(Debug, Clone, Deserialize)]
pub struct StageResult {
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    /// Interleaved stdout/stderr as the runner captured them.
    #[serde(default)]
    pub output: String,
    pub code: Option<i32>,
    pub signal: Option<String>,
}

/// Error body, e.g. `{"message":"runtime is unknown"}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub message: String,
}
