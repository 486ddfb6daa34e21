// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The fixed runtime allow-list.
//!
//! `!run` validates its language argument against this table before any
//! request leaves the process; versions are pinned to what the public
//! Piston deployment installs, because `POST /execute` requires an exact
//! version string.

use famulus_core::types::ExecRuntime;

/// (language, pinned version) pairs, in `!run` help-text order.
const RUNTIMES: &[(&str, &str)] = &[
    ("python", "3.10.0"),
    ("javascript", "18.15.0"),
    ("typescript", "5.0.3"),
    ("c", "10.2.0"),
    ("c++", "10.2.0"),
    ("java", "15.0.2"),
    ("go", "1.16.2"),
    ("rust", "1.68.2"),
    ("bash", "5.2.0"),
    ("ruby", "3.0.1"),
];

/// All allowed runtimes, in display order.
pub fn allowed_runtimes() -> Vec<ExecRuntime> {
    RUNTIMES
        .iter()
        .map(|(language, version)| ExecRuntime {
            language: (*language).to_string(),
            version: (*version).to_string(),
        })
        .collect()
}

/// The pinned version for `language` (case-insensitive), if allowed.
pub fn version_for(language: &str) -> Option<&'static str> {
    let language = language.to_ascii_lowercase();
    RUNTIMES
        .iter()
        .find(|(l, _)| *l == language)
        .map(|(_, v)| *v)
}
