// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The fixed language table the synthesizer accepts.
//!
//! `!ttslang` validates against this table and `!ttsall` prints it; codes
//! are VoiceRSS locale identifiers.

use famulus_core::types::SpeechLanguage;

/// (code, display name) pairs, in `!ttsall` display order.
const LANGUAGES: &[(&str, &str)] = &[
    ("en-us", "English (United States)"),
    ("en-gb", "English (Great Britain)"),
    ("en-in", "English (India)"),
    ("en-au", "English (Australia)"),
    ("hi-in", "Hindi (India)"),
    ("ta-in", "Tamil (India)"),
    ("de-de", "German (Germany)"),
    ("es-es", "Spanish (Spain)"),
    ("fr-fr", "French (France)"),
    ("it-it", "Italian (Italy)"),
    ("ja-jp", "Japanese (Japan)"),
    ("ko-kr", "Korean (Korea)"),
    ("pt-br", "Portuguese (Brazil)"),
    ("ru-ru", "Russian (Russia)"),
    ("zh-cn", "Chinese (China)"),
];

/// All supported languages, in display order.
pub fn supported_languages() -> Vec<SpeechLanguage> {
    LANGUAGES
        .iter()
        .map(|(code, name)| SpeechLanguage {
            code: (*code).to_string(),
            name: (*name).to_string(),
        })
        .collect()
}

/// Whether `code` (case-insensitive) is in the table.
pub fn is_supported(code: &str) -> bool {
    let code = code.to_ascii_lowercase();
    LANGUAGES.iter().any(|(c, _)| *c == code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_nonempty_and_contains_the_default() {
        let langs = supported_languages();
        assert!(!langs.is_empty());
        assert!(langs.iter().any(|l| l.code == "en-us"));
    }

    #[test]
    fn support_check_ignores_case() {
        assert!(is_supported("EN-US"));
        assert!(is_supported("hi-in"));
        assert!(!is_supported("xx-yy"));
    }
}
