//! Core data models for translation

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::core::errors::{Result, TranslationError};

/// A language known to the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Unique code, e.g. "en" or "pt-BR"
    pub code: String,
    /// Human-readable name
    pub name: String,
}

impl Language {
    /// Create a language entry
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

/// An installed single-hop model, keyed by its language pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelPair {
    /// Code of the language the model reads
    pub source: String,
    /// Code of the language the model writes
    pub target: String,
    /// Engine-side model identifier
    pub model: String,
}

impl ModelPair {
    /// Create a model entry
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            model: model.into(),
        }
    }

    /// Check if this model translates `source` into `target`
    pub fn connects(&self, source: &str, target: &str) -> bool {
        self.source == source && self.target == target
    }
}

impl fmt::Display for ModelPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{} [{}]", self.source, self.target, self.model)
    }
}

/// Global input character limit. `-1` on the wire means unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharLimit(Option<usize>);

impl CharLimit {
    /// No truncation
    pub const UNLIMITED: CharLimit = CharLimit(None);

    /// Truncate input to `chars` characters
    pub fn limited(chars: usize) -> Self {
        CharLimit(Some(chars))
    }

    /// Parse the configured value: `-1` is unlimited, `0..` truncates
    pub fn from_raw(raw: i64) -> Result<Self> {
        match raw {
            -1 => Ok(Self::UNLIMITED),
            n if n >= 0 => usize::try_from(n)
                .map(Self::limited)
                .map_err(|_| TranslationError::ConfigError {
                    message: format!("char limit {} is out of range", n),
                }),
            n => Err(TranslationError::ConfigError {
                message: format!("char limit must be -1 or a non-negative integer, got {}", n),
            }),
        }
    }

    /// Value reported to clients as `charLimit`
    pub fn raw(&self) -> i64 {
        self.0
            .map(|n| i64::try_from(n).unwrap_or(i64::MAX))
            .unwrap_or(-1)
    }

    /// Whether input is passed through untouched
    pub fn is_unlimited(&self) -> bool {
        self.0.is_none()
    }

    /// Keep the first `limit` characters of `text`
    pub fn apply(&self, mut text: String) -> String {
        if let Some(limit) = self.0 {
            if let Some((byte_idx, _)) = text.char_indices().nth(limit) {
                text.truncate(byte_idx);
            }
        }
        text
    }
}

impl fmt::Display for CharLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(n) => write!(f, "{}", n),
            None => write!(f, "unlimited"),
        }
    }
}

/// Validated translation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Input text, already truncated
    pub text: String,
    /// Requested source language code, not yet looked up
    pub source_code: String,
    /// Requested target language code, not yet looked up
    pub target_code: String,
}

impl TranslationRequest {
    /// Create a request from already validated parts
    pub fn new(
        text: impl Into<String>,
        source_code: impl Into<String>,
        target_code: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_code: source_code.into(),
            target_code: target_code.into(),
        }
    }
}

/// Entry of the `/languages` listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LanguageInfo {
    /// Language code
    #[schema(example = "en")]
    pub code: String,
    /// Human-readable language name (in English)
    #[schema(example = "English")]
    pub name: String,
    /// Character input limit for this language (-1 indicates no limit)
    pub char_limit: i64,
}

impl LanguageInfo {
    /// Listing entry for `language` under the global `char_limit`
    pub fn new(language: &Language, char_limit: CharLimit) -> Self {
        Self {
            code: language.code.clone(),
            name: language.name.clone(),
            char_limit: char_limit.raw(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_limit_from_raw() {
        assert_eq!(CharLimit::from_raw(-1).unwrap(), CharLimit::UNLIMITED);
        assert_eq!(CharLimit::from_raw(0).unwrap(), CharLimit::limited(0));
        assert_eq!(CharLimit::from_raw(250).unwrap().raw(), 250);
        assert!(CharLimit::from_raw(-2).is_err());
    }

    #[test]
    fn test_char_limit_truncates_by_characters() {
        let limit = CharLimit::limited(5);
        assert_eq!(limit.apply("Hello world!".to_string()), "Hello");
        assert_eq!(limit.apply("héllö wörld".to_string()), "héllö");
        assert_eq!(limit.apply("日本語のテキスト".to_string()), "日本語のテ");
        assert_eq!(limit.apply("Hi".to_string()), "Hi");
    }

    #[test]
    fn test_char_limit_is_idempotent() {
        let limit = CharLimit::limited(3);
        let once = limit.apply("abcdef".to_string());
        assert_eq!(limit.apply(once.clone()), once);
    }

    #[test]
    fn test_unlimited_keeps_text() {
        let text = "x".repeat(10_000);
        assert_eq!(CharLimit::UNLIMITED.apply(text.clone()), text);
        assert_eq!(CharLimit::UNLIMITED.raw(), -1);
    }

    #[test]
    fn test_language_info_serializes_camel_case() {
        let info = LanguageInfo::new(&Language::new("en", "English"), CharLimit::limited(100));
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json, serde_json::json!({"code": "en", "name": "English", "charLimit": 100}));
    }
}
