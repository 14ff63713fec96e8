//! Request parameter validation

use serde::Deserialize;

use crate::core::errors::ValidationError;
use crate::core::models::{CharLimit, TranslationRequest};

/// Translate parameters as they arrive, before any checks
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawTranslateInput {
    /// Text to translate
    pub q: Option<String>,
    /// Source language code
    pub source: Option<String>,
    /// Target language code
    pub target: Option<String>,
}

impl RawTranslateInput {
    /// Input with all three fields set
    pub fn new(q: &str, source: &str, target: &str) -> Self {
        Self {
            q: Some(q.to_string()),
            source: Some(source.to_string()),
            target: Some(target.to_string()),
        }
    }

    /// Collect `q`, `source` and `target` from key/value pairs. The first
    /// value of a repeated key wins; other keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut input = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "q" => &mut input.q,
                "source" => &mut input.source,
                "target" => &mut input.target,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        input
    }

    /// Fill fields missing here from `other`
    pub fn or(self, other: RawTranslateInput) -> Self {
        Self {
            q: self.q.or(other.q),
            source: self.source.or(other.source),
            target: self.target.or(other.target),
        }
    }
}

/// An absent or empty value counts as missing
fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ValidationError::MissingParameter(field))
}

/// Check `q`, `source`, `target` in that order, then apply the character limit
pub fn validate(
    raw: RawTranslateInput,
    char_limit: CharLimit,
) -> Result<TranslationRequest, ValidationError> {
    let q = required(raw.q, "q")?;
    let source = required(raw.source, "source")?;
    let target = required(raw.target, "target")?;

    Ok(TranslationRequest {
        text: char_limit.apply(q),
        source_code: source,
        target_code: target,
    })
}
