//! Language registry: the immutable set of languages the service knows about.
//!
//! Built once at boot from the catalog and shared read-only afterwards, so
//! lookups need no locking.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::core::errors::{Result, TranslationError};
use crate::core::models::Language;

/// Accepted shape of a language code ("en", "pt-BR", "zh-Hant")
const CODE_PATTERN: &str = r"^[a-z]{2,3}(-[A-Za-z0-9]{2,8})*$";

fn code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(CODE_PATTERN).expect("language code pattern is valid"))
}

/// Check that `code` looks like a language code
pub fn is_valid_code(code: &str) -> bool {
    code_regex().is_match(code)
}

/// Registry of supported languages, in catalog order
#[derive(Debug, Clone, Default)]
pub struct LanguageRegistry {
    languages: Vec<Language>,
    index: HashMap<String, usize>,
}

impl LanguageRegistry {
    /// Build the registry, rejecting malformed or duplicate entries
    pub fn new(languages: Vec<Language>) -> Result<Self> {
        let mut index = HashMap::with_capacity(languages.len());

        for (position, language) in languages.iter().enumerate() {
            if !is_valid_code(&language.code) {
                return Err(TranslationError::ConfigError {
                    message: format!("invalid language code: '{}'", language.code),
                });
            }

            if language.name.trim().is_empty() {
                return Err(TranslationError::ConfigError {
                    message: format!("language '{}' has no name", language.code),
                });
            }

            if index.insert(language.code.clone(), position).is_some() {
                return Err(TranslationError::ConfigError {
                    message: format!("duplicate language code: '{}'", language.code),
                });
            }
        }

        Ok(Self { languages, index })
    }

    /// Look a language up by its code. Absence is not an error.
    pub fn find_by_code(&self, code: &str) -> Option<&Language> {
        self.index.get(code).map(|&position| &self.languages[position])
    }

    /// Every registered language exactly once
    pub fn list_all(&self) -> &[Language] {
        &self.languages
    }

    /// Number of registered languages
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    /// Whether the catalog had no languages
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> LanguageRegistry {
        LanguageRegistry::new(vec![
            Language::new("en", "English"),
            Language::new("es", "Spanish"),
            Language::new("zh-Hant", "Chinese (Traditional)"),
        ])
        .unwrap()
    }

    #[test]
    fn test_find_by_code() {
        let registry = registry();
        assert_eq!(registry.find_by_code("es").unwrap().name, "Spanish");
        assert_eq!(registry.find_by_code("zh-Hant").unwrap().code, "zh-Hant");
        assert!(registry.find_by_code("xx").is_none());
        assert!(registry.find_by_code("EN").is_none());
        assert!(registry.find_by_code("").is_none());
    }

    #[test]
    fn test_list_all_keeps_catalog_order() {
        let registry = registry();
        let codes: Vec<_> = registry.list_all().iter().map(|l| l.code.as_str()).collect();
        assert_eq!(codes, vec!["en", "es", "zh-Hant"]);
    }

    #[test]
    fn test_empty_registry() {
        let registry = LanguageRegistry::new(vec![]).unwrap();
        assert!(registry.is_empty());
        assert!(registry.list_all().is_empty());
        assert!(registry.find_by_code("en").is_none());
    }

    #[test]
    fn test_rejects_duplicates() {
        let result = LanguageRegistry::new(vec![
            Language::new("en", "English"),
            Language::new("en", "English again"),
        ]);
        assert!(matches!(result, Err(TranslationError::ConfigError { .. })));
    }

    #[test]
    fn test_rejects_malformed_codes() {
        for code in ["", "E", "english", "en_US", "en-"] {
            let result = LanguageRegistry::new(vec![Language::new(code, "Name")]);
            assert!(result.is_err(), "code {:?} should be rejected", code);
        }
        assert!(LanguageRegistry::new(vec![Language::new("en", "  ")]).is_err());
    }

    #[test]
    fn test_valid_codes() {
        for code in ["en", "fil", "pt-BR", "zh-Hans", "sr-Latn-RS"] {
            assert!(is_valid_code(code), "code {:?} should be accepted", code);
        }
    }
}
