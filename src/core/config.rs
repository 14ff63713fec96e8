//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::core::errors::{Result, TranslationError};
use crate::core::models::{Language, ModelPair};

/// Settings for the remote HTTP translation engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Bearer token; empty sends no `Authorization` header
    pub api_key: String,
    /// Model-serving endpoint URL
    pub api_endpoint: String,
    /// Requests in flight at once
    pub max_concurrent: usize,
    /// Retries per hop for transient failures
    pub max_retries: u32,
    /// Base delay, doubled on each retry
    pub retry_delay_ms: u64,
    /// Per-request timeout
    pub timeout_ms: u64,
}

/// Default engine endpoint
const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8989/api/v3/responses";

/// Upper bound on `max_retries`
pub const MAX_RETRIES_LIMIT: u32 = 10;

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_endpoint: DEFAULT_ENDPOINT.to_string(),
            max_concurrent: 20,
            max_retries: 2,
            retry_delay_ms: 500,
            timeout_ms: 30000,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let api_key = std::env::var("TRANSLATE_API_KEY").unwrap_or_default();

        let api_endpoint =
            std::env::var("TRANSLATE_API_ENDPOINT").unwrap_or(defaults.api_endpoint);

        let max_concurrent = env_or("TRANSLATE_MAX_CONCURRENT", defaults.max_concurrent)?;
        let max_retries = env_or("TRANSLATE_MAX_RETRIES", defaults.max_retries)?;
        let retry_delay_ms = env_or("TRANSLATE_RETRY_DELAY_MS", defaults.retry_delay_ms)?;
        let timeout_ms = env_or("TRANSLATE_TIMEOUT_MS", defaults.timeout_ms)?;

        Ok(Self {
            api_key,
            api_endpoint,
            max_concurrent,
            max_retries,
            retry_delay_ms,
            timeout_ms,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_endpoint.is_empty() {
            return Err(TranslationError::ConfigError {
                message: "API endpoint is required".to_string(),
            });
        }

        if self.api_key.is_empty() {
            warn!("TRANSLATE_API_KEY is not set; engine requests are sent without credentials");
        }

        if self.max_concurrent == 0 {
            return Err(TranslationError::ConfigError {
                message: "max_concurrent must be greater than 0".to_string(),
            });
        }

        if self.max_retries > MAX_RETRIES_LIMIT {
            return Err(TranslationError::ConfigError {
                message: format!(
                    "max_retries must be at most {}, got {}",
                    MAX_RETRIES_LIMIT, self.max_retries
                ),
            });
        }

        if self.timeout_ms == 0 {
            return Err(TranslationError::ConfigError {
                message: "timeout_ms must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Read `key` from the environment, falling back to `default` when unset
fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value.trim().parse::<T>().map_err(|e| TranslationError::ConfigError {
            message: format!("{} has an invalid value '{}': {}", key, value, e),
        }),
        Err(_) => Ok(default),
    }
}

/// Languages and installed models the service routes between
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Languages in listing order
    #[serde(default)]
    pub languages: Vec<Language>,
    /// Installed single-hop models
    #[serde(default)]
    pub models: Vec<ModelPair>,
    /// Preferred intermediate language for two-hop translation
    #[serde(default)]
    pub pivot: Option<String>,
}

/// Built-in languages: (code, name)
const DEFAULT_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("ar", "Arabic"),
    ("zh", "Chinese"),
    ("fr", "French"),
    ("de", "German"),
    ("hi", "Hindi"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("es", "Spanish"),
];

/// Language every built-in model translates to or from
const DEFAULT_PIVOT: &str = "en";

impl CatalogConfig {
    /// Built-in catalog: one model each way between English and every other language
    pub fn builtin() -> Self {
        let languages: Vec<Language> = DEFAULT_LANGUAGES
            .iter()
            .map(|(code, name)| Language::new(*code, *name))
            .collect();

        let models = languages
            .iter()
            .filter(|l| l.code != DEFAULT_PIVOT)
            .flat_map(|l| {
                [
                    ModelPair::new(DEFAULT_PIVOT, &l.code, format!("translate-{}-{}", DEFAULT_PIVOT, l.code)),
                    ModelPair::new(&l.code, DEFAULT_PIVOT, format!("translate-{}-{}", l.code, DEFAULT_PIVOT)),
                ]
            })
            .collect();

        Self {
            languages,
            models,
            pivot: Some(DEFAULT_PIVOT.to_string()),
        }
    }

    /// Load from a YAML, JSON or TOML file (format chosen by extension)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(TranslationError::ConfigError {
                message: format!("catalog file not found: {}", path.display()),
            });
        }

        let catalog: Self = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?
            .try_deserialize()?;

        info!(
            "Loaded catalog from {}: {} languages, {} models",
            path.display(),
            catalog.languages.len(),
            catalog.models.len()
        );

        Ok(catalog)
    }

    /// Load from `path` if given, otherwise the built-in catalog
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let catalog = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let catalog = Self::builtin();
                info!("Loaded {} built-in languages", catalog.languages.len());
                catalog
            }
        };

        catalog.validate()?;
        Ok(catalog)
    }

    /// Every model and the pivot must refer to catalog languages
    pub fn validate(&self) -> Result<()> {
        let known = |code: &str| self.languages.iter().any(|l| l.code == code);

        for model in &self.models {
            if !known(&model.source) || !known(&model.target) {
                return Err(TranslationError::ConfigError {
                    message: format!("model {} refers to an unknown language", model),
                });
            }
            if model.source == model.target {
                return Err(TranslationError::ConfigError {
                    message: format!("model {} translates a language into itself", model),
                });
            }
            if model.model.trim().is_empty() {
                return Err(TranslationError::ConfigError {
                    message: format!("model {}->{} has no identifier", model.source, model.target),
                });
            }
        }

        if let Some(pivot) = &self.pivot {
            if !known(pivot) {
                return Err(TranslationError::ConfigError {
                    message: format!("pivot language '{}' is not in the catalog", pivot),
                });
            }
        }

        if self.languages.is_empty() {
            warn!("Catalog has no languages; every translation request will be rejected");
        }

        Ok(())
    }
}

/// Process-wide server settings, fixed at boot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Hostname or IP address to listen on
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Requests per hour per client; `None` disables limiting
    pub req_limit: Option<u32>,
    /// Key clients by the first `X-Forwarded-For` hop instead of the peer address
    pub trust_proxy: bool,
    /// Analytics id rendered into the landing page
    pub google_analytics: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            req_limit: None,
            trust_proxy: false,
            google_analytics: None,
        }
    }
}

impl ServerSettings {
    /// Build from raw command-line values (`-1` disables a limit)
    pub fn from_raw(
        host: String,
        port: u16,
        req_limit: i64,
        trust_proxy: bool,
        google_analytics: Option<String>,
    ) -> Result<Self> {
        let req_limit = match req_limit {
            -1 => None,
            n if n > 0 => Some(u32::try_from(n).map_err(|_| TranslationError::ConfigError {
                message: format!("req limit {} is out of range", n),
            })?),
            n => {
                return Err(TranslationError::ConfigError {
                    message: format!("req limit must be -1 or a positive integer, got {}", n),
                })
            }
        };

        let google_analytics = google_analytics.filter(|id| !id.trim().is_empty());

        Ok(Self {
            host,
            port,
            req_limit,
            trust_proxy,
            google_analytics,
        })
    }

    /// `host:port` for logs and URLs, with IPv6 literals bracketed
    pub fn display_address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_engine_config_validation() {
        let config = EngineConfig {
            api_key: "test_key".to_string(),
            api_endpoint: "https://test.com".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_engine_config_validation_missing_endpoint() {
        let config = EngineConfig {
            api_endpoint: "".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            max_concurrent: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_engine_config_caps_retries() {
        let config = EngineConfig {
            max_retries: MAX_RETRIES_LIMIT,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let config = EngineConfig {
            max_retries: 64,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(TranslationError::ConfigError { .. })));
    }

    #[test]
    fn test_builtin_catalog_is_consistent() {
        let catalog = CatalogConfig::builtin();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.languages.len(), DEFAULT_LANGUAGES.len());
        assert_eq!(catalog.models.len(), (DEFAULT_LANGUAGES.len() - 1) * 2);
        assert!(catalog.models.iter().any(|m| m.connects("en", "es")));
        assert!(catalog.models.iter().any(|m| m.connects("es", "en")));
        assert!(!catalog.models.iter().any(|m| m.connects("es", "fr")));
    }

    #[test]
    fn test_catalog_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(
            file,
            r#"
languages:
  - code: en
    name: English
  - code: it
    name: Italian
models:
  - source: en
    target: it
    model: opus-en-it
pivot: en
"#
        )
        .unwrap();

        let catalog = CatalogConfig::load(Some(file.path())).unwrap();
        assert_eq!(catalog.languages.len(), 2);
        assert_eq!(catalog.models, vec![ModelPair::new("en", "it", "opus-en-it")]);
        assert_eq!(catalog.pivot.as_deref(), Some("en"));
    }

    #[test]
    fn test_catalog_from_json_file_without_models() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"languages": [{{"code": "fr", "name": "French"}}]}}"#).unwrap();

        let catalog = CatalogConfig::load(Some(file.path())).unwrap();
        assert_eq!(catalog.languages, vec![Language::new("fr", "French")]);
        assert!(catalog.models.is_empty());
        assert!(catalog.pivot.is_none());
    }

    #[test]
    fn test_catalog_rejects_model_for_unknown_language() {
        let catalog = CatalogConfig {
            languages: vec![Language::new("en", "English")],
            models: vec![ModelPair::new("en", "xx", "m")],
            pivot: None,
        };
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_catalog_missing_file() {
        let result = CatalogConfig::load(Some(Path::new("/nonexistent/catalog.yaml")));
        assert!(matches!(result, Err(TranslationError::ConfigError { .. })));
    }

    #[test]
    fn test_server_settings_from_raw() {
        let settings =
            ServerSettings::from_raw("0.0.0.0".to_string(), 8080, 100, true, Some("UA-1".to_string()))
                .unwrap();
        assert_eq!(settings.req_limit, Some(100));
        assert!(settings.trust_proxy);
        assert_eq!(settings.display_address(), "0.0.0.0:8080");

        let settings =
            ServerSettings::from_raw("127.0.0.1".to_string(), 5000, -1, false, Some(" ".to_string()))
                .unwrap();
        assert!(settings.req_limit.is_none());
        assert!(settings.google_analytics.is_none());

        assert!(ServerSettings::from_raw("h".to_string(), 1, 0, false, None).is_err());
        assert!(ServerSettings::from_raw("h".to_string(), 1, -5, false, None).is_err());
    }

    #[test]
    fn test_display_address_brackets_ipv6() {
        let settings = ServerSettings {
            host: "::1".to_string(),
            ..Default::default()
        };
        assert_eq!(settings.display_address(), "[::1]:5000");

        let settings = ServerSettings {
            host: "localhost".to_string(),
            port: 8080,
            ..Default::default()
        };
        assert_eq!(settings.display_address(), "localhost:8080");
    }
}
