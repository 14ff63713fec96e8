//! Error types for the registry, validation, dispatch and engine layers

use thiserror::Error;

/// Errors raised by translation engines and boot-time configuration
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Engine endpoint answered with a non-success status
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status returned by the engine
        status: u16,
        /// Response body, verbatim
        message: String,
    },

    /// Engine throttled the request
    #[error("Rate limit exceeded. Retry after {retry_after:?} seconds")]
    RateLimitError {
        /// Value of the `Retry-After` header, when present
        retry_after: Option<u64>,
    },

    /// Network error
    #[error("Network error: {message}")]
    NetworkError {
        /// Transport-level failure description
        message: String,
    },

    /// Engine returned a body we could not read a translation from
    #[error("Invalid response: {message}")]
    InvalidResponseError {
        /// What was wrong with the body
        message: String,
    },

    /// Request timeout
    #[error("Request timeout")]
    TimeoutError,

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the offending setting
        message: String,
    },

    /// No installed model chain connects the two languages
    #[error("no translation model from {source_code} to {target_code}")]
    PairUnsupported {
        /// Source language code
        source_code: String,
        /// Target language code
        target_code: String,
    },

    /// Unexpected engine-side failure
    #[error("Internal error: {0}")]
    InternalError(String),

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),
}

impl From<config::ConfigError> for TranslationError {
    fn from(err: config::ConfigError) -> Self {
        TranslationError::ConfigError {
            message: err.to_string(),
        }
    }
}

impl TranslationError {
    /// Whether the HTTP engine may retry the hop that produced this error
    pub fn is_transient(&self) -> bool {
        match self {
            TranslationError::NetworkError { .. }
            | TranslationError::RateLimitError { .. }
            | TranslationError::TimeoutError => true,
            TranslationError::ApiError { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;

/// Request parameter validation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was absent or empty
    #[error("Invalid request: missing {0} parameter")]
    MissingParameter(&'static str),
}

/// Failures surfaced by the dispatch service, each mapped to one HTTP status
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Request did not pass validation (400)
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// A language code is not in the registry (400)
    #[error("{0} is not supported")]
    UnsupportedLanguage(String),

    /// Capability resolution or the engine failed (500)
    #[error("Cannot translate text: {0}")]
    TranslationFailed(String),
}

impl DispatchError {
    /// HTTP status code for this failure
    pub fn status_code(&self) -> u16 {
        match self {
            DispatchError::Invalid(_) | DispatchError::UnsupportedLanguage(_) => 400,
            DispatchError::TranslationFailed(_) => 500,
        }
    }
}

impl From<TranslationError> for DispatchError {
    fn from(err: TranslationError) -> Self {
        DispatchError::TranslationFailed(err.to_string())
    }
}
