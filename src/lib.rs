//! Translate Gateway - translation HTTP API over pluggable model engines
//!
//! This library provides the language registry, request validation,
//! capability resolution (identity, direct and pivot routes) and the dispatch
//! service behind the `/translate` and `/languages` endpoints.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod core;
pub mod server;
pub mod service;
pub mod testing;

// Re-export key types for convenience
pub use crate::core::{
    client::HttpEngine,
    config::{CatalogConfig, EngineConfig, ServerSettings},
    engine::TranslationEngine,
    errors::{DispatchError, TranslationError, ValidationError},
    models::{CharLimit, Language, LanguageInfo, ModelPair, TranslationRequest},
    registry::LanguageRegistry,
    resolver::{CapabilityResolver, Route, TranslationCapability},
    validator::RawTranslateInput,
};

pub use server::api::{router, AppState};
pub use service::dispatch::Dispatcher;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
