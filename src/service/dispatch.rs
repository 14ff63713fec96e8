//! Request dispatch: validation, language lookup, capability resolution and
//! the translate call, with every failure mapped to a [`DispatchError`].

use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::config::CatalogConfig;
use crate::core::engine::TranslationEngine;
use crate::core::errors::{DispatchError, Result};
use crate::core::models::{CharLimit, LanguageInfo, TranslationRequest};
use crate::core::registry::LanguageRegistry;
use crate::core::resolver::CapabilityResolver;
use crate::core::validator::{self, RawTranslateInput};

/// Stateless per call; shares only immutable boot-time data
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<LanguageRegistry>,
    resolver: Arc<CapabilityResolver>,
    char_limit: CharLimit,
}

impl Dispatcher {
    /// Wire a dispatcher from prebuilt parts
    pub fn new(
        registry: Arc<LanguageRegistry>,
        resolver: Arc<CapabilityResolver>,
        char_limit: CharLimit,
    ) -> Self {
        Self {
            registry,
            resolver,
            char_limit,
        }
    }

    /// Build the registry and resolver from a validated catalog
    pub fn from_catalog(
        catalog: &CatalogConfig,
        engine: Arc<dyn TranslationEngine>,
        char_limit: CharLimit,
    ) -> Result<Self> {
        let registry = LanguageRegistry::new(catalog.languages.clone())?;
        let resolver = CapabilityResolver::from_catalog(&registry, catalog, engine);

        Ok(Self::new(Arc::new(registry), Arc::new(resolver), char_limit))
    }

    /// Languages this dispatcher accepts
    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// Route selection over the installed models
    pub fn resolver(&self) -> &CapabilityResolver {
        &self.resolver
    }

    /// Limit applied to every `q`
    pub fn char_limit(&self) -> CharLimit {
        self.char_limit
    }

    /// Every registered language, annotated with the configured char limit
    pub fn languages(&self) -> Vec<LanguageInfo> {
        self.registry
            .list_all()
            .iter()
            .map(|language| LanguageInfo::new(language, self.char_limit))
            .collect()
    }

    /// Validate `raw` and translate it
    pub async fn dispatch(&self, raw: RawTranslateInput) -> std::result::Result<String, DispatchError> {
        let request = validator::validate(raw, self.char_limit)?;
        self.translate(request).await
    }

    /// Translate an already validated request
    pub async fn translate(
        &self,
        request: TranslationRequest,
    ) -> std::result::Result<String, DispatchError> {
        let source = self
            .registry
            .find_by_code(&request.source_code)
            .ok_or_else(|| DispatchError::UnsupportedLanguage(request.source_code.clone()))?;

        let target = self
            .registry
            .find_by_code(&request.target_code)
            .ok_or_else(|| DispatchError::UnsupportedLanguage(request.target_code.clone()))?;

        debug!(
            "Dispatching {} chars {} -> {}",
            request.text.chars().count(),
            source.code,
            target.code
        );

        let capability = self.resolver.resolve(source, target).map_err(|e| {
            warn!("No route for {} -> {}: {}", source.code, target.code, e);
            DispatchError::from(e)
        })?;

        capability.translate(&request.text).await.map_err(|e| {
            warn!("Translation {} -> {} failed: {}", source.code, target.code, e);
            DispatchError::from(e)
        })
    }
}
