//! Picks how a language pair gets translated: identity, one model, or two
//! models chained through an intermediate language.

use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::core::config::CatalogConfig;
use crate::core::engine::TranslationEngine;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{Language, ModelPair};
use crate::core::registry::LanguageRegistry;

/// Route chosen for one language pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Source and target are the same language
    Identity,
    /// A single installed model covers the pair
    Direct(ModelPair),
    /// Two models joined at an intermediate language
    Pivot(ModelPair, ModelPair),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Identity => write!(f, "identity"),
            Route::Direct(model) => write!(f, "direct {}", model),
            Route::Pivot(first, second) => write!(f, "pivot {} then {}", first, second),
        }
    }
}

/// A resolved route bound to the engine that runs it
#[derive(Clone)]
pub struct TranslationCapability {
    route: Route,
    engine: Arc<dyn TranslationEngine>,
}

impl fmt::Debug for TranslationCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationCapability")
            .field("route", &self.route)
            .field("engine", &self.engine.name())
            .finish()
    }
}

impl TranslationCapability {
    /// Translate `text`. Engine errors are passed through untouched.
    pub async fn translate(&self, text: &str) -> Result<String> {
        match &self.route {
            Route::Identity => Ok(text.to_string()),
            Route::Direct(model) => self.engine.translate(model, text).await,
            Route::Pivot(first, second) => {
                let intermediate = self.engine.translate(first, text).await?;
                self.engine.translate(second, &intermediate).await
            }
        }
    }
}

/// Factory for [`TranslationCapability`] over the installed models
#[derive(Clone)]
pub struct CapabilityResolver {
    models: Vec<ModelPair>,
    pivot: Option<String>,
    /// Intermediate candidates, in registry order
    candidates: Vec<String>,
    engine: Arc<dyn TranslationEngine>,
}

impl fmt::Debug for CapabilityResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityResolver")
            .field("models", &self.models.len())
            .field("pivot", &self.pivot)
            .field("engine", &self.engine.name())
            .finish()
    }
}

impl CapabilityResolver {
    /// Resolver over `models`, trying `pivot` before other intermediates
    pub fn new(
        registry: &LanguageRegistry,
        models: Vec<ModelPair>,
        pivot: Option<String>,
        engine: Arc<dyn TranslationEngine>,
    ) -> Self {
        let candidates = registry
            .list_all()
            .iter()
            .map(|l| l.code.clone())
            .collect();

        Self {
            models,
            pivot,
            candidates,
            engine,
        }
    }

    /// Build from a validated catalog
    pub fn from_catalog(
        registry: &LanguageRegistry,
        catalog: &CatalogConfig,
        engine: Arc<dyn TranslationEngine>,
    ) -> Self {
        Self::new(registry, catalog.models.clone(), catalog.pivot.clone(), engine)
    }

    fn find_model(&self, source: &str, target: &str) -> Option<&ModelPair> {
        self.models.iter().find(|m| m.connects(source, target))
    }

    fn pivot_through(&self, source: &str, via: &str, target: &str) -> Option<Route> {
        if via == source || via == target {
            return None;
        }
        let first = self.find_model(source, via)?;
        let second = self.find_model(via, target)?;
        Some(Route::Pivot(first.clone(), second.clone()))
    }

    /// Choose a route for `source` -> `target`
    pub fn route(&self, source: &Language, target: &Language) -> Result<Route> {
        let (src, tgt) = (source.code.as_str(), target.code.as_str());

        if src == tgt {
            return Ok(Route::Identity);
        }

        if let Some(model) = self.find_model(src, tgt) {
            return Ok(Route::Direct(model.clone()));
        }

        let preferred = self
            .pivot
            .as_deref()
            .and_then(|via| self.pivot_through(src, via, tgt));

        preferred
            .or_else(|| {
                self.candidates
                    .iter()
                    .find_map(|via| self.pivot_through(src, via, tgt))
            })
            .ok_or_else(|| TranslationError::PairUnsupported {
                source_code: src.to_string(),
                target_code: tgt.to_string(),
            })
    }

    /// Resolve a capability for two registry languages
    pub fn resolve(&self, source: &Language, target: &Language) -> Result<TranslationCapability> {
        let route = self.route(source, target)?;
        debug!("Resolved {} -> {}: {}", source.code, target.code, route);

        Ok(TranslationCapability {
            route,
            engine: Arc::clone(&self.engine),
        })
    }
}
