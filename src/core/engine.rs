//! Seam between the dispatch layer and whatever actually runs the models

use async_trait::async_trait;

use crate::core::errors::Result;
use crate::core::models::ModelPair;

/// A backend able to run one installed single-hop model
#[async_trait]
pub trait TranslationEngine: Send + Sync {
    /// Translate `text` with `model` (`model.source` -> `model.target`)
    async fn translate(&self, model: &ModelPair, text: &str) -> Result<String>;

    /// Short name used in logs
    fn name(&self) -> &str;
}
