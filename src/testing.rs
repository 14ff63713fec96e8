//! In-process engines for tests and for running the server without a model backend

use async_trait::async_trait;
use std::sync::Mutex;

use crate::core::engine::TranslationEngine;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::ModelPair;

/// Tags the text with the model id, e.g. `"[en-es] Hello"`, and records every call
#[derive(Debug, Default)]
pub struct EchoEngine {
    calls: Mutex<Vec<(String, String)>>,
}

impl EchoEngine {
    /// `(model, text)` pairs seen so far, in call order
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TranslationEngine for EchoEngine {
    async fn translate(&self, model: &ModelPair, text: &str) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((model.model.clone(), text.to_string()));
        }
        Ok(format!("[{}] {}", model.model, text))
    }

    fn name(&self) -> &str {
        "echo"
    }
}

/// Fails every hop with the given message
#[derive(Debug)]
pub struct FailingEngine {
    message: String,
}

impl FailingEngine {
    /// Engine failing with `message`
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl TranslationEngine for FailingEngine {
    async fn translate(&self, _model: &ModelPair, _text: &str) -> Result<String> {
        Err(TranslationError::InternalError(self.message.clone()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}
