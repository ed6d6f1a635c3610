//! Classifier adapter
//!
//! Asks an external LLM how likely a text is gambling spam. The detector only
//! sees the [`Classifier`] trait; how a request is shaped for OpenAI, Ollama,
//! Grok and friends lives in [`providers`].

pub mod http;
pub mod prompt;
pub mod providers;
pub mod reply;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ClassifierError;

pub use http::{HttpClassifier, RetryPolicy};
pub use providers::{provider_for, ClassifierProvider, ProviderRequest};

/// Where and how to reach the classifier. Resolved by the caller and passed
/// unchanged into every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    /// Provider name (openai, deepseek, grok, ollama, lmstudio, ...)
    pub provider_name: String,
    /// Server root or full endpoint URL
    pub base_url: String,
    /// Model name, provider default when absent
    pub model: Option<String>,
    /// API key, sent the way the provider expects
    pub api_key: Option<String>,
}

impl EndpointDescriptor {
    pub fn new(provider_name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            provider_name: provider_name.into(),
            base_url: base_url.into(),
            model: None,
            api_key: None,
        }
    }

    /// Descriptor pointing at the provider's well-known endpoint.
    pub fn for_provider(provider_name: &str) -> Self {
        let provider = provider_for(provider_name);
        Self::new(provider_name, provider.default_endpoint())
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// Classifier's opinion about the text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierLabel {
    Spam,
    NotSpam,
    Uncertain,
}

/// A best-effort verdict. Never authoritative on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierVerdict {
    /// Spam probability, 0-100
    pub confidence: u8,
    pub label: ClassifierLabel,
    pub rationale: Option<String>,
}

impl ClassifierVerdict {
    pub fn new(confidence: u8, label: ClassifierLabel) -> Self {
        Self {
            confidence: confidence.min(100),
            label,
            rationale: None,
        }
    }

    /// The verdict for a reply that carried no usable score.
    pub fn uncertain() -> Self {
        Self::new(0, ClassifierLabel::Uncertain)
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }
}

/// Text classification capability
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify `text` using the classifier at `endpoint`.
    ///
    /// An `Err` means the classifier was unavailable (network, auth, timeout),
    /// not that the text was hard to judge.
    async fn classify(
        &self,
        text: &str,
        endpoint: &EndpointDescriptor,
    ) -> Result<ClassifierVerdict, ClassifierError>;
}

/// Classifier that is never available. Used for pattern-only operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineClassifier;

#[async_trait]
impl Classifier for OfflineClassifier {
    async fn classify(
        &self,
        _text: &str,
        _endpoint: &EndpointDescriptor,
    ) -> Result<ClassifierVerdict, ClassifierError> {
        Err(ClassifierError::Disabled)
    }
}
