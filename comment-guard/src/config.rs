use crate::classifier::{EndpointDescriptor, RetryPolicy};
use crate::detector::FusionThresholds;
use crate::error::{GuardError, Result};
use crate::scorer::CategoryWeights;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable consulted when no api key is configured
pub const API_KEY_ENV: &str = "COMMENT_GUARD_API_KEY";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub classifier: ClassifierConfig,
    pub thresholds: FusionThresholds,
    pub weights: CategoryWeights,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("spam_patterns_db.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub provider: String,
    pub base_url: String,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            provider: "lmstudio".to_string(),
            base_url: "http://localhost:1234/v1/chat/completions".to_string(),
            model: None,
            api_key: None,
            timeout_seconds: 30,
            max_retries: 0,
            retry_backoff_ms: 500,
        }
    }
}

impl ClassifierConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.retry_backoff_ms))
    }

    /// Endpoint descriptor, with `fallback_key` used when no key is configured.
    pub fn endpoint(&self, fallback_key: Option<String>) -> EndpointDescriptor {
        let mut endpoint = EndpointDescriptor::new(self.provider.trim(), self.base_url.trim());
        endpoint.model = self.model.clone().filter(|m| !m.is_empty());
        endpoint.api_key = self
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or(fallback_key.filter(|k| !k.is_empty()));
        endpoint
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            GuardError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| GuardError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let t = &self.thresholds;

        if t.learn_confidence > 100 || t.spam_confidence > 100 || t.ham_confidence > 100 {
            return Err(GuardError::Config(
                "Confidence thresholds must be between 0 and 100".to_string(),
            ));
        }
        if t.ham_confidence >= t.spam_confidence {
            return Err(GuardError::Config(format!(
                "ham_confidence ({}) must be below spam_confidence ({})",
                t.ham_confidence, t.spam_confidence
            )));
        }
        if t.spam_confidence >= t.learn_confidence {
            return Err(GuardError::Config(format!(
                "spam_confidence ({}) must be below learn_confidence ({})",
                t.spam_confidence, t.learn_confidence
            )));
        }
        if self.classifier.provider.trim().is_empty() {
            return Err(GuardError::Config("Classifier provider is empty".to_string()));
        }
        if self.classifier.base_url.trim().is_empty() {
            return Err(GuardError::Config("Classifier base_url is empty".to_string()));
        }
        if self.classifier.timeout_seconds == 0 {
            return Err(GuardError::Config("Classifier timeout must be positive".to_string()));
        }

        Ok(())
    }

    /// Endpoint descriptor, taking the api key from `COMMENT_GUARD_API_KEY`
    /// when the file has none.
    pub fn endpoint(&self) -> EndpointDescriptor {
        self.classifier.endpoint(std::env::var(API_KEY_ENV).ok())
    }
}
