//! HTTP classifier
//!
//! Sends the classification prompt to a chat endpoint and parses the reply.
//! Request shaping is delegated to the [`ClassifierProvider`] named by the
//! endpoint descriptor.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::prompt::build_messages;
use super::providers::{provider_for, ClassifierProvider, ProviderRequest};
use super::reply::parse_reply;
use super::{Classifier, ClassifierVerdict, EndpointDescriptor};
use crate::error::ClassifierError;

/// Retry policy for transient transport errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one
    pub max_retries: u32,
    /// Delay before the first retry, doubled on each further retry
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self { max_retries, backoff }
    }

    /// Delay before retry number `retry` (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry.saturating_sub(1)).unwrap_or(u32::MAX);
        self.backoff.saturating_mul(factor)
    }
}

/// Classifier backed by an LLM chat endpoint
pub struct HttpClassifier {
    client: reqwest::Client,
    timeout: Duration,
    retry: RetryPolicy,
}

impl HttpClassifier {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn send_once(
        &self,
        provider: &dyn ClassifierProvider,
        request: &ProviderRequest,
    ) -> Result<String, ClassifierError> {
        match tokio::time::timeout(self.timeout, self.exchange(provider, request)).await {
            Ok(result) => result,
            Err(_) => Err(ClassifierError::Timeout(self.timeout)),
        }
    }

    async fn exchange(
        &self,
        provider: &dyn ClassifierProvider,
        request: &ProviderRequest,
    ) -> Result<String, ClassifierError> {
        let mut builder = self.client.post(&request.url).json(&request.body);
        if let Some(ref authorization) = request.authorization {
            builder = builder.header(reqwest::header::AUTHORIZATION, authorization);
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!(
                "Classifier: {} request failed with status {}: {}",
                provider.name(),
                status,
                error_text
            );
            return Err(ClassifierError::Status {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ClassifierError::MalformedResponse(e.to_string()))?;
        provider.extract_reply(body)
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(
        &self,
        text: &str,
        endpoint: &EndpointDescriptor,
    ) -> Result<ClassifierVerdict, ClassifierError> {
        let provider = provider_for(&endpoint.provider_name);
        let messages = build_messages(text);
        let request = provider.build_request(endpoint, &messages);

        debug!("Classifier: sending request to {} ({})", request.url, provider.name());

        let mut attempt = 0;
        let reply = loop {
            match self.send_once(provider.as_ref(), &request).await {
                Ok(reply) => break reply,
                Err(e) if e.is_transient() && attempt < self.retry.max_retries => {
                    attempt += 1;
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        "Classifier: attempt {} failed ({}), retrying in {:?}",
                        attempt, e, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        };

        debug!("Classifier: received reply ({} chars)", reply.chars().count());

        let verdict = parse_reply(&reply);
        debug!(
            "Classifier: confidence={} label={:?}",
            verdict.confidence, verdict.label
        );
        Ok(verdict)
    }
}
