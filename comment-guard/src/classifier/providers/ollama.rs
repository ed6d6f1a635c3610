//! Ollama chat API

use serde::Deserialize;
use serde_json::{json, Value};

use super::{bearer, endpoint_url, ClassifierProvider, ProviderRequest};
use crate::classifier::prompt::ChatMessage;
use crate::classifier::EndpointDescriptor;
use crate::error::ClassifierError;

const DEFAULT_MODEL: &str = "mistral";
const CHAT_PATH: &str = "/api/chat";

pub struct OllamaProvider;

/// Ollama chat response
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: String,
}

impl ClassifierProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn default_endpoint(&self) -> &'static str {
        "http://localhost:11434/api/chat"
    }

    fn build_request(&self, endpoint: &EndpointDescriptor, messages: &[ChatMessage]) -> ProviderRequest {
        let model = endpoint.model.as_deref().unwrap_or(DEFAULT_MODEL);
        ProviderRequest {
            url: endpoint_url(&endpoint.base_url, CHAT_PATH),
            authorization: bearer(endpoint.api_key.as_deref()),
            body: json!({
                "model": model,
                "messages": messages,
                "stream": false,
            }),
        }
    }

    fn extract_reply(&self, body: Value) -> Result<String, ClassifierError> {
        let response: OllamaChatResponse = serde_json::from_value(body)
            .map_err(|e| ClassifierError::MalformedResponse(e.to_string()))?;
        Ok(response.message.content.trim().to_string())
    }
}
