//! Provider-specific request shaping
//!
//! Every provider speaks a slightly different dialect of "chat completion":
//! where the endpoint lives, which body fields it wants, how the key goes in
//! the `Authorization` header and where the reply text sits in the response.
//! That knowledge lives here and nowhere else.

mod deepseek;
mod grok;
mod lmstudio;
mod ollama;
mod openai;

use serde::Deserialize;
use serde_json::{json, Value};

use super::prompt::ChatMessage;
use super::EndpointDescriptor;
use crate::error::ClassifierError;

pub use deepseek::DeepSeekProvider;
pub use grok::GrokProvider;
pub use lmstudio::LmStudioProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

/// A fully shaped HTTP request, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub url: String,
    /// Value of the `Authorization` header, if any
    pub authorization: Option<String>,
    pub body: Value,
}

/// Request/response conventions of one classifier provider
pub trait ClassifierProvider: Send + Sync {
    /// Provider name, as used in configuration
    fn name(&self) -> &'static str;

    /// Endpoint used when the configuration does not name one
    fn default_endpoint(&self) -> &'static str;

    /// Shape the chat request for `endpoint`.
    fn build_request(&self, endpoint: &EndpointDescriptor, messages: &[ChatMessage]) -> ProviderRequest;

    /// Pull the reply text out of the provider's response body.
    fn extract_reply(&self, body: Value) -> Result<String, ClassifierError>;
}

/// Look up the provider for `name`. Unknown names are treated as an
/// OpenAI-compatible local server, like LM Studio.
pub fn provider_for(name: &str) -> Box<dyn ClassifierProvider> {
    match name.trim().to_lowercase().as_str() {
        "openai" => Box::new(OpenAiProvider),
        "deepseek" => Box::new(DeepSeekProvider),
        "grok" => Box::new(GrokProvider),
        "ollama" => Box::new(OllamaProvider),
        _ => Box::new(LmStudioProvider),
    }
}

/// Append `path` to `base` unless `base` already is the full endpoint.
pub(crate) fn endpoint_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.ends_with(path) {
        return base.to_string();
    }
    if let Some(rest) = path.strip_prefix("/v1") {
        if base.ends_with("/v1") {
            return format!("{}{}", base, rest);
        }
    }
    format!("{}{}", base, path)
}

pub(crate) fn bearer(api_key: Option<&str>) -> Option<String> {
    api_key
        .filter(|k| !k.is_empty())
        .map(|k| format!("Bearer {}", k))
}

pub(crate) const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
pub(crate) const TEMPERATURE: f64 = 0.7;
pub(crate) const MAX_TOKENS: u32 = 200;

/// OpenAI-style chat completion body with the sampling settings the
/// classifier prompt was tuned for.
pub(crate) fn chat_completion_body(model: Option<&str>, messages: &[ChatMessage]) -> Value {
    let mut body = json!({
        "messages": messages,
        "temperature": TEMPERATURE,
        "max_tokens": MAX_TOKENS,
    });
    if let Some(model) = model {
        body["model"] = json!(model);
    }
    body
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    content: Option<String>,
}

/// `choices[0].message.content`
pub(crate) fn extract_chat_completion(body: Value) -> Result<String, ClassifierError> {
    let response: ChatCompletionResponse = serde_json::from_value(body)
        .map_err(|e| ClassifierError::MalformedResponse(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| ClassifierError::MalformedResponse("response has no choices".to_string()))
}
