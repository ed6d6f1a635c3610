//! Grok (x.ai)
//!
//! Same body as OpenAI plus an explicit `stream: false`, and the key goes in
//! the `Authorization` header as-is, without a `Bearer` scheme.

use serde_json::{json, Value};

use super::{chat_completion_body, endpoint_url, extract_chat_completion, ClassifierProvider, ProviderRequest, CHAT_COMPLETIONS_PATH};
use crate::classifier::prompt::ChatMessage;
use crate::classifier::EndpointDescriptor;
use crate::error::ClassifierError;

const DEFAULT_MODEL: &str = "grok-2";

pub struct GrokProvider;

impl ClassifierProvider for GrokProvider {
    fn name(&self) -> &'static str {
        "grok"
    }

    fn default_endpoint(&self) -> &'static str {
        "https://api.grok.x.ai/v1/chat/completions"
    }

    fn build_request(&self, endpoint: &EndpointDescriptor, messages: &[ChatMessage]) -> ProviderRequest {
        let model = endpoint.model.as_deref().unwrap_or(DEFAULT_MODEL);
        let mut body = chat_completion_body(Some(model), messages);
        body["stream"] = json!(false);

        ProviderRequest {
            url: endpoint_url(&endpoint.base_url, CHAT_COMPLETIONS_PATH),
            authorization: endpoint.api_key.clone().filter(|k| !k.is_empty()),
            body,
        }
    }

    fn extract_reply(&self, body: Value) -> Result<String, ClassifierError> {
        extract_chat_completion(body)
    }
}
