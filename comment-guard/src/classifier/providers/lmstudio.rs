//! LM Studio and other OpenAI-compatible local servers
//!
//! The loaded model answers whatever the request names, so `model` is only
//! sent when configured.

use serde_json::Value;

use super::{bearer, chat_completion_body, endpoint_url, extract_chat_completion, ClassifierProvider, ProviderRequest, CHAT_COMPLETIONS_PATH};
use crate::classifier::prompt::ChatMessage;
use crate::classifier::EndpointDescriptor;
use crate::error::ClassifierError;

pub struct LmStudioProvider;

impl ClassifierProvider for LmStudioProvider {
    fn name(&self) -> &'static str {
        "lmstudio"
    }

    fn default_endpoint(&self) -> &'static str {
        "http://localhost:1234/v1/chat/completions"
    }

    fn build_request(&self, endpoint: &EndpointDescriptor, messages: &[ChatMessage]) -> ProviderRequest {
        ProviderRequest {
            url: endpoint_url(&endpoint.base_url, CHAT_COMPLETIONS_PATH),
            authorization: bearer(endpoint.api_key.as_deref()),
            body: chat_completion_body(endpoint.model.as_deref(), messages),
        }
    }

    fn extract_reply(&self, body: Value) -> Result<String, ClassifierError> {
        extract_chat_completion(body)
    }
}
