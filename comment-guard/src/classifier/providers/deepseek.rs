//! DeepSeek, OpenAI-compatible

use serde_json::Value;

use super::{bearer, chat_completion_body, endpoint_url, extract_chat_completion, ClassifierProvider, ProviderRequest, CHAT_COMPLETIONS_PATH};
use crate::classifier::prompt::ChatMessage;
use crate::classifier::EndpointDescriptor;
use crate::error::ClassifierError;

const DEFAULT_MODEL: &str = "deepseek-chat";

pub struct DeepSeekProvider;

impl ClassifierProvider for DeepSeekProvider {
    fn name(&self) -> &'static str {
        "deepseek"
    }

    fn default_endpoint(&self) -> &'static str {
        "https://api.deepseek.com/v1/chat/completions"
    }

    fn build_request(&self, endpoint: &EndpointDescriptor, messages: &[ChatMessage]) -> ProviderRequest {
        let model = endpoint.model.as_deref().unwrap_or(DEFAULT_MODEL);
        ProviderRequest {
            url: endpoint_url(&endpoint.base_url, CHAT_COMPLETIONS_PATH),
            authorization: bearer(endpoint.api_key.as_deref()),
            body: chat_completion_body(Some(model), messages),
        }
    }

    fn extract_reply(&self, body: Value) -> Result<String, ClassifierError> {
        extract_chat_completion(body)
    }
}
