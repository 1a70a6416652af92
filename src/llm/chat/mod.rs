pub mod openai;

use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Arc;
use thiserror::Error;

use self::openai::OpenAIChatClient;
use crate::config::UpstreamConfig;
use crate::models::chat::Conversation;

/// Used when the provider rejects a call without saying why.
pub const GENERIC_UPSTREAM_ERROR: &str = "Perplexity API error";

#[derive(Debug, Error)]
pub enum ChatError {
    /// Non-2xx answer. Displays as the provider's own message so callers can
    /// surface it verbatim.
    #[error("{message}")]
    Upstream {
        status: StatusCode,
        message: String,
    },
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("Invalid JSON from completion provider: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid API key format: {0}")]
    InvalidApiKey(String),
}

/// Reply text from the first choice, if the provider sent any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    pub response: Option<String>,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(
        &self,
        conversation: &Conversation,
        max_tokens: Option<u32>
    ) -> Result<CompletionResponse, ChatError>;

    fn get_model(&self) -> String;
}

pub fn new_client(config: &UpstreamConfig) -> Result<Arc<dyn ChatClient>, ChatError> {
    let client = OpenAIChatClient::from_config(config)?;
    Ok(Arc::new(client))
}
