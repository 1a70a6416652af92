use async_trait::async_trait;
use log::{ debug, warn };
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::time::Duration;

use super::{ ChatClient, ChatError, CompletionResponse, GENERIC_UPSTREAM_ERROR };
use crate::config::UpstreamConfig;
use crate::models::chat::{ ChatMessage, Conversation };

const RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Client for any endpoint speaking the OpenAI chat completions format
/// (Perplexity, OpenAI, Groq, ...).
pub struct OpenAIChatClient {
    http: HttpClient,
    model: String,
    base_url: String,
    max_retries: u32,
}

#[derive(Serialize)]
struct OpenAIChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl OpenAIChatClient {
    pub fn new(
        api_key: &str,
        model: String,
        base_url: String,
        timeout: Duration,
        max_retries: u32
    ) -> Result<Self, ChatError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e|
            ChatError::InvalidApiKey(e.to_string())
        )?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = HttpClient::builder().default_headers(headers).timeout(timeout).build()?;

        Ok(Self {
            http,
            model,
            base_url,
            max_retries,
        })
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self, ChatError> {
        Self::new(
            &config.api_key,
            config.model.clone(),
            config.url.clone(),
            config.timeout,
            config.max_retries
        )
    }

    /// Sends the request, retrying only failures where no response arrived
    /// (refused or reset connections, timeouts).
    async fn send(&self, req: &OpenAIChatRequest<'_>) -> Result<reqwest::Response, ChatError> {
        let mut attempt: u32 = 0;
        loop {
            match self.http.post(&self.base_url).json(req).send().await {
                Ok(resp) => {
                    return Ok(resp);
                }
                Err(e) if attempt < self.max_retries && is_transient(&e) => {
                    attempt += 1;
                    warn!(
                        "Completion request failed ({}), retry {}/{} in {:?}",
                        e,
                        attempt,
                        self.max_retries,
                        RETRY_BACKOFF
                    );
                    tokio::time::sleep(RETRY_BACKOFF).await;
                }
                Err(e) => {
                    return Err(ChatError::Transport(e));
                }
            }
        }
    }
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout() || err.is_request()
}

/// Pulls `error.message` out of a rejection body, whatever else it holds.
fn upstream_error_message(body: &[u8]) -> String {
    serde_json
        ::from_slice::<JsonValue>(body)
        .ok()
        .and_then(|v| v.pointer("/error/message").and_then(JsonValue::as_str).map(str::to_owned))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| GENERIC_UPSTREAM_ERROR.to_string())
}

fn first_choice_content(body: &[u8]) -> Result<Option<String>, ChatError> {
    let value: JsonValue = serde_json::from_slice(body)?;
    // Only the first choice matters; anything else in the body is ignored.
    let content = value
        .pointer("/choices/0/message/content")
        .and_then(JsonValue::as_str)
        .map(str::to_owned);
    Ok(content)
}

#[async_trait]
impl ChatClient for OpenAIChatClient {
    async fn complete(
        &self,
        conversation: &Conversation,
        max_tokens: Option<u32>
    ) -> Result<CompletionResponse, ChatError> {
        let req = OpenAIChatRequest {
            model: &self.model,
            messages: conversation.messages(),
            max_tokens,
        };

        let resp = self.send(&req).await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        debug!("Completion provider answered {} ({} bytes)", status, body.len());

        if !status.is_success() {
            return Err(ChatError::Upstream {
                status,
                message: upstream_error_message(&body),
            });
        }

        Ok(CompletionResponse { response: first_choice_content(&body)? })
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }
}
