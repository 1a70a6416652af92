use crate::config::persona::Persona;
use crate::llm::chat::{ ChatClient, ChatError };
use crate::models::api::RelayReply;
use crate::models::chat::Conversation;

use log::{ info, error };
use std::sync::Arc;
use uuid::Uuid;

const PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    Replied(RelayReply),
    Failed(RelayReply),
}

impl RelayOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RelayOutcome::Replied(_))
    }

    pub fn into_reply(self) -> RelayReply {
        match self {
            RelayOutcome::Replied(reply) | RelayOutcome::Failed(reply) => reply,
        }
    }
}

/// Turns one user message into one persona-framed completion call.
///
/// Holds no per-request state; clones share the same client and persona.
#[derive(Clone)]
pub struct ChatRelay {
    chat_client: Arc<dyn ChatClient>,
    persona: Arc<Persona>,
}

impl ChatRelay {
    pub fn new(chat_client: Arc<dyn ChatClient>, persona: Arc<Persona>) -> Self {
        Self { chat_client, persona }
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Every failure ends here as a `Failed` outcome carrying the persona's
    /// apology and the error text.
    pub async fn handle(&self, user_message: &str) -> RelayOutcome {
        let request_id = Uuid::new_v4();
        info!("[{}] User message: {}", request_id, preview(user_message));

        match self.relay(user_message).await {
            Ok(reply) => {
                info!("[{}] Response generated", request_id);
                RelayOutcome::Replied(RelayReply::success(reply))
            }
            Err(e) => {
                error!("[{}] Relay failed: {}", request_id, e);
                RelayOutcome::Failed(
                    RelayReply::failure(self.persona.failure_reply.clone(), e.to_string())
                )
            }
        }
    }

    async fn relay(&self, user_message: &str) -> Result<String, ChatError> {
        let conversation = Conversation::new(&self.persona, user_message);
        let completion = self.chat_client.complete(&conversation, self.persona.max_tokens).await?;

        Ok(
            completion.response
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| self.persona.empty_reply.clone())
        )
    }
}

fn preview(message: &str) -> String {
    let head: String = message.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", head)
}
