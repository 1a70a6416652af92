use serde::{ Serialize, Deserialize };
use crate::config::persona::Persona;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// The persona instruction followed by the user's message. Nothing else is
/// ever replayed, so every conversation holds exactly these two turns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: [ChatMessage; 2],
}

impl Conversation {
    pub fn new(persona: &Persona, user_message: &str) -> Self {
        Self {
            messages: [
                ChatMessage {
                    role: Role::System,
                    content: persona.system_prompt.clone(),
                },
                ChatMessage {
                    role: Role::User,
                    content: user_message.to_string(),
                },
            ],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn user_message(&self) -> &str {
        &self.messages[1].content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn system_turn_precedes_user_turn() {
        let persona = Persona::new("void", "you are calm");
        let conversation = Conversation::new(&persona, "hello");

        assert_eq!(conversation.messages()[0].role, Role::System);
        assert_eq!(conversation.messages()[0].content, "you are calm");
        assert_eq!(conversation.messages()[1].role, Role::User);
        assert_eq!(conversation.user_message(), "hello");
    }

    #[test]
    fn serializes_as_a_plain_message_list() {
        let persona = Persona::new("void", "you are calm");
        let conversation = Conversation::new(&persona, "");

        assert_eq!(
            serde_json::to_value(&conversation).unwrap(),
            json!([
                { "role": "system", "content": "you are calm" },
                { "role": "user", "content": "" }
            ])
        );
    }
}
