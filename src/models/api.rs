use serde::{ Serialize, Deserialize };

/// Body of `POST /api/void-ai`. A missing or null `message` is treated as empty.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct RelayRequest {
    #[serde(default)]
    pub message: Option<String>,
}

impl RelayRequest {
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or("")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RelayReply {
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl RelayReply {
    pub fn success(reply: impl Into<String>) -> Self {
        Self { reply: reply.into(), details: None }
    }

    pub fn failure(reply: impl Into<String>, details: impl Into<String>) -> Self {
        Self { reply: reply.into(), details: Some(details.into()) }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
}
