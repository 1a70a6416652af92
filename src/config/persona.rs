use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use log::info;

pub const DEFAULT_EMPTY_REPLY: &str = "the void is here… what’s moving inside you?";
pub const DEFAULT_FAILURE_REPLY: &str = "the void flickered… try again.";

#[derive(Debug, Error)]
pub enum PersonaError {
    #[error("Failed to read persona file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse persona file '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Persona field '{0}' must not be empty")]
    EmptyField(&'static str),
    #[error("Persona max_tokens must be greater than zero")]
    ZeroMaxTokens,
}

#[derive(Deserialize, Debug)]
struct PersonaFile {
    name: String,
    system_prompt: String,
    #[serde(default)]
    max_tokens: Option<u32>,
    #[serde(default)]
    empty_reply: Option<String>,
    #[serde(default)]
    failure_reply: Option<String>,
}

/// The instruction set injected as the system message of every conversation.
///
/// Built once at startup and shared read-only; nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub name: String,
    pub system_prompt: String,
    /// Output cap sent upstream. `None` leaves the provider default in place.
    pub max_tokens: Option<u32>,
    /// Substituted when the provider answers 2xx without usable text.
    pub empty_reply: String,
    /// Returned to the caller on every failed relay.
    pub failure_reply: String,
}

impl Persona {
    pub fn new(name: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            system_prompt: system_prompt.into(),
            max_tokens: None,
            empty_reply: DEFAULT_EMPTY_REPLY.to_string(),
            failure_reply: DEFAULT_FAILURE_REPLY.to_string(),
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    fn validate(&self) -> Result<(), PersonaError> {
        if self.name.trim().is_empty() {
            return Err(PersonaError::EmptyField("name"));
        }
        if self.system_prompt.trim().is_empty() {
            return Err(PersonaError::EmptyField("system_prompt"));
        }
        if self.empty_reply.trim().is_empty() {
            return Err(PersonaError::EmptyField("empty_reply"));
        }
        if self.failure_reply.trim().is_empty() {
            return Err(PersonaError::EmptyField("failure_reply"));
        }
        if self.max_tokens == Some(0) {
            return Err(PersonaError::ZeroMaxTokens);
        }
        Ok(())
    }
}

impl From<PersonaFile> for Persona {
    fn from(file: PersonaFile) -> Self {
        Self {
            name: file.name,
            system_prompt: file.system_prompt,
            max_tokens: file.max_tokens,
            empty_reply: file.empty_reply.unwrap_or_else(|| DEFAULT_EMPTY_REPLY.to_string()),
            failure_reply: file.failure_reply.unwrap_or_else(|| DEFAULT_FAILURE_REPLY.to_string()),
        }
    }
}

pub fn parse_persona(content: &str, path: &str) -> Result<Persona, PersonaError> {
    let file: PersonaFile = serde_json::from_str(content).map_err(|source| PersonaError::Json {
        path: path.to_string(),
        source,
    })?;
    let persona = Persona::from(file);
    persona.validate()?;
    Ok(persona)
}

pub fn load_persona<P: AsRef<Path>>(path: P) -> Result<Arc<Persona>, PersonaError> {
    let display = path.as_ref().display().to_string();
    let content = fs::read_to_string(&path).map_err(|source| PersonaError::Io {
        path: display.clone(),
        source,
    })?;
    let persona = parse_persona(&content, &display)?;
    info!(
        "Loaded persona '{}' from {} (max_tokens={:?})",
        persona.name,
        display,
        persona.max_tokens
    );
    Ok(Arc::new(persona))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn optional_fields_fall_back_to_defaults() {
        let persona = parse_persona(
            r#"{"name": "void", "system_prompt": "speak softly"}"#,
            "inline"
        ).unwrap();

        assert_eq!(persona.max_tokens, None);
        assert_eq!(persona.empty_reply, DEFAULT_EMPTY_REPLY);
        assert_eq!(persona.failure_reply, DEFAULT_FAILURE_REPLY);
    }

    #[test]
    fn explicit_fields_are_kept() {
        let persona = parse_persona(
            r#"{
                "name": "void",
                "system_prompt": "speak softly",
                "max_tokens": 200,
                "empty_reply": "still here.",
                "failure_reply": "lost the thread."
            }"#,
            "inline"
        ).unwrap();

        assert_eq!(persona.max_tokens, Some(200));
        assert_eq!(persona.empty_reply, "still here.");
        assert_eq!(persona.failure_reply, "lost the thread.");
    }

    #[test]
    fn blank_system_prompt_is_rejected() {
        let err = parse_persona(r#"{"name": "void", "system_prompt": "  \n "}"#, "inline").unwrap_err();
        assert!(matches!(err, PersonaError::EmptyField("system_prompt")));
    }

    #[test]
    fn zero_token_cap_is_rejected() {
        let err = parse_persona(
            r#"{"name": "void", "system_prompt": "x", "max_tokens": 0}"#,
            "inline"
        ).unwrap_err();
        assert!(matches!(err, PersonaError::ZeroMaxTokens));
    }

    #[test]
    fn malformed_json_names_the_file() {
        let err = parse_persona("{not json", "personas/broken.json").unwrap_err();
        assert!(err.to_string().contains("personas/broken.json"));
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"name": "void", "system_prompt": "breathe.", "max_tokens": 120}}"#).unwrap();

        let persona = load_persona(file.path()).unwrap();
        assert_eq!(persona.system_prompt, "breathe.");
        assert_eq!(persona.max_tokens, Some(120));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = load_persona("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, PersonaError::Io { .. }));
    }
}
