use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Server Args ---
    /// Interface the HTTP server binds to.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port the HTTP server listens on.
    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Directory holding the frontend bundle served on `/` and other non-API paths.
    #[arg(long, env = "STATIC_DIR", default_value = "frontend")]
    pub static_dir: String,

    // --- Chat LLM Provider Args ---
    /// API Key for the chat completion provider. Required; startup fails without it.
    #[arg(long, env = "PPLX_API_KEY", default_value = "", hide_env_values = true)]
    pub chat_api_key: String,

    /// Full URL of the chat completion endpoint (any OpenAI-compatible API).
    #[arg(long, env = "CHAT_BASE_URL", default_value = "https://api.perplexity.ai/chat/completions")]
    pub chat_base_url: String,

    /// Model name sent with every completion request (e.g., sonar, gpt-4o)
    #[arg(long, env = "CHAT_MODEL", default_value = "sonar")]
    pub chat_model: String,

    /// Seconds to wait for the completion provider before giving up on an attempt.
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value = "30")]
    pub upstream_timeout_secs: u64,

    /// Extra attempts after a connect error or timeout. 0 disables retries.
    #[arg(long, env = "UPSTREAM_MAX_RETRIES", default_value = "1")]
    pub upstream_max_retries: u32,

    // --- Persona Args ---
    /// Path to the persona definition file (system prompt, reply phrases, token cap).
    #[arg(long, env = "PERSONA_PATH", default_value = "json/persona.json")]
    pub persona_path: String,

    // --- TLS Args ---
    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    fn default_of(id: &str) -> String {
        let command = Args::command();
        let arg = command
            .get_arguments()
            .find(|a| a.get_id() == id)
            .unwrap_or_else(|| panic!("no argument '{id}'"));
        arg.get_default_values()
            .iter()
            .map(|v| v.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(",")
    }

    #[test]
    fn defaults_match_the_public_deployment() {
        assert_eq!(default_of("port"), "3000");
        assert_eq!(default_of("chat_model"), "sonar");
        assert_eq!(default_of("chat_base_url"), "https://api.perplexity.ai/chat/completions");
        assert_eq!(default_of("upstream_max_retries"), "1");
        assert_eq!(default_of("persona_path"), "json/persona.json");
        assert_eq!(default_of("enable_tls"), "false");
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "void-relay",
            "--port",
            "8080",
            "--chat-model",
            "sonar-pro",
            "--persona-path",
            "/etc/void/persona.json",
        ]).unwrap();
        assert_eq!(args.port, 8080);
        assert_eq!(args.chat_model, "sonar-pro");
        assert_eq!(args.persona_path, "/etc/void/persona.json");
    }
}
