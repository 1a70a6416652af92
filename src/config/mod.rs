pub mod persona;

use crate::cli::Args;
use self::persona::{ load_persona, Persona, PersonaError };
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PPLX_API_KEY is required (set it in the environment, .env, or pass --chat-api-key)")]
    MissingApiKey,
    #[error("Chat model must not be empty")]
    EmptyModel,
    #[error("Invalid listen address '{0}'")]
    InvalidAddr(String),
    #[error("Both --tls-cert-path and --tls-key-path must be provided to enable TLS")]
    IncompleteTls,
    #[error(transparent)]
    Persona(#[from] PersonaError),
}

#[derive(Debug, Clone)]
pub struct TlsPaths {
    pub cert_path: String,
    pub key_path: String,
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub api_key: String,
    pub url: String,
    pub model: String,
    pub timeout: Duration,
    pub max_retries: u32,
}

/// Everything the relay needs, checked once before the server binds.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub addr: SocketAddr,
    pub static_dir: String,
    pub upstream: UpstreamConfig,
    pub persona: Arc<Persona>,
    pub tls: Option<TlsPaths>,
}

impl RelayConfig {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let upstream = upstream_from_args(args)?;
        let addr = listen_addr(args)?;
        let tls = tls_from_args(args)?;
        let persona = load_persona(&args.persona_path)?;

        Ok(Self {
            addr,
            static_dir: args.static_dir.clone(),
            upstream,
            persona,
            tls,
        })
    }
}

fn upstream_from_args(args: &Args) -> Result<UpstreamConfig, ConfigError> {
    let api_key = args.chat_api_key.trim();
    if api_key.is_empty() {
        return Err(ConfigError::MissingApiKey);
    }
    let model = args.chat_model.trim();
    if model.is_empty() {
        return Err(ConfigError::EmptyModel);
    }
    Ok(UpstreamConfig {
        api_key: api_key.to_string(),
        url: args.chat_base_url.clone(),
        model: model.to_string(),
        timeout: Duration::from_secs(args.upstream_timeout_secs),
        max_retries: args.upstream_max_retries,
    })
}

fn listen_addr(args: &Args) -> Result<SocketAddr, ConfigError> {
    let raw = format!("{}:{}", args.host, args.port);
    raw.parse::<SocketAddr>().map_err(|_| ConfigError::InvalidAddr(raw))
}

fn tls_from_args(args: &Args) -> Result<Option<TlsPaths>, ConfigError> {
    if !args.enable_tls {
        return Ok(None);
    }
    match (&args.tls_cert_path, &args.tls_key_path) {
        (Some(cert_path), Some(key_path)) =>
            Ok(
                Some(TlsPaths {
                    cert_path: cert_path.clone(),
                    key_path: key_path.clone(),
                })
            ),
        _ => Err(ConfigError::IncompleteTls),
    }
}
