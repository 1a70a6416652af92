pub mod cli;
pub mod config;
pub mod llm;
pub mod models;
pub mod relay;
pub mod server;

use cli::Args;
use config::RelayConfig;
use log::info;
use relay::ChatRelay;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = RelayConfig::from_args(&args)?;

    info!("--- Core Configuration ---");
    info!("Listen Address: {}", config.addr);
    info!("Static Directory: {}", config.static_dir);
    info!("Chat Endpoint: {}", config.upstream.url);
    info!("Chat Model: {}", config.upstream.model);
    info!("Upstream Timeout: {:?}", config.upstream.timeout);
    info!("Upstream Max Retries: {}", config.upstream.max_retries);
    info!("Persona: {} (max_tokens={:?})", config.persona.name, config.persona.max_tokens);
    info!("TLS Enabled: {}", config.tls.is_some());
    info!("-------------------------");

    let chat_client = llm::chat::new_client(&config.upstream)?;
    info!("Chat client configured: Model={}", chat_client.get_model());

    let relay = Arc::new(ChatRelay::new(chat_client, config.persona.clone()));
    let server = Server::new(&config, relay);
    server.run().await?;

    Ok(())
}
