pub mod api;

use crate::config::{ RelayConfig, TlsPaths };
use crate::relay::ChatRelay;
use self::api::{ router, AppState };
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use log::{ info, error };

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

pub struct Server {
    addr: SocketAddr,
    static_dir: String,
    tls: Option<TlsPaths>,
    relay: Arc<ChatRelay>,
}

impl Server {
    pub fn new(config: &RelayConfig, relay: Arc<ChatRelay>) -> Self {
        Self {
            addr: config.addr,
            static_dir: config.static_dir.clone(),
            tls: config.tls.clone(),
            relay,
        }
    }

    pub fn app(&self) -> Router {
        router(AppState { relay: self.relay.clone() }, &self.static_dir)
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let app = self.app();
        match &self.tls {
            Some(tls) => self.serve_tls(app, tls).await,
            None => self.serve_plain(app).await,
        }
    }

    async fn serve_plain(&self, app: Router) -> Result<(), Box<dyn Error + Send + Sync>> {
        let listener = tokio::net::TcpListener
            ::bind(self.addr).await
            .map_err(|e| format!("Failed to bind HTTP server to {}: {}", self.addr, e))?;
        info!("✨ Void AI backend running → http://{}", self.addr);

        axum::serve(listener, app.into_make_service()).with_graceful_shutdown(shutdown_signal()).await?;
        info!("HTTP server stopped");
        Ok(())
    }

    async fn serve_tls(&self, app: Router, tls: &TlsPaths) -> Result<(), Box<dyn Error + Send + Sync>> {
        info!(
            "TLS enabled. Loading certificate from '{}' and key from '{}'",
            tls.cert_path,
            tls.key_path
        );
        let tls_config = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path).await.map_err(
            |e| format!("Failed to load TLS certificate/key: {}", e)
        )?;

        let handle = axum_server::Handle::new();
        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        });

        info!("✨ Void AI backend running → https://{}", self.addr);
        axum_server
            ::bind_rustls(self.addr, tls_config)
            .handle(handle)
            .serve(app.into_make_service()).await?;
        info!("HTTPS server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}
