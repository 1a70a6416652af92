use crate::models::api::{ HealthStatus, RelayReply, RelayRequest };
use crate::relay::ChatRelay;
use std::path::Path;
use std::sync::Arc;
use axum::{
    body::Bytes,
    routing::{ get, post },
    Router,
    extract::State,
    response::{ IntoResponse, Response },
    http::StatusCode,
    Json,
};
use tower_http::cors::{ Any, CorsLayer };
use tower_http::services::ServeDir;
use log::{ info, warn };

pub const HEALTH_STATUS: &str = "✨ Void AI backend alive";

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<ChatRelay>,
}

/// API routes first; anything else falls through to the frontend bundle when
/// `static_dir` exists.
pub fn router(state: AppState, static_dir: &str) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    let mut app: Router<AppState> = Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/void-ai", post(relay_handler));

    if Path::new(static_dir).is_dir() {
        info!("Serving frontend from {}", static_dir);
        app = app.fallback_service(ServeDir::new(static_dir));
    } else {
        warn!("Static directory '{}' not found; only the API is served", static_dir);
    }

    app.layer(cors).with_state(state)
}

async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus { status: HEALTH_STATUS.to_string() })
}

async fn relay_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let request = match parse_relay_request(&body) {
        Ok(req) => req,
        Err(e) => {
            warn!("Rejected relay request body: {}", e);
            let reply = RelayReply::failure(
                state.relay.persona().failure_reply.clone(),
                format!("Invalid request body: {}", e)
            );
            return (StatusCode::BAD_REQUEST, Json(reply)).into_response();
        }
    };

    let outcome = state.relay.handle(request.message()).await;
    let code = if outcome.is_success() { StatusCode::OK } else { StatusCode::INTERNAL_SERVER_ERROR };
    (code, Json(outcome.into_reply())).into_response()
}

/// An empty body counts as `{}`.
fn parse_relay_request(body: &[u8]) -> Result<RelayRequest, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RelayRequest::default());
    }
    serde_json::from_slice(body)
}
