use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use tokio::sync::mpsc;
use tower::limit::ConcurrencyLimitLayer;

use crate::bot::event::BotEvent;
use crate::github::webhook::GitHubWebhook;
use crate::github::WebhookSecret;

/// Shared server state for all axum handlers.
pub struct ServerState {
    event_queue: mpsc::Sender<BotEvent>,
    webhook_secret: WebhookSecret,
}

impl ServerState {
    pub fn new(event_queue: mpsc::Sender<BotEvent>, webhook_secret: WebhookSecret) -> Self {
        Self {
            event_queue,
            webhook_secret,
        }
    }

    pub fn get_webhook_secret(&self) -> &WebhookSecret {
        &self.webhook_secret
    }
}

pub type ServerStateRef = Arc<ServerState>;

pub fn create_app(state: ServerState) -> Router {
    Router::new()
        .route("/github", post(github_webhook_handler))
        .route("/health", get(health_handler))
        .layer(ConcurrencyLimitLayer::new(100))
        .with_state(Arc::new(state))
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "")
}

/// Axum handler that receives a webhook and sends it to the event channel.
async fn github_webhook_handler(
    State(state): State<ServerStateRef>,
    GitHubWebhook(event): GitHubWebhook,
) -> impl IntoResponse {
    match state.event_queue.send(event).await {
        Ok(()) => (StatusCode::OK, ""),
        Err(error) => {
            tracing::error!("Could not send webhook event: {error:?}");
            (StatusCode::INTERNAL_SERVER_ERROR, "")
        }
    }
}
