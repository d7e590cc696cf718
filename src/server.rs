use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Router,
};
use log::{debug, error, info, warn};
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use thiserror::Error;
use url::Url;

use crate::commands::Command;
use crate::dispatcher::Dispatcher;
use crate::reply::ReplySink;
use crate::update::{DecodeError, Update};

pub const INDEX_TEXT: &str = "Sunrise Sunset Telegram Bot";
pub const WEBHOOK_OK: &str = "Webhook setup ok";
pub const WEBHOOK_FAILED: &str = "Webhook setup failed";
pub const SECRET_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

#[derive(Debug, Error)]
pub enum WebhookRegistrationError {
    #[error("WEBHOOK_URL is not configured")]
    NotConfigured,
    #[error("Telegram rejected the webhook: {0}")]
    Request(#[from] teloxide::RequestError),
}

/// Tells the platform where to deliver updates.
#[async_trait]
pub trait WebhookRegistrar: Send + Sync {
    async fn register(&self) -> Result<(), WebhookRegistrationError>;
}

pub struct TelegramRegistrar {
    bot: Bot,
    url: Option<Url>,
    secret: Option<String>,
}

impl TelegramRegistrar {
    pub fn new(bot: Bot, url: Option<Url>, secret: Option<String>) -> Self {
        Self { bot, url, secret }
    }
}

#[async_trait]
impl WebhookRegistrar for TelegramRegistrar {
    async fn register(&self) -> Result<(), WebhookRegistrationError> {
        let url = self.url.clone().ok_or(WebhookRegistrationError::NotConfigured)?;

        let request = self.bot.set_webhook(url.clone());
        match self.secret.clone() {
            Some(secret) => request.secret_token(secret).await?,
            None => request.await?,
        };
        info!("Webhook registered at {url}");

        if let Err(err) = self.bot.set_my_commands(Command::bot_commands()).await {
            warn!("Failed to publish the command menu: {err}");
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub sink: Arc<dyn ReplySink>,
    pub registrar: Arc<dyn WebhookRegistrar>,
    pub secret: Option<String>,
    /// Commands suffixed with another bot's name are not routed.
    pub bot_username: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/webhook", post(webhook))
        .route("/set_webhook", get(set_webhook).post(set_webhook))
        .with_state(state)
}

pub async fn serve(
    port: u16,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl-C: {err}");
            }
            info!("Shutting down");
        })
        .await?;
    Ok(())
}

async fn index() -> &'static str {
    INDEX_TEXT
}

async fn webhook(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> (StatusCode, &'static str) {
    if let Some(secret) = state.secret.as_deref() {
        let given = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());
        if given != Some(secret) {
            warn!("Rejected webhook call with a missing or wrong secret token");
            return (StatusCode::UNAUTHORIZED, "Unauthorized");
        }
    }

    match Update::decode(&body, &state.bot_username) {
        Ok(update) => state.dispatcher.dispatch(&update, state.sink.as_ref()).await,
        Err(DecodeError::Unsupported) => debug!("Skipping update without a message"),
        Err(err @ (DecodeError::Json(_) | DecodeError::Malformed(_))) => {
            error!("Error processing update: {err}")
        }
    }
    (StatusCode::OK, "OK")
}

async fn set_webhook(State(state): State<AppState>) -> &'static str {
    match state.registrar.register().await {
        Ok(()) => WEBHOOK_OK,
        Err(err) => {
            error!("Error setting webhook: {err}");
            WEBHOOK_FAILED
        }
    }
}
