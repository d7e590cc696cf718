use std::env;
use std::process;
use std::sync::Arc;

use astrotucks_bot::config::Config;
use astrotucks_bot::dispatcher::Dispatcher;
use astrotucks_bot::resolver::SunriseSunsetClient;
use astrotucks_bot::server::{self, AppState, TelegramRegistrar};
use astrotucks_bot::state::InMemoryStore;
use log::{error, info};
use teloxide::prelude::*;

#[tokio::main]
async fn main() {
    pretty_env_logger::formatted_timed_builder()
        .parse_filters(&env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    // Nothing binds before the configuration is known to be complete.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("Invalid configuration: {err}");
            process::exit(1);
        }
    };

    let resolver = match SunriseSunsetClient::new(
        config.api_url.clone(),
        config.upstream_timeout,
        config.timezone,
    ) {
        Ok(resolver) => resolver,
        Err(err) => {
            error!("Failed to build the time API client: {err}");
            process::exit(1);
        }
    };

    let bot = Bot::new(config.token.clone());
    let bot_username = match config.bot_username.clone() {
        Some(name) => name,
        None => match bot.get_me().await {
            Ok(me) => me.username().to_string(),
            Err(err) => {
                error!("Failed to fetch the bot's username: {err}");
                process::exit(1);
            }
        },
    };
    let state = AppState {
        dispatcher: Arc::new(Dispatcher::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(resolver),
        )),
        sink: Arc::new(bot.clone()),
        registrar: Arc::new(TelegramRegistrar::new(
            bot,
            config.webhook_url.clone(),
            config.webhook_secret.clone(),
        )),
        secret: config.webhook_secret.clone(),
        bot_username,
    };

    info!(
        "Starting @{}, reporting times in {}",
        state.bot_username, config.timezone
    );
    if let Err(err) = server::serve(config.port, state).await {
        error!("Server error: {err}");
        process::exit(1);
    }
}
