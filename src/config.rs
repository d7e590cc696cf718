use std::env;
use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;
use thiserror::Error;
use url::Url;

use crate::resolver::DEFAULT_API_URL;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TIMEZONE: &str = "Asia/Dhaka";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Process-wide settings, read once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub token: String,
    pub webhook_url: Option<Url>,
    pub webhook_secret: Option<String>,
    /// Asked from Telegram at startup when unset.
    pub bot_username: Option<String>,
    pub port: u16,
    pub api_url: String,
    pub upstream_timeout: Duration,
    pub timezone: Tz,
}

impl Config {
    /// Loads `.env` (if any) and then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = get("TELEGRAM_TOKEN")
            .or_else(|| get("TELOXIDE_TOKEN"))
            .ok_or(ConfigError::Missing("TELEGRAM_TOKEN"))?;

        let webhook_url = get("WEBHOOK_URL")
            .map(|raw| parse("WEBHOOK_URL", &raw))
            .transpose()?;

        Ok(Self {
            token,
            webhook_url,
            webhook_secret: get("WEBHOOK_SECRET"),
            bot_username: get("BOT_USERNAME")
                .map(|name| name.trim().trim_start_matches('@').to_string()),
            port: get("PORT")
                .map(|raw| parse("PORT", &raw))
                .transpose()?
                .unwrap_or(DEFAULT_PORT),
            api_url: get("SUNRISE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            upstream_timeout: Duration::from_secs(
                get("UPSTREAM_TIMEOUT_SECS")
                    .map(|raw| parse("UPSTREAM_TIMEOUT_SECS", &raw))
                    .transpose()?
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            timezone: parse(
                "TARGET_TIMEZONE",
                &get("TARGET_TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
            )?,
        })
    }
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}
