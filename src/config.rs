//! # Configuration Module
//!
//! Environment-backed configuration for the bot. The transport credential and
//! the content-provider key are required at startup; the enrichment secret and
//! the channel identifier are optional and fail the corresponding operation
//! at use time instead.

use std::env;

use anyhow::{Context, Result};
use teloxide::types::{ChatId, Recipient};
use tracing::warn;

/// Process configuration read from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Telegram bot API token
    pub bot_token: String,
    /// NASA API key for the daily picture endpoint
    pub nasa_api_key: String,
    /// GigaChat authorization secret for the token endpoint
    pub gigachat_secret: Option<String>,
    /// Public channel that approved posts are broadcast to
    pub channel: Option<Recipient>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let bot_token =
            env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;
        let nasa_api_key = env::var("NASA_API_KEY").context("NASA_API_KEY must be set")?;

        let gigachat_secret = env::var("GIGACHAT_TOKEN").ok();
        if gigachat_secret.is_none() {
            warn!("GIGACHAT_TOKEN is not set, translation requests will fail");
        }

        let channel = match env::var("TELEGRAM_CHANNEL_ID") {
            Ok(raw) => parse_channel(&raw),
            Err(_) => {
                warn!("TELEGRAM_CHANNEL_ID is not set, publishing to the channel will fail");
                None
            }
        };

        Ok(Self {
            bot_token,
            nasa_api_key,
            gigachat_secret,
            channel,
        })
    }
}

/// Parse a channel identifier: either an `@username` or a numeric chat id
pub fn parse_channel(raw: &str) -> Option<Recipient> {
    let raw = raw.trim();
    if raw.starts_with('@') {
        return Some(Recipient::ChannelUsername(raw.to_string()));
    }
    match raw.parse::<i64>() {
        Ok(id) => Some(Recipient::Id(ChatId(id))),
        Err(_) => {
            warn!(channel = %raw, "TELEGRAM_CHANNEL_ID is neither an @username nor a chat id");
            None
        }
    }
}
