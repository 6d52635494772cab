//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules for better organization:
//! - `message_handler`: Handles incoming commands and text messages
//! - `callback_handler`: Handles inline keyboard callback queries
//! - `review_manager`: Runs the fetch-translate-park pipeline and decisions
//! - `ui_builder`: Creates keyboards and composes captions

pub mod callback_handler;
pub mod message_handler;
pub mod review_manager;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::message_handler;

use anyhow::Result;
use teloxide::types::Recipient;

use crate::apod::ApodClient;
use crate::config::AppConfig;
use crate::gigachat::GigaChatClient;
use crate::pending::PendingStore;

/// Shared state handed to every handler invocation
pub struct BotContext {
    pub apod: ApodClient,
    pub gigachat: GigaChatClient,
    pub pending: PendingStore,
    pub channel: Option<Recipient>,
}

impl BotContext {
    /// Build the shared state from the process configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            apod: ApodClient::new(config.nasa_api_key.clone()),
            gigachat: GigaChatClient::new(config.gigachat_secret.clone())?,
            pending: PendingStore::new(),
            channel: config.channel.clone(),
        })
    }
}
