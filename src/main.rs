use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;

use astropost::bot::{callback_handler, message_handler, BotContext};
use astropost::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting Astropost Telegram Bot");

    let config = AppConfig::from_env()?;
    let ctx = Arc::new(BotContext::new(&config)?);

    // Initialize the bot
    let bot = Bot::new(config.bot_token.clone());

    info!("Bot initialized, starting dispatcher");

    // Set up the dispatcher with shared state
    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint({
            let ctx = Arc::clone(&ctx);
            move |bot: Bot, msg: Message| {
                let ctx = Arc::clone(&ctx);
                async move { message_handler(bot, msg, ctx).await }
            }
        }))
        .branch(Update::filter_callback_query().endpoint({
            let ctx = Arc::clone(&ctx);
            move |bot: Bot, q: teloxide::types::CallbackQuery| {
                let ctx = Arc::clone(&ctx);
                async move { callback_handler(bot, q, ctx).await }
            }
        }));

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
