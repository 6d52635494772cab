//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{InputFile, ParseMode};
use tracing::{debug, error, info, warn};

// Import localization
use crate::localization::{t_args_lang, t_lang};

use crate::errors::PublishError;

use super::review_manager::prepare_publication;
use super::ui_builder::create_review_keyboard;
use super::BotContext;

pub async fn message_handler(bot: Bot, msg: Message, ctx: Arc<BotContext>) -> Result<()> {
    if let Some(text) = msg.text() {
        handle_text_message(&bot, &msg, text, ctx).await?;
    } else {
        debug!(chat_id = %msg.chat.id, "Received non-text message, ignoring");
    }

    Ok(())
}

async fn handle_text_message(
    bot: &Bot,
    msg: &Message,
    text: &str,
    ctx: Arc<BotContext>,
) -> Result<()> {
    debug!(chat_id = %msg.chat.id, message_length = text.len(), "Received text message from user");

    // Extract user's language code from Telegram
    let language_code = msg
        .from
        .as_ref()
        .and_then(|user| user.language_code.as_ref())
        .map(|s| s.as_str());

    // Handle /start command
    if text == "/start" {
        let welcome_message = format!(
            "👋 **{}**\n\n{}\n\n{}",
            t_lang("welcome-title", language_code),
            t_lang("welcome-description", language_code),
            t_lang("welcome-commands", language_code)
        );
        bot.send_message(msg.chat.id, welcome_message).await?;
    }
    // Handle /help command
    else if text == "/help" {
        let help_message = vec![
            t_lang("help-title", language_code),
            t_lang("help-apod", language_code),
            t_lang("help-tokens", language_code),
            t_lang("help-version", language_code),
        ]
        .join("\n\n");
        bot.send_message(msg.chat.id, help_message).await?;
    }
    // Handle /version command
    else if text == "/version" {
        bot.send_message(
            msg.chat.id,
            t_args_lang(
                "version-reply",
                &[("version", env!("CARGO_PKG_VERSION"))],
                language_code,
            ),
        )
        .await?;
    }
    // Handle /apod command with an optional date argument
    else if text == "/apod" || text.starts_with("/apod ") {
        let date_text = text
            .strip_prefix("/apod")
            .map(str::trim)
            .filter(|arg| !arg.is_empty());
        handle_publish_request(bot, &ctx, msg.chat.id, date_text, language_code).await?;
    }
    // Handle /tokens command with a text argument
    else if text == "/tokens" || text.starts_with("/tokens ") {
        let arg = text
            .strip_prefix("/tokens")
            .map(str::trim)
            .filter(|arg| !arg.is_empty());
        handle_token_count(bot, &ctx, msg.chat.id, arg, language_code).await?;
    }
    // Handle regular text messages
    else {
        info!(chat_id = %msg.chat.id, "Received non-command text");
        bot.send_message(msg.chat.id, t_lang("text-hint", language_code))
            .await?;
    }

    Ok(())
}

/// Run the fetch-translate-park pipeline and present the decision prompt
async fn handle_publish_request(
    bot: &Bot,
    ctx: &BotContext,
    chat_id: ChatId,
    date_text: Option<&str>,
    language_code: Option<&str>,
) -> Result<()> {
    info!(chat_id = %chat_id, date_text = ?date_text, "Received publish request");

    let record =
        match prepare_publication(&ctx.apod, &ctx.gigachat, &ctx.pending, chat_id, date_text)
            .await
        {
            Ok(record) => record,
            Err(e) => {
                // Stage details are already logged, notify the requester once
                let notice = match &e {
                    PublishError::ContentFetch(_) => t_lang("error-content-fetch", language_code),
                    PublishError::Credential(_) => t_lang("error-credential", language_code),
                    PublishError::Enrichment(_) => t_lang("error-enrichment", language_code),
                    PublishError::Broadcast(_) => t_lang("error-publish-failed", language_code),
                };
                bot.send_message(chat_id, notice).await?;
                return Ok(());
            }
        };

    let keyboard = create_review_keyboard(language_code);
    match reqwest::Url::parse(&record.photo_url) {
        Ok(photo_url) => {
            bot.send_photo(chat_id, InputFile::url(photo_url))
                .caption(record.caption.clone())
                .parse_mode(ParseMode::Markdown)
                .reply_markup(keyboard)
                .await?;
        }
        Err(e) => {
            // Present the caption for review anyway, the photo stays a link
            warn!(chat_id = %chat_id, error = %e, "Item URL is not a valid photo URL");
            bot.send_message(chat_id, record.caption.clone())
                .parse_mode(ParseMode::Markdown)
                .reply_markup(keyboard)
                .await?;
        }
    }

    Ok(())
}

/// Mint a fresh credential and report token usage for the given text
async fn handle_token_count(
    bot: &Bot,
    ctx: &BotContext,
    chat_id: ChatId,
    arg: Option<&str>,
    language_code: Option<&str>,
) -> Result<()> {
    let Some(text) = arg else {
        bot.send_message(chat_id, t_lang("tokens-usage", language_code))
            .await?;
        return Ok(());
    };

    let usage = async {
        let credential = ctx.gigachat.fetch_token().await?;
        ctx.gigachat.count_tokens(&credential, text).await
    }
    .await;

    match usage {
        Ok(usage) => {
            let tokens = usage.tokens.to_string();
            let characters = usage.characters.to_string();
            bot.send_message(
                chat_id,
                t_args_lang(
                    "tokens-reply",
                    &[("tokens", tokens.as_str()), ("characters", characters.as_str())],
                    language_code,
                ),
            )
            .await?;
        }
        Err(e) => {
            error!(chat_id = %chat_id, error = %e, "Token count failed");
            let notice = match &e {
                PublishError::Credential(_) => t_lang("error-credential", language_code),
                _ => t_lang("error-enrichment", language_code),
            };
            bot.send_message(chat_id, notice).await?;
        }
    }

    Ok(())
}
