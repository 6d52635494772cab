//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{InputFile, ParseMode, Recipient};
use tracing::{debug, error, info};

// Import localization
use crate::localization::t_lang;

use crate::errors::PublishError;
use crate::pending::PendingPublication;

use super::review_manager::{decide, DecisionOutcome, ReviewAction};
use super::BotContext;

/// Handle callback queries from the publish/decline keyboard
pub async fn callback_handler(
    bot: Bot,
    q: teloxide::types::CallbackQuery,
    ctx: Arc<BotContext>,
) -> Result<()> {
    debug!(user_id = %q.from.id, data = ?q.data, "Received callback query from user");

    let language_code = q.from.language_code.as_deref();

    let action = q.data.as_deref().and_then(ReviewAction::parse);
    let (Some(action), Some(msg)) = (action, &q.message) else {
        // Unknown payload or inaccessible origin message, just clear the spinner
        bot.answer_callback_query(q.id).await?;
        return Ok(());
    };

    let chat_id = msg.chat().id;

    match decide(&ctx.pending, chat_id, action) {
        DecisionOutcome::Broadcast(record) => {
            match broadcast_record(&bot, ctx.channel.as_ref(), &record).await {
                Ok(()) => {
                    info!(chat_id = %chat_id, "Publication broadcast to the channel");
                    bot.answer_callback_query(q.id)
                        .text(t_lang("decision-published", language_code))
                        .await?;
                }
                Err(e) => {
                    // The slot is already cleared, the record is gone
                    error!(chat_id = %chat_id, error = %e, "Channel broadcast failed");
                    bot.answer_callback_query(q.id)
                        .text(t_lang("decision-publish-failed", language_code))
                        .await?;
                }
            }
        }
        DecisionOutcome::Declined => {
            bot.answer_callback_query(q.id)
                .text(t_lang("decision-declined", language_code))
                .await?;
            bot.send_message(chat_id, t_lang("decision-declined-notice", language_code))
                .await?;
        }
        DecisionOutcome::NothingPending => {
            bot.answer_callback_query(q.id)
                .text(t_lang("decision-nothing-pending", language_code))
                .await?;
        }
    }

    Ok(())
}

/// Send the record's photo and caption to the public channel
async fn broadcast_record(
    bot: &Bot,
    channel: Option<&Recipient>,
    record: &PendingPublication,
) -> Result<(), PublishError> {
    let channel = channel
        .ok_or_else(|| PublishError::Broadcast("TELEGRAM_CHANNEL_ID is not set".to_string()))?;

    let photo_url = reqwest::Url::parse(&record.photo_url)
        .map_err(|e| PublishError::Broadcast(format!("invalid photo url: {e}")))?;

    bot.send_photo(channel.clone(), InputFile::url(photo_url))
        .caption(record.caption.clone())
        .parse_mode(ParseMode::Markdown)
        .await
        .map_err(|e| PublishError::Broadcast(e.to_string()))?;

    Ok(())
}
