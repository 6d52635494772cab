//! Review workflow module: composes a publication from the external services,
//! parks it in the pending store, and resolves publish/decline decisions.

use chrono::Utc;
use teloxide::types::ChatId;
use tracing::{error, info, warn};

use crate::apod::ApodClient;
use crate::errors::PublishError;
use crate::gigachat::GigaChatClient;
use crate::pending::{PendingPublication, PendingStore};

use super::ui_builder::{format_post_caption, CALLBACK_DECLINE, CALLBACK_PUBLISH};

/// Prefix prepended to the explanation before the completion call
const TRANSLATION_PROMPT: &str = "Переведи на русский - ";

/// A decision taken on a pending publication
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReviewAction {
    Publish,
    Decline,
}

impl ReviewAction {
    /// Parse an inline keyboard callback payload
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            CALLBACK_PUBLISH => Some(ReviewAction::Publish),
            CALLBACK_DECLINE => Some(ReviewAction::Decline),
            _ => None,
        }
    }
}

/// Result of applying a decision to the pending slot
///
/// `Broadcast` hands the record to the caller for the channel send; the slot
/// is already cleared, so a failed send is a terminal loss of that record.
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionOutcome {
    /// Record was pending and must now be sent to the channel
    Broadcast(PendingPublication),
    /// Nothing was pending (stale or repeated button press)
    NothingPending,
    /// Record (if any) was dropped without publishing
    Declined,
}

/// Resolve the requested date, falling back to today when absent or unparseable
pub fn resolve_date(date_text: Option<&str>) -> String {
    date_text
        .and_then(|text| chrono::NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok())
        .unwrap_or_else(|| Utc::now().date_naive())
        .format("%Y-%m-%d")
        .to_string()
}

/// Fetch, translate, compose, and park a publication for the conversation
///
/// Any stage failure short-circuits: nothing is stored and the error names
/// the failed stage. The stored record replaces any previous pending one for
/// the same conversation.
pub async fn prepare_publication(
    apod: &ApodClient,
    gigachat: &GigaChatClient,
    store: &PendingStore,
    chat_id: ChatId,
    date_text: Option<&str>,
) -> Result<PendingPublication, PublishError> {
    let date = resolve_date(date_text);
    info!(chat_id = %chat_id, date = %date, "Preparing publication");

    let item = apod.fetch(&date).await.map_err(|e| {
        error!(chat_id = %chat_id, error = %e, "Content fetch failed");
        e
    })?;

    if item.media_type != "image" {
        warn!(chat_id = %chat_id, media_type = %item.media_type, "Daily item is not an image");
    }

    let credential = gigachat.fetch_token().await.map_err(|e| {
        error!(chat_id = %chat_id, error = %e, "Credential request failed");
        e
    })?;

    let prompt = format!("{TRANSLATION_PROMPT}{}", item.explanation);
    let translated = gigachat.complete(&credential, &prompt).await.map_err(|e| {
        error!(chat_id = %chat_id, error = %e, "Translation failed");
        e
    })?;

    let caption = format_post_caption(
        &item.title,
        &item.date,
        &translated,
        &item.url,
        item.hdurl.as_deref(),
    );
    let record = PendingPublication {
        caption,
        photo_url: item.url,
    };

    store.put(chat_id, record.clone());
    info!(chat_id = %chat_id, "Publication parked for review");

    Ok(record)
}

/// Apply a decision to the conversation's pending slot
///
/// The slot is taken atomically, so of two racing presses only the first
/// observes the record; the second gets `NothingPending`.
pub fn decide(store: &PendingStore, chat_id: ChatId, action: ReviewAction) -> DecisionOutcome {
    match action {
        ReviewAction::Publish => match store.take(chat_id) {
            Some(record) => DecisionOutcome::Broadcast(record),
            None => {
                info!(chat_id = %chat_id, "Publish pressed with nothing pending");
                DecisionOutcome::NothingPending
            }
        },
        ReviewAction::Decline => {
            let dropped = store.take(chat_id).is_some();
            info!(chat_id = %chat_id, dropped, "Publication declined");
            DecisionOutcome::Declined
        }
    }
}
