//! UI Builder module for composing captions and decision keyboards

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

// Import localization
use crate::localization::t_lang;

/// Callback data for the publish decision button
pub const CALLBACK_PUBLISH: &str = "publish";

/// Callback data for the decline decision button
pub const CALLBACK_DECLINE: &str = "decline";

/// Telegram caption limit for media messages
const CAPTION_LIMIT: usize = 1024;

/// Compose the full post caption from the translated explanation and item metadata
pub fn format_post_caption(
    title: &str,
    date: &str,
    translated: &str,
    url: &str,
    hd_url: Option<&str>,
) -> String {
    let mut caption = format!("**{title}** ({date})\n\n`{translated}`\n\n[URL]({url})");
    if let Some(hd) = hd_url {
        caption.push_str(&format!("\n[HD URL]({hd})"));
    }
    truncate_caption(&caption)
}

/// Truncate a caption to the transport limit, keeping character boundaries
pub fn truncate_caption(text: &str) -> String {
    if text.chars().count() <= CAPTION_LIMIT {
        return text.to_string();
    }
    let truncated: String = text.chars().take(CAPTION_LIMIT - 1).collect();
    format!("{truncated}…")
}

/// Create the inline keyboard with the publish and decline actions
pub fn create_review_keyboard(language_code: Option<&str>) -> InlineKeyboardMarkup {
    let buttons = vec![vec![
        InlineKeyboardButton::callback(
            format!("✅ {}", t_lang("button-publish", language_code)),
            CALLBACK_PUBLISH.to_string(),
        ),
        InlineKeyboardButton::callback(
            format!("❌ {}", t_lang("button-decline", language_code)),
            CALLBACK_DECLINE.to_string(),
        ),
    ]];

    InlineKeyboardMarkup::new(buttons)
}
