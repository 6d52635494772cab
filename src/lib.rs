//! # Astropost Telegram Bot
//!
//! A Telegram bot that fetches the NASA Astronomy Picture of the Day,
//! translates its explanation via GigaChat, and holds the composed post for a
//! manual publish/decline decision before broadcasting it to a channel.

pub mod apod;
pub mod bot;
pub mod config;
pub mod errors;
pub mod gigachat;
pub mod localization;
pub mod pending;
