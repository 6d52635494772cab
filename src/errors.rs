//! # Publish Pipeline Error Types Module
//!
//! This module defines custom error types used throughout the review-and-publish
//! pipeline. Each variant maps to one stage of the pipeline so failures can be
//! logged and reported per stage.

/// Custom error types for the publish pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum PublishError {
    /// Daily content fetch errors (transport, non-2xx, malformed body)
    ContentFetch(String),
    /// Access token acquisition errors
    Credential(String),
    /// Text enrichment errors (completion or token-count calls)
    Enrichment(String),
    /// Channel broadcast errors
    Broadcast(String),
}

impl std::fmt::Display for PublishError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PublishError::ContentFetch(msg) => write!(f, "Content fetch error: {msg}"),
            PublishError::Credential(msg) => write!(f, "Credential error: {msg}"),
            PublishError::Enrichment(msg) => write!(f, "Enrichment error: {msg}"),
            PublishError::Broadcast(msg) => write!(f, "Broadcast error: {msg}"),
        }
    }
}

impl std::error::Error for PublishError {}
