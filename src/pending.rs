//! # Pending Publication Store Module
//!
//! This module provides the thread-safe single-slot store for publications
//! awaiting a publish/decline decision. Each conversation owns at most one
//! slot; a new request for the same conversation silently replaces the
//! previous record.

use std::collections::HashMap;
use std::sync::Mutex;

use teloxide::types::ChatId;

/// A composed, not-yet-broadcast post awaiting a decision
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPublication {
    /// Fully composed caption (translated explanation, title, date, links)
    pub caption: String,
    /// URL of the image to broadcast
    pub photo_url: String,
}

/// Thread-safe mapping from conversation to its pending publication
///
/// # Contract
///
/// - `put` is an unconditional upsert, last-write-wins.
/// - `take` atomically removes and returns the record; of any set of
///   concurrent callers for the same key, exactly one receives it.
/// - Records have no expiry; a slot lives until taken or overwritten.
pub struct PendingStore {
    slots: Mutex<HashMap<ChatId, PendingPublication>>,
}

impl PendingStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Store a pending publication, replacing any existing one for the chat
    pub fn put(&self, chat_id: ChatId, record: PendingPublication) {
        let mut slots = self.slots.lock().unwrap();
        slots.insert(chat_id, record);
    }

    /// Atomically remove and return the pending publication for the chat
    pub fn take(&self, chat_id: ChatId) -> Option<PendingPublication> {
        let mut slots = self.slots.lock().unwrap();
        slots.remove(&chat_id)
    }

    /// Number of conversations with a pending publication
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap();
        slots.len()
    }

    /// Whether no publication is pending anywhere
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PendingStore {
    fn default() -> Self {
        Self::new()
    }
}
