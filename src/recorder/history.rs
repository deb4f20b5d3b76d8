use chrono::Local;
use serde::{Deserialize, Serialize};

/// A completed transcription result displayed to the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Unique, monotonic id derived from creation time.
    pub id: i64,

    /// Transcript text returned by the relay.
    pub text: String,

    /// Human-readable capture time.
    pub timestamp: String,
}

/// In-memory, ordered list of completed transcriptions.
///
/// Entries are appended in completion order and never persisted. The user
/// can remove one entry by id or clear the whole list.
#[derive(Debug, Default)]
pub struct TranscriptHistory {
    entries: Vec<TranscriptEntry>,
    last_id: i64,
}

impl TranscriptHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new entry at the end, preserving insertion order.
    /// Ids come from the wall clock but are bumped on collision so they
    /// stay strictly increasing.
    pub fn push(&mut self, text: String) -> &TranscriptEntry {
        let mut id = chrono::Utc::now().timestamp_millis();
        if id <= self.last_id {
            id = self.last_id + 1;
        }
        self.last_id = id;

        self.entries.push(TranscriptEntry {
            id,
            text,
            timestamp: Local::now().format("%H:%M:%S").to_string(),
        });

        self.entries.last().expect("entry was just pushed")
    }

    /// Remove exactly one entry by id. Returns false (list unchanged) when
    /// no entry matches.
    pub fn delete(&mut self, id: i64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Empty the entire history. A no-op when already empty.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
