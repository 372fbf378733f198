//! Note domain model

use ethers::types::{Address, TxHash};
use serde::{Deserialize, Serialize};

/// A public note as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub text: String,
}

impl Note {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Raw `(author, timestamp, text)` tuple stored by the notes contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub author: Address,
    pub timestamp: u64,
    pub text: String,
}

impl From<NoteRecord> for Note {
    fn from(record: NoteRecord) -> Self {
        Self { text: record.text }
    }
}

/// Confirmation of a note transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
}

/// The full note history of one username hash, in chain order (oldest first)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NoteFeed {
    notes: Vec<Note>,
}

impl NoteFeed {
    pub fn new(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    /// Notes as returned by the contract
    pub fn chain_order(&self) -> &[Note] {
        &self.notes
    }

    /// Notes for display, most recent first
    pub fn display(&self) -> Vec<&Note> {
        self.notes.iter().rev().collect()
    }

    /// An empty feed is shown as "Notes not found", never as an empty list
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_reverse_chain_order() {
        let feed = NoteFeed::new(vec![Note::new("a"), Note::new("b"), Note::new("c")]);
        let shown: Vec<&str> = feed.display().iter().map(|n| n.text.as_str()).collect();
        assert_eq!(shown, vec!["c", "b", "a"]);

        let chain: Vec<&str> = feed.chain_order().iter().map(|n| n.text.as_str()).collect();
        assert_eq!(chain, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_record_keeps_only_text() {
        let record = NoteRecord {
            author: Address::repeat_byte(0x11),
            timestamp: 1_700_000_000,
            text: "hello".to_string(),
        };
        assert_eq!(Note::from(record), Note::new("hello"));
    }

    #[test]
    fn test_empty_feed() {
        let feed = NoteFeed::default();
        assert!(feed.is_empty());
        assert_eq!(feed.len(), 0);
        assert!(feed.display().is_empty());
    }
}
