use serde::{Deserialize, Serialize};

/// One line of `chapters.jsonl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRecord {
    pub sequence: usize,
    pub title: String,
    pub url: String,
    pub path: String,
    pub retrieved_at: String,
}
