use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A fully populated post, whether parsed from AI output or built from the
/// demo templates. Every field is always set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedPost {
    pub title: String,
    pub caption: String,
    pub hashtags: String,
    pub topic: String,
    pub tone: String,
    pub length: String,
    /// Local wall-clock time the post was produced, `d/m/yyyy, h:mm:ss am`.
    pub timestamp_local: String,
}

/// Where the post text came from; shown next to history entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentSource {
    #[serde(rename = "AI Generated")]
    AiGenerated,
    #[serde(rename = "Demo Content")]
    DemoContent,
}

/// Image attached to a composed post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostImage {
    pub url: String,
    pub source_label: String,
    /// True when every provider failed and the gradient card was used.
    pub fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub post: ParsedPost,
    pub source: ContentSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<PostImage>,
}

pub fn local_timestamp(at: DateTime<Local>) -> String {
    at.format("%-d/%-m/%Y, %-I:%M:%S %P").to_string()
}
