//! Content Parser: pulls TITLE / CAPTION / HASHTAGS out of free-text model output.
//!
//! Each section runs from its label to the next label (or end of input) and
//! may span lines. A missing or blank section gets a topic-derived default,
//! so the result is always a complete `ParsedPost`.

use std::sync::LazyLock;

use chrono::{DateTime, Local};
use regex::Regex;
use tracing::debug;

use crate::models::post::{local_timestamp, ParsedPost};
use crate::posts::demo::topic_hashtag;

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)TITLE:\s*(.*?)(?:CAPTION:|HASHTAGS:|\z)").expect("valid title regex")
});
static CAPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)CAPTION:\s*(.*?)(?:HASHTAGS:|\z)").expect("valid caption regex")
});
static HASHTAGS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)HASHTAGS:\s*(.*)\z").expect("valid hashtags regex"));

fn default_title(topic: &str) -> String {
    format!("{topic} के बारे में रोचक जानकारी")
}

fn default_caption(topic: &str) -> String {
    format!("यह {topic} के बारे में एक दिलचस्प पोस्ट है।")
}

fn default_hashtags(topic: &str) -> String {
    format!("{} #जानकारी", topic_hashtag(topic))
}

/// First capture of `re` in `content`, trimmed; `None` when absent or blank.
fn section(re: &Regex, content: &str) -> Option<String> {
    re.captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn parse_generated_content(
    content: &str,
    topic: &str,
    tone: &str,
    length: &str,
    at: DateTime<Local>,
) -> ParsedPost {
    let title = section(&TITLE_RE, content);
    let caption = section(&CAPTION_RE, content);
    let hashtags = section(&HASHTAGS_RE, content);

    if title.is_none() || caption.is_none() || hashtags.is_none() {
        debug!(
            title = title.is_some(),
            caption = caption.is_some(),
            hashtags = hashtags.is_some(),
            "model output missing sections; using defaults"
        );
    }

    ParsedPost {
        title: title.unwrap_or_else(|| default_title(topic)),
        caption: caption.unwrap_or_else(|| default_caption(topic)),
        hashtags: hashtags.unwrap_or_else(|| default_hashtags(topic)),
        topic: topic.to_string(),
        tone: tone.to_string(),
        length: length.to_string(),
        timestamp_local: local_timestamp(at),
    }
}
