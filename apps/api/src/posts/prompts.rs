// Prompt templates for post composition.
// Placeholders are substituted with `str::replace`; keep the labels in
// POST_PROMPT_TEMPLATE in sync with the parser's TITLE/CAPTION/HASHTAGS.

pub const POST_PROMPT_TEMPLATE: &str = "\
Create a social media post in Hindi about \"{topic}\" with {tone} tone for {platforms}.
Length: {length}
Include: 1. Engaging title, 2. Main content, 3. Relevant hashtags
Format: TITLE: [title] CAPTION: [caption] HASHTAGS: [hashtags]";

pub const IMAGE_PROMPT_TEMPLATE: &str = "\
Eye-catching social media illustration about {topic}, {tone} mood, \
vibrant colors, clean composition, no text";

/// Used when the client selects no platform.
const DEFAULT_PLATFORMS: &str = "social media";

pub fn build_post_prompt(topic: &str, tone: &str, length: &str, platforms: &[String]) -> String {
    let platforms = platforms
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    let platforms = if platforms.is_empty() {
        DEFAULT_PLATFORMS.to_string()
    } else {
        platforms
    };

    POST_PROMPT_TEMPLATE
        .replace("{topic}", topic)
        .replace("{tone}", tone)
        .replace("{platforms}", &platforms)
        .replace("{length}", length)
}

pub fn build_image_prompt(topic: &str, tone: &str) -> String {
    IMAGE_PROMPT_TEMPLATE
        .replace("{topic}", topic)
        .replace("{tone}", tone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_prompt_fills_every_placeholder() {
        let prompt = build_post_prompt(
            "monsoon",
            "casual",
            "short",
            &["instagram".to_string(), "twitter".to_string()],
        );
        assert!(prompt.contains("about \"monsoon\" with casual tone for instagram, twitter."));
        assert!(prompt.contains("Length: short"));
        assert!(prompt.contains("TITLE: [title] CAPTION: [caption] HASHTAGS: [hashtags]"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_post_prompt_without_platforms_uses_default() {
        let prompt = build_post_prompt("monsoon", "casual", "short", &[" ".to_string()]);
        assert!(prompt.contains("for social media."));
    }

    #[test]
    fn test_image_prompt_mentions_topic_and_tone() {
        let prompt = build_image_prompt("monsoon", "inspirational");
        assert!(prompt.starts_with("Eye-catching social media illustration about monsoon, inspirational mood"));
    }
}
