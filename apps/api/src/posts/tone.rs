//! Tone and length keys accepted from the client.
//!
//! Keys match exactly. Unknown keys never error; they resolve to the defaults
//! (`professional`, `medium`) so the demo tables always have an entry.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Funny,
    Inspirational,
    Educational,
}

impl Tone {
    pub fn from_key(key: &str) -> Self {
        match key {
            "professional" => Tone::Professional,
            "casual" => Tone::Casual,
            "funny" => Tone::Funny,
            "inspirational" => Tone::Inspirational,
            "educational" => Tone::Educational,
            _ => Tone::default(),
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Funny => "funny",
            Tone::Inspirational => "inspirational",
            Tone::Educational => "educational",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PostLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl PostLength {
    pub fn from_key(key: &str) -> Self {
        match key {
            "short" => PostLength::Short,
            "medium" => PostLength::Medium,
            "long" => PostLength::Long,
            _ => PostLength::default(),
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            PostLength::Short => "short",
            PostLength::Medium => "medium",
            PostLength::Long => "long",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_keys_round_trip() {
        for tone in [
            Tone::Professional,
            Tone::Casual,
            Tone::Funny,
            Tone::Inspirational,
            Tone::Educational,
        ] {
            assert_eq!(Tone::from_key(tone.key()), tone);
        }
    }

    #[test]
    fn test_unknown_tone_is_professional() {
        assert_eq!(Tone::from_key("sarcastic"), Tone::Professional);
        assert_eq!(Tone::from_key(""), Tone::Professional);
    }

    #[test]
    fn test_tone_key_must_match_exactly() {
        assert_eq!(Tone::from_key("Funny"), Tone::Professional);
        assert_eq!(Tone::from_key(" funny "), Tone::Professional);
        assert_eq!(Tone::from_key("funny"), Tone::Funny);
    }

    #[test]
    fn test_unknown_length_is_medium() {
        assert_eq!(PostLength::from_key("epic"), PostLength::Medium);
        assert_eq!(PostLength::from_key("LONG"), PostLength::Medium);
        assert_eq!(PostLength::from_key("long"), PostLength::Long);
    }
}
