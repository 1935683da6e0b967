//! Fallback art: a locally rendered gradient card used when every image
//! provider has failed. Deterministic for a given topic.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

pub const FALLBACK_LABEL: &str = "Fallback Art";

/// A gradient entry: keywords matched against the topic, then two stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gradient {
    pub key: &'static str,
    keywords: &'static [&'static str],
    pub from: &'static str,
    pub to: &'static str,
}

const GRADIENTS: &[Gradient] = &[
    Gradient {
        key: "technology",
        keywords: &["technology", "tech", "software", "gadget", "तकनीक", "टेक्नोलॉजी"],
        from: "#667eea",
        to: "#764ba2",
    },
    Gradient {
        key: "nature",
        keywords: &["nature", "environment", "forest", "प्रकृति", "पर्यावरण"],
        from: "#56ab2f",
        to: "#a8e063",
    },
    Gradient {
        key: "food",
        keywords: &["food", "recipe", "cooking", "खाना", "भोजन"],
        from: "#f12711",
        to: "#f5af19",
    },
    Gradient {
        key: "travel",
        keywords: &["travel", "trip", "tourism", "यात्रा"],
        from: "#2193b0",
        to: "#6dd5ed",
    },
    Gradient {
        key: "business",
        keywords: &["business", "finance", "startup", "व्यवसाय", "व्यापार"],
        from: "#141e30",
        to: "#243b55",
    },
    Gradient {
        key: "health",
        keywords: &["health", "fitness", "yoga", "स्वास्थ्य", "योग"],
        from: "#11998e",
        to: "#38ef7d",
    },
    Gradient {
        key: "education",
        keywords: &["education", "learning", "study", "शिक्षा"],
        from: "#f7971e",
        to: "#ffd200",
    },
    Gradient {
        key: "sports",
        keywords: &["sport", "cricket", "football", "खेल"],
        from: "#ee0979",
        to: "#ff6a00",
    },
    Gradient {
        key: "music",
        keywords: &["music", "song", "संगीत"],
        from: "#8e2de2",
        to: "#4a00e0",
    },
];

const DEFAULT_GRADIENT: Gradient = Gradient {
    key: "default",
    keywords: &[],
    from: "#4facfe",
    to: "#00f2fe",
};

/// First gradient, in table order, with a keyword occurring in the topic
/// (case-insensitive). `default` only when nothing matches.
pub fn gradient_for(topic: &str) -> Gradient {
    let topic = topic.to_lowercase();
    GRADIENTS
        .iter()
        .find(|g| g.keywords.iter().any(|k| topic.contains(k)))
        .copied()
        .unwrap_or(DEFAULT_GRADIENT)
}

/// Renders the fallback card for `topic` as an SVG data URI.
pub fn render(topic: &str) -> String {
    let gradient = gradient_for(topic);
    let svg = format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="512" height="512" viewBox="0 0 512 512">"#,
            r#"<defs><linearGradient id="g" x1="0" y1="0" x2="1" y2="1">"#,
            r#"<stop offset="0%" stop-color="{from}"/><stop offset="100%" stop-color="{to}"/>"#,
            r#"</linearGradient></defs>"#,
            r#"<rect width="512" height="512" fill="url(#g)"/>"#,
            r##"<text x="256" y="256" font-family="sans-serif" font-size="36" fill="#ffffff" "##,
            r#"text-anchor="middle" dominant-baseline="middle">{label}</text>"#,
            r#"</svg>"#
        ),
        from = gradient.from,
        to = gradient.to,
        label = escape_xml(topic.trim()),
    );
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
