//! Demo content: the deterministic post used when no text service answers.
//!
//! Pure lookup: title and hashtags keyed by tone, caption keyed by length.
//! No network, no randomness; the caller supplies the timestamp.

use chrono::{DateTime, Local};

use crate::models::post::{local_timestamp, ParsedPost};
use crate::posts::tone::{PostLength, Tone};

fn demo_title(topic: &str, tone: Tone) -> String {
    match tone {
        Tone::Professional => format!("{topic} - पेशेवर जानकारी"),
        Tone::Casual => format!("{topic} के बारे में आसान बातचीत"),
        Tone::Funny => format!("{topic} पर मजेदार टेक"),
        Tone::Inspirational => format!("{topic} से प्रेरणा"),
        Tone::Educational => format!("{topic} - जानें और सीखें"),
    }
}

fn demo_caption(topic: &str, length: PostLength) -> String {
    match length {
        PostLength::Short => format!(
            "आज {topic} के बारे में बात करते हैं! यह एक बहुत ही रोचक विषय है जिसके बारे में \
             हर किसी को पता होना चाहिए। क्या आपने कभी इसके बारे में सोचा है?"
        ),
        PostLength::Medium => format!(
            "{topic} आज के समय में बहुत महत्वपूर्ण हो गया है। इस पोस्ट में हम इसके विभिन्न \
             पहलुओं पर चर्चा करेंगे और जानेंगे कि यह हमारे जीवन को कैसे प्रभावित करता है। \
             आशा है आपको यह जानकारी उपयोगी लगेगी! अपने विचार कमेंट में जरूर बताएं।"
        ),
        PostLength::Long => format!(
            "{topic} पर यह विस्तृत पोस्ट आपको इस विषय की गहरी समझ प्रदान करेगी। हम चर्चा \
             करेंगे कि कैसे {topic} ने हमारे दैनिक जीवन को बदल दिया है, इसके फायदे और \
             चुनौतियाँ क्या हैं, और भविष्य में इसकी क्या संभावनाएँ हैं। यह जानकारी आपके लिए \
             बहुत उपयोगी साबित हो सकती है। पोस्ट को लाइक और शेयर करना न भूलें!"
        ),
    }
}

fn demo_hashtags(topic: &str, tone: Tone) -> String {
    let tags = match tone {
        Tone::Professional => "#पेशेवर #व्यवसाय #जानकारी #टिप्स",
        Tone::Casual => "#आरामदायक #बातचीत #दोस्त #जिंदगी",
        Tone::Funny => "#मजाक #हंसी #मनोरंजन #कॉमेडी #फनी",
        Tone::Inspirational => "#प्रेरणा #सफलता #मोटिवेशन #जीवन",
        Tone::Educational => "#शिक्षा #सीखना #ज्ञान #तथ्य",
    };
    format!("{} {tags}", topic_hashtag(topic))
}

/// `#` followed by the topic with all whitespace removed.
pub fn topic_hashtag(topic: &str) -> String {
    let compact: String = topic.chars().filter(|c| !c.is_whitespace()).collect();
    format!("#{compact}")
}

/// Builds a demo post. `tone` and `length` are echoed as given; unknown keys
/// select the `professional` / `medium` templates.
pub fn generate_demo_content(
    topic: &str,
    tone: &str,
    length: &str,
    at: DateTime<Local>,
) -> ParsedPost {
    let tone_key = Tone::from_key(tone);
    let length_key = PostLength::from_key(length);

    ParsedPost {
        title: demo_title(topic, tone_key),
        caption: demo_caption(topic, length_key),
        hashtags: demo_hashtags(topic, tone_key),
        topic: topic.to_string(),
        tone: tone.to_string(),
        length: length.to_string(),
        timestamp_local: local_timestamp(at),
    }
}
