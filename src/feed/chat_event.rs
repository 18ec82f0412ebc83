// One decoded line of the incoming chat feed.

use serde::Deserialize;

/// A single chat event as delivered by the feed.
///
/// Feeds emit one JSON object per line:
///
///   {"user": "someone", "text": "hello there", "emotes": 2}
///
/// `emotes` counts the emote elements that arrived alongside the text;
/// they are not part of `text` itself, which is how an emote-only message
/// shows up with empty text. A line that is not a JSON object is taken as
/// bare message text from an unknown user with no emotes.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatEvent {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub emotes: u32,
}

impl ChatEvent {
    pub fn decode(line: &str) -> Self {
        serde_json::from_str(line).unwrap_or_else(|_| Self {
            user: String::new(),
            text: line.trim().to_string(),
            emotes: 0,
        })
    }
}
