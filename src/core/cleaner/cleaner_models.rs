// Cleaner domain models - data structures for the garbage filter.
//
// These are pure domain types with no feed dependencies.
// The feed layer converts decoded chat events into these.

use serde::{Deserialize, Serialize};

/// A single user-authored filter rule.
///
/// The textual form (`word`, `"quoted phrase"`, `/pattern/flags`) is owned
/// by the `filter_syntax` module, which also provides the `Display`,
/// `FromStr` and serde encodings for this type, so the stored record is a
/// flat list of strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterRule {
    /// Case-insensitive substring match against the message text.
    Literal(String),
    /// Regular expression match. Empty flags mean case-insensitive.
    Regex { pattern: String, flags: String },
}

/// Configuration for the garbage filter.
///
/// Persisted as one flat JSON record. Every field has a default, so a
/// record written by an older version (or missing entirely) loads with the
/// gaps filled in. Ranges are not validated: an inverted word-count range
/// simply fails every non-empty message on one of the two bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerOptions {
    /// Bypass all checks
    pub disable_all: bool,
    /// Enable the duplicated-phrase and emote-count checks
    pub spammy: bool,
    /// Flag messages with no text content
    pub emoji_only: bool,
    /// Flag messages that are entirely upper-case
    pub all_caps: bool,
    /// Free filter rules, evaluated in order
    pub free_filters: Vec<FilterRule>,
    /// Upper bound on word count
    pub max_words: usize,
    /// Lower bound on word count (0 disables)
    pub min_words: usize,
    /// Ratio of total words to distinct words that counts as spam
    pub too_many_duplicates_threshold: f64,
    /// Emote-element count that counts as spam
    pub too_many_emotes_threshold: u32,
    /// Case-insensitive substrings that immediately allow a message,
    /// preceding all other rules
    pub allow_words: Vec<String>,
}

impl Default for CleanerOptions {
    fn default() -> Self {
        Self {
            disable_all: false,
            spammy: true,
            emoji_only: true,
            all_caps: true,
            free_filters: vec![
                FilterRule::Literal("lulw".to_string()),
                FilterRule::Literal("you can use quotes".to_string()),
                FilterRule::Regex {
                    pattern: ".*and regexes.*".to_string(),
                    flags: "i".to_string(),
                },
            ],
            max_words: 40,
            min_words: 1,
            too_many_duplicates_threshold: 1.7,
            too_many_emotes_threshold: 3,
            allow_words: Vec::new(),
        }
    }
}

/// One candidate message: trimmed text content plus the emote-element
/// count the feed observed alongside it. Emotes are not part of the text,
/// which is why an emote-only message arrives with empty text.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub text: String,
    pub emote_count: u32,
}

impl ChatMessage {
    pub fn new(text: impl Into<String>, emote_count: u32) -> Self {
        Self {
            text: text.into(),
            emote_count,
        }
    }
}

/// Why a message was classified as garbage.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockReason {
    TooManyEmotes,
    EmojiOnly,
    AllCaps,
    TooLong,
    TooShort,
    Spammy,
    /// The free filter that fired; displays as the rule's textual form.
    FreeFilter(FilterRule),
}

impl std::fmt::Display for BlockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockReason::TooManyEmotes => write!(f, "too many emoji"),
            BlockReason::EmojiOnly => write!(f, "emoji only"),
            BlockReason::AllCaps => write!(f, "all caps"),
            BlockReason::TooLong => write!(f, "too long"),
            BlockReason::TooShort => write!(f, "too short"),
            BlockReason::Spammy => write!(f, "spammy"),
            BlockReason::FreeFilter(rule) => write!(f, "{}", rule),
        }
    }
}

/// Result of classifying one message.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Allowed,
    Blocked(BlockReason),
}
