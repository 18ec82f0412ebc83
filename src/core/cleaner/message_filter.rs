// Message classification - the ordered battery of garbage checks.
//
// A `MessageFilter` is compiled once from an options snapshot and then
// classifies any number of messages without touching shared state. The
// allow list is absolute and checked first; block checks run in a fixed
// priority order with the cheapest first, and the first hit decides the
// verdict.

use std::collections::HashSet;

use super::cleaner_models::{BlockReason, ChatMessage, CleanerOptions, Verdict};
use super::filter_syntax::{compile_rules, CompiledRule, FilterSyntaxError};

pub struct MessageFilter {
    options: CleanerOptions,
    filters: Vec<CompiledRule>,
}

/// Per-message context the block checks read from.
struct CheckContext<'a> {
    options: &'a CleanerOptions,
    filters: &'a [CompiledRule],
    trimmed: &'a str,
    words: Vec<&'a str>,
    emote_count: u32,
}

/// Block checks in priority order. The first one returning a reason wins,
/// so reordering this list is the only change needed to reprioritize.
const BLOCK_CHECKS: &[fn(&CheckContext<'_>) -> Option<BlockReason>] = &[
    too_many_emotes,
    emoji_only,
    all_caps,
    too_long,
    too_short,
    duplicated_phrase,
    free_filters,
];

impl MessageFilter {
    /// Compile an options snapshot into a ready filter.
    ///
    /// This is the only step that can fail (a free-filter rule that does
    /// not compile); classification itself is total.
    pub fn compile(options: CleanerOptions) -> Result<Self, FilterSyntaxError> {
        let filters = compile_rules(&options.free_filters)?;
        Ok(Self { options, filters })
    }

    /// Classify a single message. Pure: no I/O, no mutation, safe to call
    /// from any number of tasks at once.
    pub fn classify(&self, message: &ChatMessage) -> Verdict {
        if self.options.disable_all {
            return Verdict::Allowed;
        }

        let trimmed = message.text.trim();

        if self.is_allow_listed(trimmed) {
            return Verdict::Allowed;
        }

        let ctx = CheckContext {
            options: &self.options,
            filters: &self.filters,
            trimmed,
            // Single-space split, exactly; tabs do not separate words
            words: trimmed.split(' ').filter(|w| !w.is_empty()).collect(),
            emote_count: message.emote_count,
        };

        for check in BLOCK_CHECKS {
            if let Some(reason) = check(&ctx) {
                return Verdict::Blocked(reason);
            }
        }

        Verdict::Allowed
    }

    /// The allow list precedes every block rule: any entry found as a
    /// case-insensitive substring lets the message through unconditionally.
    /// An empty list allows nothing extra.
    fn is_allow_listed(&self, trimmed: &str) -> bool {
        if self.options.allow_words.is_empty() {
            return false;
        }

        let upper = trimmed.to_uppercase();
        self.options
            .allow_words
            .iter()
            .any(|word| upper.contains(&word.to_uppercase()))
    }
}

fn too_many_emotes(ctx: &CheckContext<'_>) -> Option<BlockReason> {
    (ctx.options.spammy && ctx.emote_count >= ctx.options.too_many_emotes_threshold)
        .then_some(BlockReason::TooManyEmotes)
}

fn emoji_only(ctx: &CheckContext<'_>) -> Option<BlockReason> {
    // Emotes are not text, so an emote-only message has empty trimmed text.
    // Emptiness alone blocks here, even with a sub-threshold emote count.
    (ctx.options.emoji_only && ctx.trimmed.is_empty()).then_some(BlockReason::EmojiOnly)
}

fn all_caps(ctx: &CheckContext<'_>) -> Option<BlockReason> {
    // Byte-for-byte comparison against the upper-cased form. Text without
    // any letters trivially matches and is also caught here.
    (ctx.options.all_caps && ctx.trimmed == ctx.trimmed.to_uppercase())
        .then_some(BlockReason::AllCaps)
}

fn too_long(ctx: &CheckContext<'_>) -> Option<BlockReason> {
    (ctx.words.len() > ctx.options.max_words).then_some(BlockReason::TooLong)
}

fn too_short(ctx: &CheckContext<'_>) -> Option<BlockReason> {
    (ctx.words.len() < ctx.options.min_words).then_some(BlockReason::TooShort)
}

fn duplicated_phrase(ctx: &CheckContext<'_>) -> Option<BlockReason> {
    // Zero words never count as duplicated; emptiness is governed by the
    // emoji-only and word-bound checks above.
    if !ctx.options.spammy || ctx.words.is_empty() {
        return None;
    }

    let distinct = ctx.words.iter().collect::<HashSet<_>>().len();
    let ratio = ctx.words.len() as f64 / distinct as f64;

    (ratio >= ctx.options.too_many_duplicates_threshold).then_some(BlockReason::Spammy)
}

fn free_filters(ctx: &CheckContext<'_>) -> Option<BlockReason> {
    ctx.filters
        .iter()
        .find(|compiled| compiled.matches(ctx.trimmed))
        .map(|compiled| BlockReason::FreeFilter(compiled.rule().clone()))
}
