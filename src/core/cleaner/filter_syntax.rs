// Filter mini-language - the textual encoding of filter rules.
//
// Users author rules as a single line of space-separated entries:
//
//   lulw "you can use quotes" /.*and regexes.*/i
//
// A bare word blocks messages containing it, a quoted phrase does the same
// for multi-word text, and /pattern/flags is a regular expression. This
// module owns both directions of the mapping (parse and serialize), the
// allow-list encoding, and the compilation of rules into ready matchers.
// Nothing else reads or writes the textual form.

use std::fmt;
use std::str::FromStr;

use regex::{Regex, RegexBuilder};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use super::cleaner_models::FilterRule;

#[derive(Debug, Error)]
pub enum FilterSyntaxError {
    #[error("unterminated regex entry: {0}")]
    UnterminatedRegex(String),
    #[error("unterminated quoted phrase: {0}")]
    UnterminatedPhrase(String),
    #[error("invalid regex /{pattern}/: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("unsupported flag '{flag}' in /{pattern}/{flags}")]
    UnsupportedFlag {
        flag: char,
        pattern: String,
        flags: String,
    },
    #[error("expected a single filter entry: {0}")]
    ExpectedSingleRule(String),
}

/// Parse a filter text into rules, in order of appearance.
///
/// Tokens are scanned left to right: `/.../flags` is a regex rule, a
/// double-quoted run is a literal with the exact quoted content, and
/// anything else is a literal ending at the next whitespace, quote or
/// slash. An unterminated `/` or `"` fails the whole parse; the caller
/// decides what to fall back to.
pub fn parse_filters(input: &str) -> Result<Vec<FilterRule>, FilterSyntaxError> {
    let mut rules = Vec::new();
    let mut rest = input;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        if let Some(body) = rest.strip_prefix('"') {
            let end = match body.find('"') {
                Some(end) => end,
                None => return Err(FilterSyntaxError::UnterminatedPhrase(rest.to_string())),
            };
            rules.push(FilterRule::Literal(body[..end].to_string()));
            rest = &body[end + 1..];
        } else if let Some(body) = rest.strip_prefix('/') {
            let end = match body.find('/') {
                Some(end) => end,
                None => return Err(FilterSyntaxError::UnterminatedRegex(rest.to_string())),
            };
            let after = &body[end + 1..];
            let flag_len = after
                .chars()
                .take_while(|c| c.is_ascii_alphabetic())
                .count();
            rules.push(FilterRule::Regex {
                pattern: body[..end].to_string(),
                flags: after[..flag_len].to_string(),
            });
            rest = &after[flag_len..];
        } else {
            let end = rest
                .find(|c: char| c.is_whitespace() || c == '"' || c == '/')
                .unwrap_or(rest.len());
            rules.push(FilterRule::Literal(rest[..end].to_string()));
            rest = &rest[end..];
        }
    }

    Ok(rules)
}

/// Render rules back into filter text, joined by single spaces.
///
/// Round trip law: `parse_filters(&serialize_filters(&rules))` yields the
/// same rules for any sequence whose literal text contains no double
/// quotes or slashes. Those characters are outside the supported alphabet.
pub fn serialize_filters(rules: &[FilterRule]) -> String {
    rules
        .iter()
        .map(FilterRule::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// The allow-list field is plain whitespace-separated words.
pub fn parse_allow_words(input: &str) -> Vec<String> {
    input.split_whitespace().map(str::to_string).collect()
}

pub fn serialize_allow_words(words: &[String]) -> String {
    words.join(" ")
}

impl fmt::Display for FilterRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterRule::Literal(text) => {
                if text.is_empty() || text.chars().any(char::is_whitespace) {
                    write!(f, "\"{}\"", text)
                } else {
                    write!(f, "{}", text)
                }
            }
            FilterRule::Regex { pattern, flags } => write!(f, "/{}/{}", pattern, flags),
        }
    }
}

impl FromStr for FilterRule {
    type Err = FilterSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rules = parse_filters(s)?;
        if rules.len() != 1 {
            return Err(FilterSyntaxError::ExpectedSingleRule(s.to_string()));
        }
        Ok(rules.remove(0))
    }
}

// The stored record keeps each rule as its textual form.

impl Serialize for FilterRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FilterRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

/// A rule plus its ready matcher. Compiled rules are a disposable view
/// derived from the stored options on every read, never cached across
/// configuration changes.
#[derive(Debug)]
pub struct CompiledRule {
    rule: FilterRule,
    matcher: Matcher,
}

#[derive(Debug)]
enum Matcher {
    /// Upper-cased needle for case-insensitive substring search.
    Substring(String),
    Pattern(Regex),
}

impl CompiledRule {
    pub fn matches(&self, text: &str) -> bool {
        match &self.matcher {
            Matcher::Substring(needle) => text.to_uppercase().contains(needle),
            Matcher::Pattern(regex) => regex.is_match(text),
        }
    }

    pub fn rule(&self) -> &FilterRule {
        &self.rule
    }
}

/// Compile rules into matchers, preserving order.
///
/// This is the step that rejects bad patterns, so classification itself
/// never fails: a rule set that compiled once matches any input.
pub fn compile_rules(rules: &[FilterRule]) -> Result<Vec<CompiledRule>, FilterSyntaxError> {
    rules.iter().map(compile_rule).collect()
}

fn compile_rule(rule: &FilterRule) -> Result<CompiledRule, FilterSyntaxError> {
    let matcher = match rule {
        FilterRule::Literal(text) => Matcher::Substring(text.to_uppercase()),
        FilterRule::Regex { pattern, flags } => Matcher::Pattern(build_regex(pattern, flags)?),
    };

    Ok(CompiledRule {
        rule: rule.clone(),
        matcher,
    })
}

fn build_regex(pattern: &str, flags: &str) -> Result<Regex, FilterSyntaxError> {
    let mut builder = RegexBuilder::new(pattern);
    if flags.is_empty() {
        builder.case_insensitive(true);
    }

    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'x' => {
                builder.ignore_whitespace(true);
            }
            // JavaScript flags with no meaning for a boolean test here
            'g' | 'u' | 'y' => {}
            other => {
                return Err(FilterSyntaxError::UnsupportedFlag {
                    flag: other,
                    pattern: pattern.to_string(),
                    flags: flags.to_string(),
                });
            }
        }
    }

    builder.build().map_err(|source| FilterSyntaxError::InvalidRegex {
        pattern: pattern.to_string(),
        source,
    })
}
