// Chat cleaner service - core orchestration for the garbage filter.
//
// This service handles:
// - Classifying each chat event against the currently stored options
// - Counting suppressed messages
// - Applying filter-language edits, keeping the old record on bad input
//
// NO feed or platform dependencies here - just pure domain logic.

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tracing::debug;

use super::cleaner_models::{ChatMessage, CleanerOptions, FilterRule, Verdict};
use super::filter_syntax::{self, FilterSyntaxError};
use super::message_filter::MessageFilter;
use super::options_store::{OptionsStore, StoreError};

#[derive(Debug, Error)]
pub enum CleanerError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error("Filter syntax error: {0}")]
    Syntax(#[from] FilterSyntaxError),
}

/// Garbage filter service. Generic over the options store so tests can run
/// against the in-memory implementation.
pub struct CleanerService<S: OptionsStore> {
    store: S,
    suppressed: AtomicU64,
}

impl<S: OptionsStore> CleanerService<S> {
    /// Create a new cleaner service with the given store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            suppressed: AtomicU64::new(0),
        }
    }

    /// Classify one message against the currently stored options.
    ///
    /// The options record is read and its rules compiled fresh on every
    /// call; compiled rules are a disposable view, so an edit through any
    /// path takes effect on the next message. A blocked verdict bumps the
    /// suppressed counter.
    pub async fn check_message(&self, message: &ChatMessage) -> Result<Verdict, CleanerError> {
        let options = self.store.load().await?;
        let filter = MessageFilter::compile(options)?;

        let verdict = filter.classify(message);
        if let Verdict::Blocked(reason) = &verdict {
            self.suppressed.fetch_add(1, Ordering::Relaxed);
            debug!(reason = %reason, text = %message.text, "message classified as garbage");
        }

        Ok(verdict)
    }

    /// Messages suppressed by this service instance so far. The count is
    /// not persisted; it lives and dies with the instance.
    pub fn suppressed_count(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    /// Get the current options record.
    pub async fn options(&self) -> Result<CleanerOptions, CleanerError> {
        Ok(self.store.load().await?)
    }

    /// Replace the options record wholesale.
    #[allow(dead_code)]
    pub async fn update_options(&self, options: CleanerOptions) -> Result<(), CleanerError> {
        Ok(self.store.save(&options).await?)
    }

    /// Apply an edited free-filter text.
    ///
    /// The text is parsed and compiled before anything is written, so on a
    /// syntax or compile error the stored record stays untouched and the
    /// previous rules remain in effect.
    pub async fn update_free_filters(&self, text: &str) -> Result<Vec<FilterRule>, CleanerError> {
        let rules = filter_syntax::parse_filters(text)?;
        filter_syntax::compile_rules(&rules)?;

        let mut options = self.store.load().await?;
        options.free_filters = rules.clone();
        self.store.save(&options).await?;

        Ok(rules)
    }

    /// Apply an edited allow-list text. Returns the parsed words.
    pub async fn update_allow_words(&self, text: &str) -> Result<Vec<String>, CleanerError> {
        let words = filter_syntax::parse_allow_words(text);

        let mut options = self.store.load().await?;
        options.allow_words = words.clone();
        self.store.save(&options).await?;

        Ok(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::options::MemoryOptionsStore;

    fn service_with(options: CleanerOptions) -> CleanerService<MemoryOptionsStore> {
        CleanerService::new(MemoryOptionsStore::new(options))
    }

    #[tokio::test]
    async fn test_normal_message_is_allowed() {
        let service = service_with(CleanerOptions::default());

        let verdict = service
            .check_message(&ChatMessage::new("Hello there friend", 0))
            .await
            .unwrap();

        assert_eq!(verdict, Verdict::Allowed);
        assert_eq!(service.suppressed_count(), 0);
    }

    #[tokio::test]
    async fn test_counter_tracks_suppressed_messages() {
        let service = service_with(CleanerOptions::default());

        // Hits the default "lulw" free filter
        let verdict = service
            .check_message(&ChatMessage::new("that was lulw material", 0))
            .await
            .unwrap();
        assert!(matches!(verdict, Verdict::Blocked(_)));

        service
            .check_message(&ChatMessage::new("Hello there friend", 0))
            .await
            .unwrap();

        assert_eq!(service.suppressed_count(), 1);
    }

    #[tokio::test]
    async fn test_options_edit_takes_effect_on_next_message() {
        let service = service_with(CleanerOptions::default());

        let message = ChatMessage::new("strictly fine message", 0);
        assert_eq!(service.check_message(&message).await.unwrap(), Verdict::Allowed);

        service.update_free_filters("strictly").await.unwrap();

        assert!(matches!(
            service.check_message(&message).await.unwrap(),
            Verdict::Blocked(_)
        ));
    }

    #[tokio::test]
    async fn test_malformed_filter_edit_keeps_previous_rules() {
        let service = service_with(CleanerOptions::default());

        let err = service.update_free_filters("lulw /unterminated").await;
        assert!(matches!(err, Err(CleanerError::Syntax(_))));

        // The stored record is untouched: still the three default rules
        let options = service.options().await.unwrap();
        assert_eq!(options.free_filters, CleanerOptions::default().free_filters);
    }

    #[tokio::test]
    async fn test_filter_edit_that_does_not_compile_keeps_previous_rules() {
        let service = service_with(CleanerOptions::default());

        // Parses as a regex entry but the pattern does not compile
        let err = service.update_free_filters("/((/").await;
        assert!(matches!(err, Err(CleanerError::Syntax(_))));

        let options = service.options().await.unwrap();
        assert_eq!(options.free_filters, CleanerOptions::default().free_filters);
    }

    #[tokio::test]
    async fn test_update_allow_words() {
        let service = service_with(CleanerOptions::default());

        let words = service.update_allow_words("streamer  mod").await.unwrap();
        assert_eq!(words, vec!["streamer".to_string(), "mod".to_string()]);

        // An allow hit now overrides the "lulw" default filter
        let verdict = service
            .check_message(&ChatMessage::new("lulw but streamer said so", 0))
            .await
            .unwrap();
        assert_eq!(verdict, Verdict::Allowed);
    }

    #[tokio::test]
    async fn test_disable_all_allows_everything() {
        let service = service_with(CleanerOptions {
            disable_all: true,
            ..CleanerOptions::default()
        });

        let verdict = service
            .check_message(&ChatMessage::new("LULW LULW LULW", 10))
            .await
            .unwrap();

        assert_eq!(verdict, Verdict::Allowed);
        assert_eq!(service.suppressed_count(), 0);
    }
}
