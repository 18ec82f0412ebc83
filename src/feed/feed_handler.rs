// Feed-side garbage handling - translates core verdicts into feed actions.

use crate::core::cleaner::{ChatMessage, CleanerError, CleanerService, OptionsStore, Verdict};

use super::chat_event::ChatEvent;

/// Check one chat event and suppress it when it classifies as garbage.
///
/// Returns `true` if the message was suppressed. Suppressed messages are
/// logged with their text and reason so a feed operator can tune the
/// rules.
pub async fn handle_chat_event<S: OptionsStore>(
    service: &CleanerService<S>,
    event: &ChatEvent,
) -> Result<bool, CleanerError> {
    let message = ChatMessage::new(event.text.clone(), event.emotes);

    match service.check_message(&message).await? {
        Verdict::Allowed => Ok(false),
        Verdict::Blocked(reason) => {
            tracing::info!(
                user = %event.user,
                reason = %reason,
                text = %event.text,
                "filtered message"
            );
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cleaner::CleanerOptions;
    use crate::infra::options::MemoryOptionsStore;

    #[tokio::test]
    async fn test_allowed_event_passes_through() {
        let service = CleanerService::new(MemoryOptionsStore::default());
        let event = ChatEvent::decode(r#"{"user": "viewer1", "text": "Hello there friend"}"#);

        let suppressed = handle_chat_event(&service, &event).await.unwrap();

        assert!(!suppressed);
        assert_eq!(service.suppressed_count(), 0);
    }

    #[tokio::test]
    async fn test_garbage_event_is_suppressed_and_counted() {
        let service = CleanerService::new(MemoryOptionsStore::default());
        // Over the default emote threshold with empty text
        let event = ChatEvent::decode(r#"{"user": "viewer2", "text": "", "emotes": 5}"#);

        let suppressed = handle_chat_event(&service, &event).await.unwrap();

        assert!(suppressed);
        assert_eq!(service.suppressed_count(), 1);
    }

    #[tokio::test]
    async fn test_bare_text_garbage_is_suppressed() {
        let service = CleanerService::new(MemoryOptionsStore::new(CleanerOptions::default()));
        let event = ChatEvent::decode("THIS IS ALL CAPS GARBAGE");

        assert!(handle_chat_event(&service, &event).await.unwrap());
    }
}
