// This is the entry point of the chat cleaner.
//
// **Architecture Overview:**
// - `core/` = Business logic (feed-agnostic classification)
// - `infra/` = Implementations of core traits (options storage)
// - `feed/` = Feed-specific adapters (event decoding, suppression)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize the service (dependency injection)
// 3. Run the feed loop: chat events in on stdin, allowed messages out

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "feed/feed_layer.rs"]
mod feed;
#[path = "infra/infra_layer.rs"]
mod infra;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::core::cleaner::{serialize_allow_words, serialize_filters, CleanerService};
use crate::feed::chat_event::ChatEvent;
use crate::feed::feed_handler::handle_chat_event;
use crate::infra::options::JsonOptionsStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // Keep the runtime options record in a dedicated folder by default so
    // the repo root stays tidy.
    let options_path = std::env::var("CHAT_CLEANER_OPTIONS")
        .unwrap_or_else(|_| "data/options.json".to_string());
    if let Some(parent) = std::path::Path::new(&options_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create options directory for {}", options_path)
            })?;
        }
    }

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Create the service with its store injected.

    let store = JsonOptionsStore::new(&options_path);
    let service = CleanerService::new(store);

    // One-shot rule edits via the environment, applied before the feed
    // starts. A malformed value aborts here, leaving the stored record as
    // it was.
    if let Ok(text) = std::env::var("CHAT_CLEANER_FILTERS") {
        let rules = service
            .update_free_filters(&text)
            .await
            .context("Invalid CHAT_CLEANER_FILTERS value")?;
        tracing::info!(filters = %serialize_filters(&rules), "free filters updated");
    }
    if let Ok(text) = std::env::var("CHAT_CLEANER_ALLOW") {
        let words = service
            .update_allow_words(&text)
            .await
            .context("Invalid CHAT_CLEANER_ALLOW value")?;
        tracing::info!(allow = %serialize_allow_words(&words), "allow words updated");
    }

    let options = service.options().await?;
    tracing::info!(
        path = %options_path,
        free_filters = options.free_filters.len(),
        allow_words = options.allow_words.len(),
        "chat cleaner ready"
    );

    // ========================================================================
    // FEED LOOP
    // ========================================================================
    // One chat event per line on stdin; allowed messages echo to stdout,
    // garbage is suppressed and logged with its reason.

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    while let Some(line) = lines.next_line().await.context("Failed to read chat feed")? {
        if line.trim().is_empty() {
            continue;
        }

        let event = ChatEvent::decode(&line);
        match handle_chat_event(&service, &event).await {
            Ok(true) => {} // Suppressed; already logged with its reason
            Ok(false) => println!("{}", event.text),
            Err(e) => tracing::error!("Failed to check message: {}", e),
        }
    }

    tracing::info!(
        suppressed = service.suppressed_count(),
        "feed closed, shutting down"
    );

    Ok(())
}
