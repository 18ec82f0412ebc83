use crate::core::cleaner::{CleanerOptions, OptionsStore, StoreError};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::RwLock;

/// JSON-backed options store. The whole record lives in a single flat file
/// that is rewritten on every save.
///
/// An unreadable or missing record loads as the defaults, so a corrupted
/// file degrades to out-of-the-box behavior instead of failing startup.
pub struct JsonOptionsStore {
    path: PathBuf,
    cache: RwLock<CleanerOptions>,
}

impl JsonOptionsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cache = if path.exists() {
            let file = std::fs::File::open(&path).expect("Failed to open options file");
            serde_json::from_reader(file).unwrap_or_default()
        } else {
            CleanerOptions::default()
        };

        Self {
            path,
            cache: RwLock::new(cache),
        }
    }

    async fn persist(&self) -> Result<(), StoreError> {
        let cache = self.cache.read().await;
        let file = std::fs::File::create(&self.path)?;
        serde_json::to_writer_pretty(file, &*cache)?;
        Ok(())
    }
}

#[async_trait]
impl OptionsStore for JsonOptionsStore {
    async fn load(&self) -> Result<CleanerOptions, StoreError> {
        let cache = self.cache.read().await;
        Ok(cache.clone())
    }

    async fn save(&self, options: &CleanerOptions) -> Result<(), StoreError> {
        let mut cache = self.cache.write().await;
        *cache = options.clone();
        drop(cache); // Release lock before persisting
        self.persist().await
    }
}
