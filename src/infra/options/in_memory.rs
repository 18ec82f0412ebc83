// In-memory implementation of OptionsStore.
//
// Used by the service tests and useful for embedding the cleaner without
// touching disk. Follows the same pattern as the JSON store, minus the
// persistence.

use crate::core::cleaner::{CleanerOptions, OptionsStore, StoreError};
use async_trait::async_trait;
use tokio::sync::RwLock;

pub struct MemoryOptionsStore {
    options: RwLock<CleanerOptions>,
}

impl MemoryOptionsStore {
    pub fn new(options: CleanerOptions) -> Self {
        Self {
            options: RwLock::new(options),
        }
    }
}

impl Default for MemoryOptionsStore {
    fn default() -> Self {
        Self::new(CleanerOptions::default())
    }
}

#[async_trait]
impl OptionsStore for MemoryOptionsStore {
    async fn load(&self) -> Result<CleanerOptions, StoreError> {
        Ok(self.options.read().await.clone())
    }

    async fn save(&self, options: &CleanerOptions) -> Result<(), StoreError> {
        *self.options.write().await = options.clone();
        Ok(())
    }
}
