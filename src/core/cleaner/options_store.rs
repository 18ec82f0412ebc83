use super::cleaner_models::CleanerOptions;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Port for persisting the options record.
///
/// The record is a single flat document; implementations round-trip the
/// textual rule encodings unmodified and merge defaults over missing
/// fields on load.
#[async_trait]
pub trait OptionsStore: Send + Sync {
    async fn load(&self) -> Result<CleanerOptions, StoreError>;
    async fn save(&self, options: &CleanerOptions) -> Result<(), StoreError>;
}
