// Core cleaner module - message classification and the filter language.
// Following the same layering as the rest of core: models, pure logic,
// store port, service.

pub mod cleaner_models;
pub mod cleaner_service;
pub mod filter_syntax;
pub mod message_filter;
pub mod options_store;

pub use cleaner_models::*;
pub use cleaner_service::*;
pub use filter_syntax::*;
pub use message_filter::*;
pub use options_store::*;
