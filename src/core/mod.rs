//! Core business logic

pub mod catalog;
pub mod collections;
pub mod compat;
pub mod config;
pub mod error;
pub mod log;
pub mod model;
pub mod spend;

// Re-export main types for cleaner imports
pub use compat::{CompatQuery, CompatibilityMatrix, CompatibilityResult, Overall, Rating};
pub use error::CatalogError;
pub use model::{Asset, Avatar, Catalog, Collection, CollectionDraft, Selection};
pub use spend::{SpendAggregator, SpendReport};
