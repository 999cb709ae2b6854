//! Typed errors for catalog lookups.

/// Errors surfaced by catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },
}

impl CatalogError {
    pub fn not_found(kind: RecordKind, id: &str) -> Self {
        CatalogError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// The kind of record a lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Asset,
    Avatar,
    Collection,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RecordKind::Asset => "Asset",
                RecordKind::Avatar => "Avatar",
                RecordKind::Collection => "Collection",
            }
        )
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
