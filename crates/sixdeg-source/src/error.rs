//! Dataset error types

use thiserror::Error;

/// Result type alias for dataset operations
pub type DatasetResult<T> = std::result::Result<T, DatasetError>;

/// Dataset loading and validation errors
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Duplicate entity: {0}")]
    DuplicateEntity(u64),

    #[error("Duplicate group: {0}")]
    DuplicateGroup(u64),

    #[error("Duplicate location: {0}")]
    DuplicateLocation(u64),

    #[error("Group {group} lists unknown entity {entity}")]
    UnknownMember { group: u64, entity: u64 },

    #[error("Entity {entity} lives at unknown location {location}")]
    UnknownLocation { entity: u64, location: u64 },

    #[error("Lock error: {0}")]
    Lock(String),
}
