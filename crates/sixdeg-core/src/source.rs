//! Entity source trait definition
//!
//! The engine never talks to a data provider directly; everything it learns
//! about entities and their relationships comes through [`EntitySource`].
//! Implementations may be slow or remote and are free to cache internally.

use crate::entity::{Entity, EntityId, RelationId, RelationKind};
use async_trait::async_trait;
use thiserror::Error;

/// Result type alias for entity source operations
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Entity source error types
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    #[error("Lookup timed out after {timeout_ms}ms: {operation}")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("Lock error: {0}")]
    Lock(String),
}

/// One relationship reported by the source: the instance that links the
/// queried entity to `entity`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Relationship {
    pub relation: RelationId,
    pub entity: EntityId,
}

impl Relationship {
    pub fn new(relation: impl Into<RelationId>, entity: impl Into<EntityId>) -> Self {
        Self {
            relation: relation.into(),
            entity: entity.into(),
        }
    }
}

/// Trait for entity source implementations
#[async_trait]
pub trait EntitySource: Send + Sync {
    /// Get an entity by id
    async fn lookup_entity(&self, id: EntityId) -> SourceResult<Option<Entity>>;

    /// Entities sharing a group with `id`, paired with the group id
    async fn group_relations(&self, id: EntityId) -> SourceResult<Vec<Relationship>>;

    /// Entities sharing a location with `id`, paired with the location id
    async fn location_relations(&self, id: EntityId) -> SourceResult<Vec<Relationship>>;

    /// Display label of a relationship instance
    async fn relation_label(
        &self,
        kind: RelationKind,
        relation: RelationId,
    ) -> SourceResult<Option<String>>;

    /// Relationships of `id` for one kind
    ///
    /// `RelationKind::None` never has relationships.
    async fn relations(
        &self,
        kind: RelationKind,
        id: EntityId,
    ) -> SourceResult<Vec<Relationship>> {
        match kind {
            RelationKind::Group => self.group_relations(id).await,
            RelationKind::Location => self.location_relations(id).await,
            RelationKind::None => Ok(Vec::new()),
        }
    }
}
