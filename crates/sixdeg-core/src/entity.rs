//! Entity (node) and relationship identifiers

use serde::{Deserialize, Serialize};

/// Unique identifier for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl EntityId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the relationship instance that caused an edge
/// (which group, which location)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RelationId(pub u64);

impl RelationId {
    /// Relation id carried by the synthetic root edge
    pub const ROOT: RelationId = RelationId(0);

    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl From<u64> for RelationId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for RelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of relationship connecting two entities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    /// Synthetic root edge; never created by population
    #[default]
    None,
    /// Co-membership of a group
    Group,
    /// Co-residence at a location
    Location,
}

impl RelationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Group => "group",
            Self::Location => "location",
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entity as returned by the entity source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier
    pub id: EntityId,

    /// Display name
    pub name: String,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
