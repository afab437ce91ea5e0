//! Sixdeg Core - Shortest-connection engine
//!
//! This crate finds the shortest chain of relationships between two
//! entities in a graph that is discovered lazily from an [`EntitySource`]
//! while the search runs.

pub mod entity;
pub mod error;
pub mod finder;
pub mod graph;
pub mod limits;
pub mod populate;
pub mod resolve;
pub mod search;
pub mod source;

#[cfg(test)]
pub(crate) mod fixtures;

pub use entity::{Entity, EntityId, RelationId, RelationKind};
pub use error::{Error, Result};
pub use finder::PathFinder;
pub use graph::{Edge, Node, RelationshipGraph};
pub use populate::GraphPopulator;
pub use resolve::{PathResolver, ResolvedPath, ResolvedStep};
pub use search::{
    AttemptOutcome, Frontier, Path, PathStep, SearchConfig, SearchEngine, SearchStats,
    VisitedDepth,
};
pub use source::{EntitySource, Relationship, SourceError, SourceResult};
