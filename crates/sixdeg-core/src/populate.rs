//! Lazy graph population from an entity source

use crate::entity::{EntityId, RelationKind};
use crate::graph::{Edge, RelationshipGraph};
use crate::source::{EntitySource, Relationship, SourceError};
use std::collections::HashSet;
use std::time::Duration;

/// Expands nodes on first visit by asking the source for their relationships
///
/// Each node is expanded at most once per populator, whether or not any
/// relationships were found.
pub struct GraphPopulator<'a, S: EntitySource + ?Sized> {
    source: &'a S,
    expanded: HashSet<EntityId>,
    lookup_timeout: Option<Duration>,
}

impl<'a, S: EntitySource + ?Sized> GraphPopulator<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            expanded: HashSet::new(),
            lookup_timeout: None,
        }
    }

    /// Give up on a single relationship lookup after `timeout`
    pub fn with_lookup_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn is_expanded(&self, id: EntityId) -> bool {
        self.expanded.contains(&id)
    }

    /// Number of nodes expanded so far
    pub fn expanded_count(&self) -> usize {
        self.expanded.len()
    }

    /// Populate the edges of `id` unless that already happened
    ///
    /// Group and location lookups run concurrently. A failed lookup only
    /// loses the edges of its own kind. Returns `true` if this call did the
    /// expansion.
    pub async fn expand(&mut self, graph: &mut RelationshipGraph, id: EntityId) -> bool {
        if !self.expanded.insert(id) {
            return false;
        }

        graph.ensure_node(id);
        let (groups, locations) = futures::join!(
            self.lookup(RelationKind::Group, id),
            self.lookup(RelationKind::Location, id),
        );

        // Group edges first so a finished expansion is deterministic
        for (kind, found) in [
            (RelationKind::Group, groups),
            (RelationKind::Location, locations),
        ] {
            for rel in found {
                graph.connect(id, rel.entity, kind, rel.relation);
            }
        }

        tracing::trace!(
            "Expanded {}: {} neighbors",
            id,
            graph.node(id).map(|n| n.degree()).unwrap_or_default()
        );
        true
    }

    /// All edges of `id`, expanding it first if needed
    ///
    /// The edges are returned in insertion order, so `pop()` yields the most
    /// recently added edge first.
    pub async fn edges_of(&mut self, graph: &mut RelationshipGraph, id: EntityId) -> Vec<Edge> {
        self.expand(graph, id).await;
        graph
            .node(id)
            .map(|node| node.edges().to_vec())
            .unwrap_or_default()
    }

    async fn lookup(&self, kind: RelationKind, id: EntityId) -> Vec<Relationship> {
        let lookup = self.source.relations(kind, id);
        let result = match self.lookup_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, lookup).await {
                Ok(result) => result,
                Err(_) => Err(SourceError::Timeout {
                    operation: format!("{} relations of {}", kind, id),
                    timeout_ms: timeout.as_millis() as u64,
                }),
            },
            None => lookup.await,
        };

        match result {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("Skipping {} relations of {}: {}", kind, id, e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::RelationId;
    use crate::fixtures::FixtureSource;

    fn targets(edges: &[Edge]) -> Vec<u64> {
        edges.iter().map(|e| e.target.0).collect()
    }

    #[tokio::test]
    async fn test_expand_connects_both_kinds() {
        let source = FixtureSource::new()
            .group(10, 1, 2)
            .group(10, 1, 3)
            .location(7, 1, 4);
        let mut graph = RelationshipGraph::new();
        let mut populator = GraphPopulator::new(&source);

        assert!(populator.expand(&mut graph, EntityId(1)).await);

        let node = graph.node(EntityId(1)).unwrap();
        assert_eq!(targets(node.edges()), vec![2, 3, 4]);
        assert_eq!(
            node.edge_to(EntityId(4)),
            Some(&Edge::new(RelationKind::Location, RelationId(7), EntityId(4)))
        );
        assert!(graph.node(EntityId(4)).unwrap().is_connected_to(EntityId(1)));
    }

    #[tokio::test]
    async fn test_expand_happens_once() {
        let source = FixtureSource::new().group(10, 1, 2);
        let mut graph = RelationshipGraph::new();
        let mut populator = GraphPopulator::new(&source);

        assert!(populator.expand(&mut graph, EntityId(1)).await);
        assert!(!populator.expand(&mut graph, EntityId(1)).await);
        populator.edges_of(&mut graph, EntityId(1)).await;

        // one group and one location lookup
        assert_eq!(source.relation_lookups(), 2);
        assert_eq!(populator.expanded_count(), 1);
    }

    #[tokio::test]
    async fn test_node_without_relationships_is_marked_expanded() {
        let source = FixtureSource::new().entity(1, "Loner");
        let mut graph = RelationshipGraph::new();
        let mut populator = GraphPopulator::new(&source);

        assert!(populator.edges_of(&mut graph, EntityId(1)).await.is_empty());
        assert!(populator.is_expanded(EntityId(1)));
        assert!(graph.contains(EntityId(1)));
    }

    #[tokio::test]
    async fn test_failed_kind_does_not_block_the_other() {
        let source = FixtureSource::new()
            .group(10, 1, 2)
            .location(7, 1, 3)
            .failing(RelationKind::Group, 1);
        let mut graph = RelationshipGraph::new();
        let mut populator = GraphPopulator::new(&source);

        let edges = populator.edges_of(&mut graph, EntityId(1)).await;
        assert_eq!(targets(&edges), vec![3]);
    }

    #[tokio::test]
    async fn test_timed_out_lookup_is_skipped() {
        let source = FixtureSource::new()
            .group(10, 1, 2)
            .location(7, 1, 3)
            .slow(RelationKind::Location, 1, Duration::from_secs(5));
        let mut graph = RelationshipGraph::new();
        let mut populator =
            GraphPopulator::new(&source).with_lookup_timeout(Some(Duration::from_millis(20)));

        let edges = populator.edges_of(&mut graph, EntityId(1)).await;
        assert_eq!(targets(&edges), vec![2]);
    }

    #[tokio::test]
    async fn test_edges_pop_most_recent_first() {
        let source = FixtureSource::new().group(10, 1, 2);
        let mut graph = RelationshipGraph::new();
        graph.connect(EntityId(1), EntityId(5), RelationKind::Group, RelationId(3));
        let mut populator = GraphPopulator::new(&source);

        let mut edges = populator.edges_of(&mut graph, EntityId(1)).await;
        assert_eq!(edges.pop().map(|e| e.target), Some(EntityId(2)));
        assert_eq!(edges.pop().map(|e| e.target), Some(EntityId(5)));
        assert!(edges.pop().is_none());
    }
}
