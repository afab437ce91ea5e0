//! Relationship graph: an arena of nodes keyed by entity id
//!
//! Edges are undirected in meaning but stored twice, once in each
//! endpoint's adjacency, and both records always carry the same kind and
//! relation id. Nodes hold neighbor ids rather than references, so the
//! cyclic adjacency has a single owner.

use crate::entity::{EntityId, RelationId, RelationKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Directed record of a relationship, stored in the adjacency of one endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Relationship kind
    pub kind: RelationKind,

    /// Relationship instance that caused the edge
    pub relation: RelationId,

    /// Neighbor this edge leads to
    pub target: EntityId,
}

impl Edge {
    pub fn new(kind: RelationKind, relation: RelationId, target: EntityId) -> Self {
        Self {
            kind,
            relation,
            target,
        }
    }

    /// The synthetic edge that seeds a search at `reference`
    pub fn root(reference: EntityId) -> Self {
        Self::new(RelationKind::None, RelationId::ROOT, reference)
    }

    pub fn is_root(&self) -> bool {
        self.kind == RelationKind::None
    }
}

/// A node and its adjacency, in edge insertion order
#[derive(Debug, Clone)]
pub struct Node {
    id: EntityId,
    edges: Vec<Edge>,
    neighbors: HashMap<EntityId, usize>,
}

impl Node {
    fn new(id: EntityId) -> Self {
        Self {
            id,
            edges: Vec::new(),
            neighbors: HashMap::new(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Adjacency in insertion order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The edge leading to `neighbor`, if any
    pub fn edge_to(&self, neighbor: EntityId) -> Option<&Edge> {
        self.neighbors.get(&neighbor).map(|&i| &self.edges[i])
    }

    pub fn is_connected_to(&self, neighbor: EntityId) -> bool {
        self.neighbors.contains_key(&neighbor)
    }

    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    fn push_edge(&mut self, edge: Edge) {
        self.neighbors.insert(edge.target, self.edges.len());
        self.edges.push(edge);
    }
}

/// In-memory relationship graph for a single query
///
/// The graph only grows; there are no removal operations.
#[derive(Debug, Clone, Default)]
pub struct RelationshipGraph {
    nodes: HashMap<EntityId, Node>,
    edge_count: usize,
}

impl RelationshipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the node for `id`, creating an empty one if needed
    pub fn ensure_node(&mut self, id: EntityId) -> &Node {
        self.slot(id)
    }

    /// Connect `a` and `b` with a mirrored pair of edges
    ///
    /// Both nodes are created if missing. Self-edges, `RelationKind::None`
    /// edges and a second edge between an already connected pair are
    /// ignored; the first relationship between two entities wins.
    pub fn connect(
        &mut self,
        a: EntityId,
        b: EntityId,
        kind: RelationKind,
        relation: RelationId,
    ) -> &Node {
        self.slot(a);
        if a == b {
            return self.slot(a);
        }

        self.slot(b);
        if kind == RelationKind::None || self.slot(b).is_connected_to(a) {
            return self.slot(a);
        }

        self.slot(b).push_edge(Edge::new(kind, relation, a));
        self.slot(a).push_edge(Edge::new(kind, relation, b));
        self.edge_count += 1;

        tracing::trace!("Connected {} -[{} {}]- {}", a, kind, relation, b);
        self.slot(a)
    }

    pub fn node(&self, id: EntityId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    fn slot(&mut self, id: EntityId) -> &mut Node {
        self.nodes.entry(id).or_insert_with(|| Node::new(id))
    }
}
