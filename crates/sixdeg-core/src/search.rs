//! Shortest-path search over a lazily populated graph
//!
//! The search is a depth-first walk over a stack of levels (the
//! [`Frontier`]) that is repeated with a shrinking depth bound. The first
//! attempt finds *some* path; each following attempt drops the deepest level
//! and looks for a path at least one hop shorter, continuing from where the
//! previous attempt stopped. When an attempt exhausts the frontier, the last
//! path found is the shortest.
//!
//! Two rules keep this correct and terminating:
//!
//! - the [`VisitedDepth`] registry is shared by all attempts of a query and a
//!   node is only re-admitted at a strictly shallower depth than before;
//! - the target is never recorded, so later attempts can reach it again
//!   through other branches.

use crate::entity::{EntityId, RelationId, RelationKind};
use crate::error::Result;
use crate::graph::{Edge, RelationshipGraph};
use crate::limits::{validate_lookup_timeout, validate_search_depth, ValidationError};
use crate::populate::GraphPopulator;
use crate::source::EntitySource;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Search configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Longest path (in hops) worth looking for; unbounded when `None`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,

    /// Timeout for a single relationship lookup, in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookup_timeout_ms: Option<u64>,
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_lookup_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.lookup_timeout_ms = Some(timeout_ms);
        self
    }

    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if let Some(depth) = self.max_depth {
            validate_search_depth(depth)?;
        }
        if let Some(timeout_ms) = self.lookup_timeout_ms {
            validate_lookup_timeout(timeout_ms)?;
        }
        Ok(())
    }

    pub fn lookup_timeout(&self) -> Option<Duration> {
        self.lookup_timeout_ms.map(Duration::from_millis)
    }

    /// Frontier level bound for the first attempt; the root occupies one level
    fn level_bound(&self) -> Option<usize> {
        self.max_depth.map(|hops| hops as usize + 1)
    }
}

/// Stack of levels of pending edges
///
/// Level 0 holds the synthetic root edge. The top edge of every level is the
/// edge currently being explored at that depth, so reading the top edges from
/// the bottom up gives the path walked so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontier {
    levels: Vec<Vec<Edge>>,
}

impl Frontier {
    /// A frontier holding only the root edge at `reference`
    pub fn rooted_at(reference: EntityId) -> Self {
        Self {
            levels: vec![vec![Edge::root(reference)]],
        }
    }

    /// Number of levels
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Top level, if any
    fn top_level(&self) -> Option<&Vec<Edge>> {
        self.levels.last()
    }

    fn push_level(&mut self, level: Vec<Edge>) {
        self.levels.push(level);
    }

    /// Drop the deepest level
    pub fn pop_level(&mut self) -> Option<Vec<Edge>> {
        self.levels.pop()
    }

    /// Drop the top edge of the top level
    fn pop_edge(&mut self) -> Option<Edge> {
        self.levels.last_mut().and_then(|level| level.pop())
    }

    /// Top edge of each level, shallowest first
    pub fn path(&self) -> Path {
        let steps = self
            .levels
            .iter()
            .filter_map(|level| level.last())
            .map(|edge| PathStep {
                entity: edge.target,
                kind: edge.kind,
                relation: edge.relation,
            })
            .collect();
        Path { steps }
    }
}

/// Shallowest depth at which each node has been admitted during a query
#[derive(Debug, Clone, Default)]
pub struct VisitedDepth {
    depths: HashMap<EntityId, usize>,
}

impl VisitedDepth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth_of(&self, id: EntityId) -> Option<usize> {
        self.depths.get(&id).copied()
    }

    /// Whether admitting `id` at `depth` could still shorten a path
    pub fn admits(&self, id: EntityId, depth: usize) -> bool {
        self.depth_of(id).map_or(true, |seen| seen > depth)
    }

    /// Record `id` at `depth`, keeping the shallower of old and new
    pub fn record(&mut self, id: EntityId, depth: usize) {
        self.depths
            .entry(id)
            .and_modify(|seen| *seen = (*seen).min(depth))
            .or_insert(depth);
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }
}

/// Terminal state of a single attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The top edge of the frontier reaches the target
    Found,
    /// The frontier emptied without reaching the target
    Exhausted,
}

/// One step of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub entity: EntityId,
    pub kind: RelationKind,
    pub relation: RelationId,
}

impl PathStep {
    pub fn new(
        entity: impl Into<EntityId>,
        kind: RelationKind,
        relation: impl Into<RelationId>,
    ) -> Self {
        Self {
            entity: entity.into(),
            kind,
            relation: relation.into(),
        }
    }
}

/// Path from the reference to the target; the first step is the root
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    pub steps: Vec<PathStep>,
}

impl Path {
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Number of entities on the path
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of relationships crossed
    pub fn hops(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn entities(&self) -> Vec<EntityId> {
        self.steps.iter().map(|s| s.entity).collect()
    }
}

/// Search statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub attempts: u32,
    pub nodes_expanded: usize,
    pub edges_admitted: usize,
    pub max_depth_reached: usize,
    pub path_found: bool,
}

/// Shortest-path engine for a single query
///
/// Owns the query's relationship graph and populator; build a new engine
/// per query.
pub struct SearchEngine<'a, S: EntitySource + ?Sized> {
    source: &'a S,
    graph: RelationshipGraph,
    populator: GraphPopulator<'a, S>,
    config: SearchConfig,
    stats: SearchStats,
}

impl<'a, S: EntitySource + ?Sized> SearchEngine<'a, S> {
    pub fn new(source: &'a S, config: SearchConfig) -> Self {
        let populator = GraphPopulator::new(source).with_lookup_timeout(config.lookup_timeout());
        Self {
            source,
            graph: RelationshipGraph::new(),
            populator,
            config,
            stats: SearchStats::default(),
        }
    }

    pub fn graph(&self) -> &RelationshipGraph {
        &self.graph
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Find the shortest path from `reference` to `target`
    ///
    /// Returns `Ok(None)` when either endpoint is unknown to the source or no
    /// chain of relationships connects them. Only a failing endpoint lookup
    /// is an error.
    pub async fn find_shortest_path(
        &mut self,
        reference: EntityId,
        target: EntityId,
    ) -> Result<Option<Path>> {
        let (reference_entity, target_entity) = futures::try_join!(
            self.source.lookup_entity(reference),
            self.source.lookup_entity(target),
        )?;
        if reference_entity.is_none() || target_entity.is_none() {
            tracing::info!(
                "Endpoint not found (reference {}: {}, target {}: {})",
                reference,
                reference_entity.is_some(),
                target,
                target_entity.is_some()
            );
            return Ok(None);
        }
        self.graph.ensure_node(reference);
        self.graph.ensure_node(target);

        let mut visited = VisitedDepth::new();
        visited.record(reference, 0);
        let mut frontier = Frontier::rooted_at(reference);

        let bound = self.config.level_bound();
        if self.attempt(&mut frontier, target, &mut visited, bound).await
            == AttemptOutcome::Exhausted
        {
            tracing::info!("No connection between {} and {}", reference, target);
            return Ok(None);
        }

        let mut best = frontier.clone();
        tracing::debug!("First path: {} levels", best.depth());

        while frontier.depth() > 1 {
            frontier.pop_level();
            let bound = frontier.depth();
            match self
                .attempt(&mut frontier, target, &mut visited, Some(bound))
                .await
            {
                AttemptOutcome::Found => {
                    tracing::debug!("Shorter path: {} levels", frontier.depth());
                    best = frontier.clone();
                }
                AttemptOutcome::Exhausted => break,
            }
        }

        let path = best.path();
        self.stats.path_found = true;
        self.stats.nodes_expanded = self.populator.expanded_count();
        tracing::debug!(
            "Search {} -> {}: {} hops, {} attempts, {} nodes expanded, {} edges admitted",
            reference,
            target,
            path.hops(),
            self.stats.attempts,
            self.stats.nodes_expanded,
            self.stats.edges_admitted
        );

        Ok(Some(path))
    }

    /// Walk the frontier until its top edge reaches `target` or it empties
    ///
    /// With `max_depth`, the frontier never grows past that many levels.
    /// The frontier is left as-is on `Found`.
    pub async fn attempt(
        &mut self,
        frontier: &mut Frontier,
        target: EntityId,
        visited: &mut VisitedDepth,
        max_depth: Option<usize>,
    ) -> AttemptOutcome {
        self.stats.attempts += 1;

        while let Some(level) = frontier.top_level() {
            let depth = frontier.depth();
            let Some(edge) = level.last().copied() else {
                // level done; drop it along with the edge that opened it
                frontier.pop_level();
                frontier.pop_edge();
                continue;
            };

            if edge.target == target {
                return AttemptOutcome::Found;
            }

            if max_depth.is_some_and(|max| depth >= max) {
                frontier.pop_edge();
                continue;
            }

            let mut candidates = self.populator.edges_of(&mut self.graph, edge.target).await;
            let mut next = Vec::new();
            while let Some(candidate) = candidates.pop() {
                if !visited.admits(candidate.target, depth) {
                    continue;
                }
                next.push(candidate);
                if candidate.target == target {
                    break;
                }
                visited.record(candidate.target, depth);
            }

            if next.is_empty() {
                frontier.pop_edge();
            } else {
                tracing::trace!("Descending from {} with {} edges", edge.target, next.len());
                self.stats.edges_admitted += next.len();
                frontier.push_level(next);
                self.stats.max_depth_reached = self.stats.max_depth_reached.max(frontier.depth());
            }
        }

        self.stats.nodes_expanded = self.populator.expanded_count();
        AttemptOutcome::Exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::FixtureSource;

    fn steps(path: &Path) -> Vec<(u64, RelationKind, u64)> {
        path.steps()
            .iter()
            .map(|s| (s.entity.0, s.kind, s.relation.0))
            .collect()
    }

    async fn shortest(source: &FixtureSource, from: u64, to: u64) -> Option<Path> {
        let mut engine = SearchEngine::new(source, SearchConfig::default());
        engine
            .find_shortest_path(EntityId(from), EntityId(to))
            .await
            .unwrap()
    }

    /// 1..6 joined by group 10: 1-2, 1-3, 1-4, 2-3, 3-2, 3-4, 4-5
    fn scenario() -> FixtureSource {
        FixtureSource::new()
            .group(10, 1, 2)
            .group(10, 1, 3)
            .group(10, 1, 4)
            .group(10, 2, 3)
            .group(10, 3, 2)
            .group(10, 3, 4)
            .group(10, 4, 5)
            .entity(6, "Isolated")
    }

    #[tokio::test]
    async fn test_scenario_shortest_path() {
        let source = scenario();
        let path = shortest(&source, 1, 5).await.unwrap();

        assert_eq!(
            steps(&path),
            vec![
                (1, RelationKind::None, 0),
                (4, RelationKind::Group, 10),
                (5, RelationKind::Group, 10),
            ]
        );
    }

    #[tokio::test]
    async fn test_same_endpoint_is_single_step() {
        let source = scenario();
        let path = shortest(&source, 3, 3).await.unwrap();

        assert_eq!(steps(&path), vec![(3, RelationKind::None, 0)]);
        assert_eq!(path.hops(), 0);
        assert_eq!(source.relation_lookups(), 0);
    }

    #[tokio::test]
    async fn test_direct_edge_both_directions() {
        let source = FixtureSource::new().location(42, 7, 8);

        let forward = shortest(&source, 7, 8).await.unwrap();
        assert_eq!(
            steps(&forward),
            vec![(7, RelationKind::None, 0), (8, RelationKind::Location, 42)]
        );

        let backward = shortest(&source, 8, 7).await.unwrap();
        assert_eq!(
            steps(&backward),
            vec![(8, RelationKind::None, 0), (7, RelationKind::Location, 42)]
        );
    }

    #[tokio::test]
    async fn test_disconnected_is_not_found_both_ways() {
        let source = scenario();
        assert!(shortest(&source, 1, 6).await.is_none());
        assert!(shortest(&source, 6, 1).await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_endpoint_is_not_found() {
        let source = scenario();
        assert!(shortest(&source, 1, 99).await.is_none());
        assert!(shortest(&source, 99, 1).await.is_none());
        assert_eq!(source.relation_lookups(), 0);
    }

    #[tokio::test]
    async fn test_failing_endpoint_lookup_is_an_error() {
        let source = scenario().failing_entity(5);
        let mut engine = SearchEngine::new(&source, SearchConfig::default());
        let result = engine.find_shortest_path(EntityId(1), EntityId(5)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_prefers_shorter_of_two_routes() {
        // long route explored first: 1-10-11-12-13-2, short route 1-20-2
        let source = FixtureSource::new()
            .group(3, 1, 10)
            .group(3, 10, 11)
            .group(3, 11, 12)
            .group(3, 12, 13)
            .location(4, 13, 2)
            .group(1, 1, 20)
            .group(2, 20, 2);

        let path = shortest(&source, 1, 2).await.unwrap();
        assert_eq!(path.entities(), vec![EntityId(1), EntityId(20), EntityId(2)]);
    }

    #[tokio::test]
    async fn test_refines_path_found_through_deep_branch() {
        // the first attempt dives 1-2-3-4-5-6 before trying the 1-7-6 branch
        let source = FixtureSource::new()
            .group(2, 1, 2)
            .group(2, 2, 3)
            .group(2, 3, 4)
            .group(2, 4, 5)
            .group(2, 5, 6)
            .group(1, 1, 7)
            .group(1, 7, 6);

        let mut engine = SearchEngine::new(&source, SearchConfig::default());
        let path = engine
            .find_shortest_path(EntityId(1), EntityId(6))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(path.entities(), vec![EntityId(1), EntityId(7), EntityId(6)]);
        assert!(engine.stats().path_found);
        assert_eq!(engine.stats().attempts, 3);
    }

    #[tokio::test]
    async fn test_cycles_terminate() {
        // ring 1-2-3-4-5-6-1 with a tail 6-7
        let mut source = FixtureSource::new();
        for (a, b) in [(1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 1), (6, 7)] {
            source = source.group(100 + a, a, b);
        }

        let path = shortest(&source, 3, 7).await.unwrap();
        assert_eq!(path.hops(), 4);
        assert_eq!(path.steps()[0].entity, EntityId(3));
        assert_eq!(path.steps()[4].entity, EntityId(7));
    }

    #[tokio::test]
    async fn test_repeated_queries_agree_on_length() {
        let source = FixtureSource::new()
            .group(1, 1, 2)
            .group(1, 1, 3)
            .location(2, 2, 4)
            .location(3, 3, 4)
            .group(4, 4, 5);

        let first = shortest(&source, 1, 5).await.unwrap();
        let second = shortest(&source, 1, 5).await.unwrap();
        assert_eq!(first.hops(), 3);
        assert_eq!(first.hops(), second.hops());
    }

    #[tokio::test]
    async fn test_max_depth_limits_search() {
        let source = FixtureSource::new()
            .group(1, 1, 2)
            .group(1, 2, 3)
            .group(1, 3, 4);

        let mut engine = SearchEngine::new(&source, SearchConfig::new().with_max_depth(2));
        let found = engine
            .find_shortest_path(EntityId(1), EntityId(4))
            .await
            .unwrap();
        assert!(found.is_none());

        let mut engine = SearchEngine::new(&source, SearchConfig::new().with_max_depth(3));
        let found = engine
            .find_shortest_path(EntityId(1), EntityId(4))
            .await
            .unwrap();
        assert_eq!(found.unwrap().hops(), 3);
    }

    #[tokio::test]
    async fn test_max_search_depth_counts_hops() {
        let hops = crate::limits::MAX_SEARCH_DEPTH as u64;
        let source = (1..=hops).fold(FixtureSource::new(), |s, i| s.group(1, i, i + 1));

        let config = SearchConfig::new().with_max_depth(crate::limits::MAX_SEARCH_DEPTH);
        assert!(config.validate().is_ok());

        let mut engine = SearchEngine::new(&source, config);
        let found = engine
            .find_shortest_path(EntityId(1), EntityId(hops + 1))
            .await
            .unwrap();
        assert_eq!(found.unwrap().hops(), hops as usize);
    }

    #[tokio::test]
    async fn test_attempt_respects_bound() {
        let source = FixtureSource::new()
            .group(1, 1, 2)
            .group(1, 2, 3);
        let mut engine = SearchEngine::new(&source, SearchConfig::default());
        let mut visited = VisitedDepth::new();
        visited.record(EntityId(1), 0);
        let mut frontier = Frontier::rooted_at(EntityId(1));

        let outcome = engine
            .attempt(&mut frontier, EntityId(3), &mut visited, Some(2))
            .await;
        assert_eq!(outcome, AttemptOutcome::Exhausted);
        assert!(frontier.is_empty());
    }

    #[tokio::test]
    async fn test_target_is_never_recorded() {
        let source = scenario();
        let mut engine = SearchEngine::new(&source, SearchConfig::default());
        let mut visited = VisitedDepth::new();
        visited.record(EntityId(1), 0);
        let mut frontier = Frontier::rooted_at(EntityId(1));

        let outcome = engine
            .attempt(&mut frontier, EntityId(5), &mut visited, None)
            .await;
        assert_eq!(outcome, AttemptOutcome::Found);
        assert_eq!(visited.depth_of(EntityId(5)), None);
        assert_eq!(visited.depth_of(EntityId(4)), Some(1));
    }

    #[test]
    fn test_visited_depth_only_gets_shallower() {
        let mut visited = VisitedDepth::new();
        visited.record(EntityId(1), 3);
        visited.record(EntityId(1), 5);
        assert_eq!(visited.depth_of(EntityId(1)), Some(3));

        visited.record(EntityId(1), 2);
        assert_eq!(visited.depth_of(EntityId(1)), Some(2));

        assert!(!visited.admits(EntityId(1), 2));
        assert!(visited.admits(EntityId(1), 1));
        assert!(visited.admits(EntityId(9), 100));
    }

    #[test]
    fn test_frontier_path_reads_top_edges() {
        let mut frontier = Frontier::rooted_at(EntityId(1));
        frontier.push_level(vec![
            Edge::new(RelationKind::Group, RelationId(5), EntityId(3)),
            Edge::new(RelationKind::Location, RelationId(6), EntityId(2)),
        ]);

        assert_eq!(
            steps(&frontier.path()),
            vec![(1, RelationKind::None, 0), (2, RelationKind::Location, 6)]
        );
    }

    #[test]
    fn test_config_validation() {
        assert!(SearchConfig::default().validate().is_ok());
        assert!(SearchConfig::new().with_max_depth(0).validate().is_err());
        assert!(SearchConfig::new().with_lookup_timeout_ms(0).validate().is_err());
        assert_eq!(
            SearchConfig::new().with_lookup_timeout_ms(250).lookup_timeout(),
            Some(Duration::from_millis(250))
        );
    }
}
