//! Caller-facing entry point for shortest-connection queries

use crate::entity::EntityId;
use crate::error::Result;
use crate::resolve::{PathResolver, ResolvedPath};
use crate::search::{SearchConfig, SearchEngine, SearchStats};
use crate::source::EntitySource;
use std::sync::Arc;

/// Finds and resolves the shortest connection between two entities
///
/// The source is shared between queries; the graph, expansion memo and
/// depth registry of each query are private to it, so a finder can serve
/// concurrent queries.
pub struct PathFinder<S: EntitySource + ?Sized> {
    source: Arc<S>,
    config: SearchConfig,
}

impl<S: EntitySource + ?Sized> Clone for PathFinder<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            config: self.config.clone(),
        }
    }
}

impl<S: EntitySource + ?Sized> PathFinder<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            config: SearchConfig::default(),
        }
    }

    /// Create a finder with a validated configuration
    pub fn with_config(source: Arc<S>, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { source, config })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Shortest resolved connection, or `None` if an endpoint is unknown or
    /// the two are not connected
    pub async fn find_shortest_path(
        &self,
        reference: EntityId,
        target: EntityId,
    ) -> Result<Option<ResolvedPath>> {
        let (path, _) = self.find_with_stats(reference, target).await?;
        Ok(path)
    }

    /// Like [`find_shortest_path`](Self::find_shortest_path), also returning
    /// search statistics
    pub async fn find_with_stats(
        &self,
        reference: EntityId,
        target: EntityId,
    ) -> Result<(Option<ResolvedPath>, SearchStats)> {
        tracing::debug!("Finding connection from {} to {}", reference, target);

        let mut engine = SearchEngine::new(&*self.source, self.config.clone());
        let path = engine.find_shortest_path(reference, target).await?;
        let stats = engine.stats().clone();

        let resolved = match path {
            Some(path) => Some(PathResolver::new(&*self.source).resolve(&path).await),
            None => None,
        };

        if let Some(ref resolved) = resolved {
            tracing::info!(
                "Connected {} to {} in {} hops",
                reference,
                target,
                resolved.hops()
            );
        }

        Ok((resolved, stats))
    }
}
