//! Turns a found path into labelled, display-ready steps

use crate::entity::{EntityId, RelationId, RelationKind};
use crate::search::{Path, PathStep};
use crate::source::EntitySource;
use serde::{Deserialize, Serialize};

/// A path step with its labels resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedStep {
    pub entity: EntityId,

    /// Entity name; empty when the source could not provide it
    pub name: String,

    /// How this entity is related to the previous step
    pub kind: RelationKind,

    pub relation: RelationId,

    /// Label of the relationship instance; empty for the root step
    pub relation_label: String,
}

/// Resolved chain of entities from the reference to the target
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPath {
    pub steps: Vec<ResolvedStep>,
}

impl ResolvedPath {
    pub fn steps(&self) -> &[ResolvedStep] {
        &self.steps
    }

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

    pub fn first(&self) -> Option<&ResolvedStep> {
        self.steps.first()
    }

    pub fn last(&self) -> Option<&ResolvedStep> {
        self.steps.last()
    }

    /// The step following step `index`
    pub fn next_of(&self, index: usize) -> Option<&ResolvedStep> {
        self.steps.get(index + 1)
    }

    /// Consecutive `(from, to)` pairs; `to` carries the relationship
    pub fn links(&self) -> impl Iterator<Item = (&ResolvedStep, &ResolvedStep)> {
        self.steps.windows(2).map(|pair| (&pair[0], &pair[1]))
    }
}

/// Resolves entity names and relationship labels for a path
pub struct PathResolver<'a, S: EntitySource + ?Sized> {
    source: &'a S,
}

impl<'a, S: EntitySource + ?Sized> PathResolver<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Resolve every step concurrently, keeping path order
    ///
    /// Labels that cannot be resolved are left empty.
    pub async fn resolve(&self, path: &Path) -> ResolvedPath {
        let lookups = path.steps().iter().map(|step| self.resolve_step(*step));
        let steps = futures::future::join_all(lookups).await;
        ResolvedPath { steps }
    }

    async fn resolve_step(&self, step: PathStep) -> ResolvedStep {
        let (name, relation_label) =
            futures::join!(self.entity_name(step.entity), self.relation_label(step));

        ResolvedStep {
            entity: step.entity,
            name,
            kind: step.kind,
            relation: step.relation,
            relation_label,
        }
    }

    async fn entity_name(&self, id: EntityId) -> String {
        match self.source.lookup_entity(id).await {
            Ok(Some(entity)) => entity.name,
            Ok(None) => String::new(),
            Err(e) => {
                tracing::warn!("Could not resolve name of {}: {}", id, e);
                String::new()
            }
        }
    }

    async fn relation_label(&self, step: PathStep) -> String {
        if step.kind == RelationKind::None {
            return String::new();
        }
        match self.source.relation_label(step.kind, step.relation).await {
            Ok(label) => label.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(
                    "Could not resolve label of {} {}: {}",
                    step.kind,
                    step.relation,
                    e
                );
                String::new()
            }
        }
    }
}
