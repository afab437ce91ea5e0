//! Scripted entity source for engine tests

use crate::entity::{Entity, EntityId, RelationId, RelationKind};
use crate::source::{EntitySource, Relationship, SourceError, SourceResult};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Default)]
pub struct FixtureSource {
    entities: HashMap<EntityId, String>,
    relations: HashMap<(RelationKind, EntityId), Vec<Relationship>>,
    labels: HashMap<(RelationKind, RelationId), String>,
    failing: HashSet<(RelationKind, EntityId)>,
    failing_entities: HashSet<EntityId>,
    delays: HashMap<(RelationKind, EntityId), Duration>,
    relation_lookups: AtomicUsize,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entity(mut self, id: u64, name: &str) -> Self {
        self.entities.insert(EntityId(id), name.to_string());
        self
    }

    /// Register a symmetric relationship, creating both entities if needed
    pub fn link(mut self, kind: RelationKind, relation: u64, a: u64, b: u64) -> Self {
        for (from, to) in [(a, b), (b, a)] {
            self.entities
                .entry(EntityId(from))
                .or_insert_with(|| format!("entity-{}", from));
            self.relations
                .entry((kind, EntityId(from)))
                .or_default()
                .push(Relationship::new(relation, to));
        }
        self
    }

    pub fn group(self, relation: u64, a: u64, b: u64) -> Self {
        self.link(RelationKind::Group, relation, a, b)
    }

    pub fn location(self, relation: u64, a: u64, b: u64) -> Self {
        self.link(RelationKind::Location, relation, a, b)
    }

    pub fn label(mut self, kind: RelationKind, relation: u64, label: &str) -> Self {
        self.labels
            .insert((kind, RelationId(relation)), label.to_string());
        self
    }

    pub fn failing(mut self, kind: RelationKind, id: u64) -> Self {
        self.failing.insert((kind, EntityId(id)));
        self
    }

    pub fn failing_entity(mut self, id: u64) -> Self {
        self.failing_entities.insert(EntityId(id));
        self
    }

    pub fn slow(mut self, kind: RelationKind, id: u64, delay: Duration) -> Self {
        self.delays.insert((kind, EntityId(id)), delay);
        self
    }

    pub fn relation_lookups(&self) -> usize {
        self.relation_lookups.load(Ordering::SeqCst)
    }

    async fn scripted(&self, kind: RelationKind, id: EntityId) -> SourceResult<Vec<Relationship>> {
        self.relation_lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(&(kind, id)) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(&(kind, id)) {
            return Err(SourceError::Unavailable(format!("{} lookup for {}", kind, id)));
        }
        Ok(self.relations.get(&(kind, id)).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl EntitySource for FixtureSource {
    async fn lookup_entity(&self, id: EntityId) -> SourceResult<Option<Entity>> {
        if self.failing_entities.contains(&id) {
            return Err(SourceError::Unavailable(format!("entity {}", id)));
        }
        Ok(self.entities.get(&id).map(|name| Entity::new(id, name.clone())))
    }

    async fn group_relations(&self, id: EntityId) -> SourceResult<Vec<Relationship>> {
        self.scripted(RelationKind::Group, id).await
    }

    async fn location_relations(&self, id: EntityId) -> SourceResult<Vec<Relationship>> {
        self.scripted(RelationKind::Location, id).await
    }

    async fn relation_label(
        &self,
        kind: RelationKind,
        relation: RelationId,
    ) -> SourceResult<Option<String>> {
        Ok(self.labels.get(&(kind, relation)).cloned())
    }
}
