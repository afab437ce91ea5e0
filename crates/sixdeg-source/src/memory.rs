//! In-memory entity source
//!
//! Useful for testing and for running queries over a dataset file.

use crate::dataset::Dataset;
use crate::detail::{GroupDetail, LocationDetail, NamePage};
use crate::error::{DatasetError, DatasetResult};
use async_trait::async_trait;
use sixdeg_core::{
    Entity, EntityId, EntitySource, RelationId, RelationKind, Relationship, SourceError,
    SourceResult,
};
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Default)]
struct Index {
    entities: HashMap<EntityId, (String, Option<u64>)>,
    groups: HashMap<u64, (String, Vec<EntityId>)>,
    memberships: HashMap<EntityId, Vec<u64>>,
    locations: HashMap<u64, String>,
    residents: HashMap<u64, Vec<EntityId>>,
}

impl Index {
    fn build(dataset: Dataset) -> Self {
        let mut index = Index::default();

        for entity in dataset.entities {
            let id = EntityId(entity.id);
            if let Some(location) = entity.location {
                index.residents.entry(location).or_default().push(id);
            }
            index.entities.insert(id, (entity.name, entity.location));
        }

        for group in dataset.groups {
            let members: Vec<EntityId> = group.members.into_iter().map(EntityId).collect();
            for member in &members {
                let joined = index.memberships.entry(*member).or_default();
                if !joined.contains(&group.id) {
                    joined.push(group.id);
                }
            }
            index.groups.insert(group.id, (group.title, members));
        }

        for location in dataset.locations {
            index.locations.insert(location.id, location.name);
        }

        index
    }

    fn entity(&self, id: EntityId) -> Option<Entity> {
        self.entities
            .get(&id)
            .map(|(name, _)| Entity::new(id, name.clone()))
    }
}

/// In-memory entity source
pub struct MemorySource {
    index: RwLock<Index>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self {
            index: RwLock::new(Index::default()),
        }
    }

    /// Build a source from a dataset, validating it first
    pub fn from_dataset(dataset: Dataset) -> DatasetResult<Self> {
        let source = Self::new();
        source.load(dataset)?;
        Ok(source)
    }

    /// Replace the current contents with `dataset`
    pub fn load(&self, dataset: Dataset) -> DatasetResult<()> {
        dataset.validate()?;
        let (entities, groups, locations) = (
            dataset.entities.len(),
            dataset.groups.len(),
            dataset.locations.len(),
        );

        let mut index = self
            .index
            .write()
            .map_err(|e| DatasetError::Lock(e.to_string()))?;
        *index = Index::build(dataset);

        tracing::info!(
            "Loaded {} entities, {} groups, {} locations",
            entities,
            groups,
            locations
        );
        Ok(())
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.index.read().map(|i| i.entities.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entities whose name contains `query`, ignoring case, ordered by id
    pub fn find_by_name(&self, query: &str) -> SourceResult<Vec<Entity>> {
        let index = self.read()?;
        let needle = query.to_lowercase();
        let mut found: Vec<Entity> = index
            .entities
            .iter()
            .filter(|(_, (name, _))| name.to_lowercase().contains(&needle))
            .map(|(id, (name, _))| Entity::new(*id, name.clone()))
            .collect();
        found.sort_by_key(|e| e.id);
        Ok(found)
    }

    /// One page of [`find_by_name`](Self::find_by_name) results
    pub fn find_page(
        &self,
        query: &str,
        page: usize,
        per_page: usize,
    ) -> SourceResult<NamePage> {
        let matches = self.find_by_name(query)?;
        Ok(NamePage::slice(matches, page, per_page))
    }

    /// Group title and members
    pub fn group(&self, id: u64) -> SourceResult<Option<GroupDetail>> {
        let index = self.read()?;
        Ok(index.groups.get(&id).map(|(title, members)| GroupDetail {
            id,
            title: title.clone(),
            members: members.iter().filter_map(|&m| index.entity(m)).collect(),
        }))
    }

    /// Location name and residents
    pub fn location(&self, id: u64) -> SourceResult<Option<LocationDetail>> {
        let index = self.read()?;
        let Some(name) = index.locations.get(&id) else {
            return Ok(None);
        };

        let mut residents: Vec<Entity> = index
            .residents
            .get(&id)
            .map(|ids| ids.iter().filter_map(|&r| index.entity(r)).collect())
            .unwrap_or_default();
        residents.sort_by_key(|e| e.id);

        Ok(Some(LocationDetail {
            id,
            name: name.clone(),
            residents,
        }))
    }

    fn read(&self) -> SourceResult<std::sync::RwLockReadGuard<'_, Index>> {
        self.index
            .read()
            .map_err(|e| SourceError::Lock(e.to_string()))
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntitySource for MemorySource {
    async fn lookup_entity(&self, id: EntityId) -> SourceResult<Option<Entity>> {
        Ok(self.read()?.entity(id))
    }

    async fn group_relations(&self, id: EntityId) -> SourceResult<Vec<Relationship>> {
        let index = self.read()?;
        let Some(groups) = index.memberships.get(&id) else {
            return Ok(Vec::new());
        };

        let mut found = Vec::new();
        for group_id in groups {
            if let Some((_, members)) = index.groups.get(group_id) {
                found.extend(
                    members
                        .iter()
                        .filter(|&&m| m != id)
                        .map(|&m| Relationship::new(*group_id, m)),
                );
            }
        }
        Ok(found)
    }

    async fn location_relations(&self, id: EntityId) -> SourceResult<Vec<Relationship>> {
        let index = self.read()?;
        let Some(location) = index.entities.get(&id).and_then(|(_, loc)| *loc) else {
            return Ok(Vec::new());
        };

        Ok(index
            .residents
            .get(&location)
            .map(|residents| {
                residents
                    .iter()
                    .filter(|&&r| r != id)
                    .map(|&r| Relationship::new(location, r))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn relation_label(
        &self,
        kind: RelationKind,
        relation: RelationId,
    ) -> SourceResult<Option<String>> {
        let index = self.read()?;
        Ok(match kind {
            RelationKind::Group => index.groups.get(&relation.0).map(|(t, _)| t.clone()),
            RelationKind::Location => index.locations.get(&relation.0).cloned(),
            RelationKind::None => None,
        })
    }
}
