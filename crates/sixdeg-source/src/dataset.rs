//! Dataset file format
//!
//! ```json
//! {
//!   "entities": [{ "id": 1, "name": "Luke Skywalker", "location": 1 }],
//!   "groups": [{ "id": 1, "title": "A New Hope", "members": [1, 2] }],
//!   "locations": [{ "id": 1, "name": "Tatooine" }]
//! }
//! ```
//!
//! Location residents are derived from each entity's `location`.

use crate::error::{DatasetError, DatasetResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub members: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub id: u64,
    pub name: String,
}

/// Entities, the groups they belong to and the locations they live at
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub entities: Vec<EntityRecord>,
    #[serde(default)]
    pub groups: Vec<GroupRecord>,
    #[serde(default)]
    pub locations: Vec<LocationRecord>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and validate a dataset file
    pub fn from_path(path: impl AsRef<Path>) -> DatasetResult<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading dataset from {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate a dataset
    pub fn from_json(json: &str) -> DatasetResult<Self> {
        let dataset: Dataset = serde_json::from_str(json)?;
        dataset.validate()?;
        Ok(dataset)
    }

    pub fn with_entity(mut self, id: u64, name: impl Into<String>, location: Option<u64>) -> Self {
        self.entities.push(EntityRecord {
            id,
            name: name.into(),
            location,
        });
        self
    }

    pub fn with_group(mut self, id: u64, title: impl Into<String>, members: Vec<u64>) -> Self {
        self.groups.push(GroupRecord {
            id,
            title: title.into(),
            members,
        });
        self
    }

    pub fn with_location(mut self, id: u64, name: impl Into<String>) -> Self {
        self.locations.push(LocationRecord {
            id,
            name: name.into(),
        });
        self
    }

    /// Reject duplicate ids and references to missing entities or locations
    pub fn validate(&self) -> DatasetResult<()> {
        let mut entities = HashSet::new();
        for entity in &self.entities {
            if !entities.insert(entity.id) {
                return Err(DatasetError::DuplicateEntity(entity.id));
            }
        }

        let mut locations = HashSet::new();
        for location in &self.locations {
            if !locations.insert(location.id) {
                return Err(DatasetError::DuplicateLocation(location.id));
            }
        }

        let mut groups = HashSet::new();
        for group in &self.groups {
            if !groups.insert(group.id) {
                return Err(DatasetError::DuplicateGroup(group.id));
            }
            if let Some(&entity) = group.members.iter().find(|m| !entities.contains(m)) {
                return Err(DatasetError::UnknownMember {
                    group: group.id,
                    entity,
                });
            }
        }

        for entity in &self.entities {
            if let Some(location) = entity.location {
                if !locations.contains(&location) {
                    return Err(DatasetError::UnknownLocation {
                        entity: entity.id,
                        location,
                    });
                }
            }
        }

        Ok(())
    }
}
