//! My Garden
//!
//! Plants the user already grows ("owned") and plants they want for an
//! upcoming project. A catalog plant appears at most once across both lists.

use serde::{Deserialize, Serialize};

use crate::catalog::Plant;
use crate::matching::rank_by_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Owned,
    Project,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GardenEntry {
    pub kind: ListKind,
    pub plant: Plant,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GardenListError {
    #[error("{0} is already in your garden")]
    AlreadyInGarden(String),

    #[error("plant {0} is not in your garden")]
    NotInGarden(String),
}

#[derive(Debug, Clone, Default)]
pub struct GardenList {
    entries: Vec<GardenEntry>,
}

impl GardenList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, plant_id: &str) -> bool {
        self.entries.iter().any(|e| e.plant.id == plant_id)
    }

    pub fn add(&mut self, plant: Plant, kind: ListKind) -> Result<&GardenEntry, GardenListError> {
        if self.contains(&plant.id) {
            return Err(GardenListError::AlreadyInGarden(plant.common_name));
        }
        tracing::info!("Added {} to garden ({:?})", plant.common_name, kind);
        self.entries.push(GardenEntry { kind, plant });
        let last = self.entries.len() - 1;
        Ok(&self.entries[last])
    }

    pub fn remove(&mut self, plant_id: &str) -> Result<GardenEntry, GardenListError> {
        let position = self
            .entries
            .iter()
            .position(|e| e.plant.id == plant_id)
            .ok_or_else(|| GardenListError::NotInGarden(plant_id.to_string()))?;
        Ok(self.entries.remove(position))
    }

    /// Mark a project plant as planted.
    pub fn promote(&mut self, plant_id: &str) -> Result<(), GardenListError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.plant.id == plant_id)
            .ok_or_else(|| GardenListError::NotInGarden(plant_id.to_string()))?;
        entry.kind = ListKind::Owned;
        Ok(())
    }

    fn sorted(&self, kind: ListKind) -> Vec<&Plant> {
        let mut plants: Vec<&Plant> = self
            .entries
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| &e.plant)
            .collect();
        rank_by_name(&mut plants);
        plants
    }

    pub fn owned(&self) -> Vec<&Plant> {
        self.sorted(ListKind::Owned)
    }

    pub fn projects(&self) -> Vec<&Plant> {
        self.sorted(ListKind::Project)
    }
}
