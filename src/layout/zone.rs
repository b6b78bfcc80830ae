//! Garden zone state and derived layout
//!
//! A zone stores only the ordered list of placed plants. The 6×3 grid is
//! recomputed from that list on every render with fresh row cursors, so
//! removing a plant can shift the ones added after it.

use serde::Serialize;

use super::rows::{candidate_rows, classify_row, OverflowPolicy, PlacementRow, ROW_CAPACITY, ZONE_CAPACITY};
use crate::catalog::Plant;
use crate::matching::ZoneConditions;

/// One plant dropped onto a zone canvas. The same catalog plant may be
/// placed several times; `instance_id` tells the copies apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedPlant {
    pub instance_id: u64,
    pub plant: Plant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ZoneStatus {
    Empty,
    PartiallyFilled { placed: usize },
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum AddOutcome {
    Added { instance_id: u64 },
    /// Zone already holds 18 plants; nothing changed.
    ZoneFull,
}

impl AddOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added { .. })
    }
}

#[derive(Debug, Clone)]
pub struct GardenZoneState {
    pub id: u8,
    pub conditions: ZoneConditions,
    placed: Vec<PlacedPlant>,
    next_instance: u64,
}

impl GardenZoneState {
    pub fn new(id: u8, conditions: ZoneConditions) -> Self {
        GardenZoneState {
            id,
            conditions,
            placed: Vec::new(),
            next_instance: 1,
        }
    }

    /// Placed plants in insertion order.
    pub fn placed(&self) -> &[PlacedPlant] {
        &self.placed
    }

    pub fn len(&self) -> usize {
        self.placed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Append a plant. Capacity is checked before anything else; a full zone
    /// is a silent no-op reported as `ZoneFull`.
    pub fn add_plant(&mut self, plant: Plant) -> AddOutcome {
        if self.placed.len() >= ZONE_CAPACITY {
            tracing::debug!("Zone {} is full, ignoring {}", self.id, plant.common_name);
            return AddOutcome::ZoneFull;
        }

        let instance_id = self.next_instance;
        self.next_instance += 1;
        self.placed.push(PlacedPlant { instance_id, plant });
        AddOutcome::Added { instance_id }
    }

    /// Remove one placed plant. Returns it if it was present.
    pub fn remove_plant(&mut self, instance_id: u64) -> Option<PlacedPlant> {
        let position = self.placed.iter().position(|p| p.instance_id == instance_id)?;
        Some(self.placed.remove(position))
    }

    /// Clear the canvas. Conditions are kept.
    pub fn reset(&mut self) {
        self.placed.clear();
    }

    pub fn status(&self) -> ZoneStatus {
        match self.placed.len() {
            0 => ZoneStatus::Empty,
            n if n >= ZONE_CAPACITY => ZoneStatus::Full,
            n => ZoneStatus::PartiallyFilled { placed: n },
        }
    }

    /// Greedy single pass over the placed list in insertion order.
    pub fn layout(&self, policy: OverflowPolicy) -> ZoneLayout {
        let mut cursors = [0usize; 3];
        let mut grid: Vec<Option<GridCell>> = vec![None; ZONE_CAPACITY];
        let mut placements = Vec::with_capacity(self.placed.len());

        for placed in &self.placed {
            let first_choice = classify_row(&placed.plant);
            let target = candidate_rows(&placed.plant, policy)
                .into_iter()
                .find(|row| cursors[row.index()] < ROW_CAPACITY);

            let outcome = match target {
                Some(row) => {
                    let slot = cursors[row.index()];
                    cursors[row.index()] += 1;
                    let grid_index = row.grid_offset() + slot;
                    grid[grid_index] = Some(GridCell {
                        instance_id: placed.instance_id,
                        plant_id: placed.plant.id.clone(),
                        common_name: placed.plant.common_name.clone(),
                        image_url: placed.plant.image_url.clone(),
                        row,
                    });
                    PlacementOutcome::Placed { row, slot, grid_index }
                }
                None => {
                    tracing::debug!(
                        "Zone {}: no free slot for {} (first choice {})",
                        self.id,
                        placed.plant.common_name,
                        first_choice
                    );
                    PlacementOutcome::Unplaced
                }
            };

            placements.push(Placement {
                instance_id: placed.instance_id,
                plant_id: placed.plant.id.clone(),
                first_choice,
                outcome,
            });
        }

        ZoneLayout { grid, placements }
    }
}

/// What a rendered grid cell shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridCell {
    pub instance_id: u64,
    pub plant_id: String,
    pub common_name: String,
    pub image_url: Option<String>,
    pub row: PlacementRow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlacementOutcome {
    Placed {
        row: PlacementRow,
        slot: usize,
        grid_index: usize,
    },
    /// Every candidate row was full. The plant stays in the zone's list but
    /// is not drawn.
    Unplaced,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub instance_id: u64,
    pub plant_id: String,
    pub first_choice: PlacementRow,
    pub outcome: PlacementOutcome,
}

/// Derived view of one zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneLayout {
    /// 18 cells: back 0..6, middle 6..12, front 12..18.
    pub grid: Vec<Option<GridCell>>,
    /// One per placed plant, in insertion order.
    pub placements: Vec<Placement>,
}

impl ZoneLayout {
    /// Occupied cells per row, in back/middle/front order.
    pub fn row_counts(&self) -> [usize; 3] {
        let mut counts = [0usize; 3];
        for row in PlacementRow::ALL {
            let start = row.grid_offset();
            counts[row.index()] = self.grid[start..start + ROW_CAPACITY]
                .iter()
                .filter(|cell| cell.is_some())
                .count();
        }
        counts
    }

    pub fn unplaced(&self) -> impl Iterator<Item = &Placement> {
        self.placements
            .iter()
            .filter(|p| p.outcome == PlacementOutcome::Unplaced)
    }

    pub fn rendered(&self) -> usize {
        self.grid.iter().filter(|cell| cell.is_some()).count()
    }
}
