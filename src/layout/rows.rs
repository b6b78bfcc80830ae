//! Placement rows and overflow policy
//!
//! Row classification is evaluated in priority order:
//! 1. Back: a "2-4m"/"4m+" size band, or a type mentioning tree/hedge
//! 2. Middle: a "1-2m" size band, or a type mentioning shrub/fruit
//! 3. Front: everything else
//!
//! The tests read the declared type text, so "Fruit Tree" qualifies for both
//! back and middle.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use std::fmt;
use std::str::FromStr;

use crate::catalog::{Plant, PlantCategory};

/// Slots per row.
pub const ROW_CAPACITY: usize = 6;

/// Placed plants per zone (three rows of six).
pub const ZONE_CAPACITY: usize = ROW_CAPACITY * 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementRow {
    Back,
    Middle,
    Front,
}

impl PlacementRow {
    /// Top to bottom, as rendered.
    pub const ALL: [PlacementRow; 3] = [PlacementRow::Back, PlacementRow::Middle, PlacementRow::Front];

    /// Row position in `ALL`.
    pub fn index(self) -> usize {
        match self {
            PlacementRow::Back => 0,
            PlacementRow::Middle => 1,
            PlacementRow::Front => 2,
        }
    }

    /// First grid index of the row: back 0, middle 6, front 12.
    pub fn grid_offset(self) -> usize {
        self.index() * ROW_CAPACITY
    }
}

impl fmt::Display for PlacementRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlacementRow::Back => "back",
            PlacementRow::Middle => "middle",
            PlacementRow::Front => "front",
        })
    }
}

fn qualifies_for_back(plant: &Plant) -> bool {
    plant.has_large_size()
        || matches!(plant.category, Some(PlantCategory::Tree | PlantCategory::Hedge))
        || plant.type_mentions(&["tree", "hedge"])
}

fn qualifies_for_middle(plant: &Plant) -> bool {
    plant.has_medium_size()
        || matches!(plant.category, Some(PlantCategory::Shrub | PlantCategory::Fruit))
        || plant.type_mentions(&["shrub", "fruit"])
}

/// First-choice row for a plant.
pub fn classify_row(plant: &Plant) -> PlacementRow {
    if qualifies_for_back(plant) {
        PlacementRow::Back
    } else if qualifies_for_middle(plant) {
        PlacementRow::Middle
    } else {
        PlacementRow::Front
    }
}

/// What to do when a plant's first-choice row is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowPolicy {
    /// Try the remaining rows nearest first, front last. A plant is only
    /// left unplaced when all 18 slots are taken.
    #[default]
    Cascade,
    /// Never leave the classified row.
    ClassifiedOnly,
    /// Rows the plant qualifies for by the back and middle tests, then front.
    Qualifying,
}

impl OverflowPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            OverflowPolicy::Cascade => "cascade",
            OverflowPolicy::ClassifiedOnly => "classified-only",
            OverflowPolicy::Qualifying => "qualifying",
        }
    }
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown overflow policy '{0}' (expected cascade, classified-only or qualifying)")]
pub struct ParsePolicyError(pub String);

impl FromStr for OverflowPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "cascade" => Ok(OverflowPolicy::Cascade),
            "classified-only" => Ok(OverflowPolicy::ClassifiedOnly),
            "qualifying" => Ok(OverflowPolicy::Qualifying),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

/// Rows to try for `plant`, in order. The first entry is always the
/// classified row.
pub fn candidate_rows(plant: &Plant, policy: OverflowPolicy) -> SmallVec<[PlacementRow; 3]> {
    use PlacementRow::*;

    let first = classify_row(plant);
    match policy {
        OverflowPolicy::ClassifiedOnly => smallvec![first],
        OverflowPolicy::Cascade => match first {
            Back => smallvec![Back, Middle, Front],
            Middle => smallvec![Middle, Back, Front],
            Front => smallvec![Front, Middle, Back],
        },
        OverflowPolicy::Qualifying => {
            let mut rows = SmallVec::new();
            if qualifies_for_back(plant) {
                rows.push(Back);
            }
            if qualifies_for_middle(plant) {
                rows.push(Middle);
            }
            rows.push(Front);
            rows
        }
    }
}
