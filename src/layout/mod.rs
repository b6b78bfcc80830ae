//! Garden Builder layout
//!
//! - `rows`: row classification and overflow candidates
//! - `zone`: one zone's placed plants and its derived 6×3 grid
//! - `garden`: the four zones with their default conditions

pub mod garden;
pub mod rows;
pub mod zone;

pub use garden::{default_zone_conditions, Garden, ZoneSummary, ZONE_COUNT};
pub use rows::{
    candidate_rows, classify_row, OverflowPolicy, ParsePolicyError, PlacementRow, ROW_CAPACITY, ZONE_CAPACITY,
};
pub use zone::{
    AddOutcome, GardenZoneState, GridCell, PlacedPlant, Placement, PlacementOutcome, ZoneLayout, ZoneStatus,
};
