//! Pocket Gardener rules engine
//!
//! Plant matching and garden-layout placement for the Matchmaker and Garden
//! Builder screens:
//! - `catalog/`: typed plant entities, catalog loading (Polars CSV, JSON), sources
//! - `matching/`: condition filter, result ranker, match session
//! - `library`: deduplicated A–Z plant index
//! - `layout/`: row classification, zone grids, the four garden zones
//! - `garden_list`: owned and project plants
//! - `config`: environment-driven server settings
//! - `api_server` (feature `api`): Axum JSON API

pub mod catalog;
pub mod config;
pub mod garden_list;
pub mod layout;
pub mod library;
pub mod matching;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use catalog::{
    load_catalog, Catalog, CatalogError, CatalogSource, ConditionSet, FileCatalog, InMemoryCatalog, Plant,
    PlantCategory, SizeBand, Soil, Sun, Water,
};
pub use config::ServerConfig;
pub use garden_list::{GardenEntry, GardenList, GardenListError, ListKind};
pub use layout::{
    classify_row, AddOutcome, Garden, GardenZoneState, OverflowPolicy, PlacementOutcome, PlacementRow, ZoneLayout,
    ZoneStatus,
};
pub use library::{alphabetical_index, dedupe_by_common_name, LetterGroup};
pub use matching::{
    filter_catalog, rank_by_name, rank_by_size_then_name, MatchSession, MatchState, SiteConditions, ZoneConditions,
};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
