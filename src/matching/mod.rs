//! Condition-based plant matching
//!
//! - `filter`: conjunctive containment filter over the catalog
//! - `ranker`: deterministic, stable display orderings
//! - `session`: one matchmaker session with sequenced catalog fetches

pub mod filter;
pub mod ranker;
pub mod session;

pub use filter::{filter_catalog, ConditionMatcher, SiteConditions, ZoneConditions};
pub use ranker::{collate_names, fold_name, rank_by_name, rank_by_size_then_name, size_rank};
pub use session::{FetchSequencer, FetchTicket, MatchSession, MatchState};
