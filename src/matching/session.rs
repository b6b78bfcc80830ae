//! Matchmaker session
//!
//! Each selector change triggers a catalog fetch. Fetches may resolve out of
//! order, so every fetch carries a ticket and only the newest ticket may
//! publish results. Fetch failures become an explicit `Failed` state with a
//! retry hint instead of leaving the previous results on screen.

use std::sync::atomic::{AtomicU64, Ordering};

use super::filter::SiteConditions;
use super::ranker::rank_by_name;
use crate::catalog::{CatalogError, CatalogSource, Plant};

/// Issues monotonically increasing fetch generations. Shareable across tasks.
#[derive(Debug, Default)]
pub struct FetchSequencer {
    latest: AtomicU64,
}

impl FetchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation; every earlier generation becomes stale.
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == generation
    }
}

/// Handle for one in-flight fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub conditions: SiteConditions,
}

/// What the results panel should show.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchState {
    Idle,
    Loading {
        conditions: SiteConditions,
    },
    /// `plants` may be empty: no match is a normal outcome.
    Ready {
        conditions: SiteConditions,
        plants: Vec<Plant>,
    },
    Failed {
        conditions: SiteConditions,
        message: String,
        retryable: bool,
    },
}

/// One user's matchmaker screen.
#[derive(Debug)]
pub struct MatchSession {
    conditions: SiteConditions,
    state: MatchState,
    sequencer: FetchSequencer,
}

impl Default for MatchSession {
    fn default() -> Self {
        Self::new(SiteConditions::default())
    }
}

impl MatchSession {
    pub fn new(conditions: SiteConditions) -> Self {
        MatchSession {
            conditions,
            state: MatchState::Idle,
            sequencer: FetchSequencer::new(),
        }
    }

    pub fn conditions(&self) -> SiteConditions {
        self.conditions
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn into_state(self) -> MatchState {
        self.state
    }

    /// Plants currently on screen (empty unless `Ready`).
    pub fn results(&self) -> &[Plant] {
        match &self.state {
            MatchState::Ready { plants, .. } => plants,
            _ => &[],
        }
    }

    /// Record a selector change and hand out the ticket for its fetch.
    pub fn begin_fetch(&mut self, conditions: SiteConditions) -> FetchTicket {
        self.conditions = conditions;
        self.state = MatchState::Loading { conditions };
        FetchTicket {
            generation: self.sequencer.issue(),
            conditions,
        }
    }

    /// Publish a fetch result. Returns false (and changes nothing) when a
    /// newer fetch has been started since this ticket was issued.
    pub fn complete(&mut self, ticket: FetchTicket, result: Result<Vec<Plant>, CatalogError>) -> bool {
        if !self.sequencer.is_current(ticket.generation) {
            tracing::debug!(
                "Discarding stale match results (generation {})",
                ticket.generation
            );
            return false;
        }

        self.state = match result {
            Ok(mut plants) => {
                rank_by_name(&mut plants);
                MatchState::Ready {
                    conditions: ticket.conditions,
                    plants,
                }
            }
            Err(e) => {
                tracing::warn!("Match fetch failed: {}", e);
                MatchState::Failed {
                    conditions: ticket.conditions,
                    retryable: e.is_retryable(),
                    message: e.to_string(),
                }
            }
        };
        true
    }

    /// Fetch and publish synchronously.
    pub fn refresh(&mut self, source: &dyn CatalogSource, conditions: SiteConditions) -> &MatchState {
        let ticket = self.begin_fetch(conditions);
        let result = source.query_matching(&ticket.conditions);
        self.complete(ticket, result);
        &self.state
    }

    /// Re-run the last selection (the retry action of the failed state).
    pub fn retry(&mut self, source: &dyn CatalogSource) -> &MatchState {
        let conditions = self.conditions;
        self.refresh(source, conditions)
    }
}
