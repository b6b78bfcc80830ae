//! Plant Library (A–Z index)
//!
//! The catalog export can hold several rows for the same common name (a
//! species re-entered under a new id). The library shows each name once,
//! keeping the first row in catalog order, then groups names by initial.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::catalog::Plant;
use crate::matching::{fold_name, rank_by_name};

/// Plants sharing an upper-cased initial, accents folded (Ōtaki files under O).
#[derive(Debug, Clone, Serialize)]
pub struct LetterGroup<'a> {
    pub letter: char,
    pub plants: Vec<&'a Plant>,
}

/// Keep the first plant for each trimmed common name, in catalog order.
/// Plants without a name are left out.
pub fn dedupe_by_common_name(plants: &[Plant]) -> Vec<&Plant> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut unique = Vec::new();
    for plant in plants {
        let name = plant.common_name.trim();
        if !name.is_empty() && seen.insert(name) {
            unique.push(plant);
        }
    }
    unique
}

/// Deduplicated plants, sorted by name and grouped by initial. Groups are in
/// ascending letter order.
pub fn alphabetical_index(plants: &[Plant]) -> Vec<LetterGroup<'_>> {
    let mut unique = dedupe_by_common_name(plants);
    rank_by_name(&mut unique);

    let mut groups: FxHashMap<char, Vec<&Plant>> = FxHashMap::default();
    for plant in unique {
        let Some(initial) = fold_name(plant.common_name.trim()).chars().next() else {
            continue;
        };
        let letter = initial.to_uppercase().next().unwrap_or(initial);
        groups.entry(letter).or_default().push(plant);
    }

    let mut index: Vec<LetterGroup> = groups
        .into_iter()
        .map(|(letter, plants)| LetterGroup { letter, plants })
        .collect();
    index.sort_by_key(|group| group.letter);

    tracing::debug!("Built library index with {} letters", index.len());
    index
}
