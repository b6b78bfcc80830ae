//! Result Ranker
//!
//! Two stable orderings:
//! - by common name (matchmaker results, library, garden list)
//! - by size rank, then common name (zone library sidebar)
//!
//! Names compare case- and accent-insensitively first (Kōwhai sorts with
//! Kowhai, not after Z); a missing name is the empty string and sorts first.
//! Equal keys keep their catalog order.

use std::borrow::Borrow;
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::catalog::Plant;

/// Lowercased name with diacritics stripped (NFD, combining marks removed).
pub fn fold_name(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Locale-style name comparison: folded names first, then the plain
/// lowercased names so "Kowhai" and "Kōwhai" still have a fixed order.
pub fn collate_names(a: &str, b: &str) -> Ordering {
    fold_name(a).cmp(&fold_name(b)).then_with(|| {
        a.chars()
            .flat_map(char::to_lowercase)
            .cmp(b.chars().flat_map(char::to_lowercase))
    })
}

/// Size rank used by the zone sidebar:
/// - 3: a "2-4m" or "4m+" band
/// - 2: a "1-2m" band
/// - 1: anything else (including no declared size)
pub fn size_rank(plant: &Plant) -> u8 {
    if plant.has_large_size() {
        3
    } else if plant.has_medium_size() {
        2
    } else {
        1
    }
}

/// Stable sort by common name.
pub fn rank_by_name<P: Borrow<Plant>>(plants: &mut [P]) {
    plants.sort_by(|a, b| collate_names(&a.borrow().common_name, &b.borrow().common_name));
}

/// Stable sort by size rank (smallest first), then common name.
pub fn rank_by_size_then_name<P: Borrow<Plant>>(plants: &mut [P]) {
    plants.sort_by(|a, b| {
        let (a, b) = (a.borrow(), b.borrow());
        size_rank(a)
            .cmp(&size_rank(b))
            .then_with(|| collate_names(&a.common_name, &b.common_name))
    });
}
