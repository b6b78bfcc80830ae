//! Condition Filter
//!
//! A plant matches when EVERY selected value is contained in the plant's
//! tag set for that dimension. Three out of four is a miss. A plant with an
//! empty set on a dimension can never match on it.

use serde::{Deserialize, Serialize};

use crate::catalog::{Plant, SizeBand, Soil, Sun, Water};

/// Anything that can decide whether a plant suits a site.
pub trait ConditionMatcher {
    fn admits(&self, plant: &Plant) -> bool;
}

/// Matchmaker selection: one value per dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SiteConditions {
    pub sun: Sun,
    pub soil: Soil,
    pub water: Water,
    pub size: SizeBand,
}

impl Default for SiteConditions {
    /// Initial selector state of the matchmaker screen.
    fn default() -> Self {
        SiteConditions {
            sun: Sun::FullSun,
            soil: Soil::Clay,
            water: Water::DrainsWell,
            size: SizeBand::OneToTwoMetres,
        }
    }
}

impl ConditionMatcher for SiteConditions {
    fn admits(&self, plant: &Plant) -> bool {
        plant.sun_requirement.contains(self.sun)
            && plant.soil_type.contains(self.soil)
            && plant.water_behavior.contains(self.water)
            && plant.mature_size.contains(self.size)
    }
}

/// Garden zone conditions. Zones don't constrain size: the layout sorts
/// plants into rows by size instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneConditions {
    pub sun: Sun,
    pub soil: Soil,
    pub water: Water,
}

impl ConditionMatcher for ZoneConditions {
    fn admits(&self, plant: &Plant) -> bool {
        plant.sun_requirement.contains(self.sun)
            && plant.soil_type.contains(self.soil)
            && plant.water_behavior.contains(self.water)
    }
}

impl From<SiteConditions> for ZoneConditions {
    fn from(site: SiteConditions) -> Self {
        ZoneConditions {
            sun: site.sun,
            soil: site.soil,
            water: site.water,
        }
    }
}

/// Subsequence of `plants` admitted by `matcher`, in catalog order.
///
/// Pure: no matches is an empty vector, never an error.
pub fn filter_catalog<'a, M>(plants: &'a [Plant], matcher: &M) -> Vec<&'a Plant>
where
    M: ConditionMatcher + ?Sized,
{
    plants.iter().filter(|p| matcher.admits(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lavender() -> Plant {
        Plant::new("1", "Lavender")
            .with_sun([Sun::FullSun])
            .with_soil([Soil::Sandy])
            .with_water([Water::Dry])
            .with_sizes([SizeBand::UnderOneMetre])
    }

    fn conditions(size: SizeBand) -> SiteConditions {
        SiteConditions {
            sun: Sun::FullSun,
            soil: Soil::Sandy,
            water: Water::Dry,
            size,
        }
    }

    #[test]
    fn test_exact_match_returns_plant() {
        let catalog = vec![lavender()];
        let result = filter_catalog(&catalog, &conditions(SizeBand::UnderOneMetre));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].common_name, "Lavender");
    }

    #[test]
    fn test_size_mismatch_excludes_only_candidate() {
        let catalog = vec![lavender()];
        let result = filter_catalog(&catalog, &conditions(SizeBand::OneToTwoMetres));
        assert!(result.is_empty());
    }

    #[test]
    fn test_three_of_four_is_a_miss() {
        let catalog = vec![lavender().with_water([Water::HoldsWater])];
        assert!(filter_catalog(&catalog, &conditions(SizeBand::UnderOneMetre)).is_empty());
    }

    #[test]
    fn test_multi_valued_sets_and_order_preserved() {
        let catalog = vec![
            Plant::new("a", "Rosemary")
                .with_sun([Sun::PartShade, Sun::FullSun])
                .with_soil([Soil::Clay, Soil::Sandy])
                .with_water([Water::Dry, Water::DrainsWell])
                .with_sizes([SizeBand::UnderOneMetre, SizeBand::OneToTwoMetres]),
            Plant::new("b", "Fern")
                .with_sun([Sun::FullShade])
                .with_soil([Soil::Loam])
                .with_water([Water::HoldsWater])
                .with_sizes([SizeBand::UnderOneMetre]),
            lavender(),
        ];

        let result = filter_catalog(&catalog, &conditions(SizeBand::UnderOneMetre));
        let ids: Vec<_> = result.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "1"]);
    }

    #[test]
    fn test_missing_attribute_is_silently_excluded() {
        let mut no_sun = lavender();
        no_sun.sun_requirement = Default::default();
        let catalog = vec![no_sun];
        assert!(filter_catalog(&catalog, &conditions(SizeBand::UnderOneMetre)).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let catalog = vec![lavender(), lavender().with_sizes([SizeBand::OverFourMetres])];
        let selection = conditions(SizeBand::UnderOneMetre);

        let once: Vec<Plant> = filter_catalog(&catalog, &selection).into_iter().cloned().collect();
        let twice = filter_catalog(&once, &selection);
        assert_eq!(twice.len(), once.len());
        assert_eq!(filter_catalog(&catalog, &selection), filter_catalog(&catalog, &selection));
    }

    #[test]
    fn test_zone_conditions_ignore_size() {
        let catalog = vec![lavender().with_sizes([SizeBand::OverFourMetres])];
        let zone = ZoneConditions::from(conditions(SizeBand::UnderOneMetre));
        assert_eq!(filter_catalog(&catalog, &zone).len(), 1);
    }
}
