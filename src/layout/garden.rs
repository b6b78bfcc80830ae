//! The four garden zones of the builder.

use serde::Serialize;

use super::rows::OverflowPolicy;
use super::zone::{GardenZoneState, ZoneLayout, ZoneStatus};
use crate::catalog::{Plant, Soil, Sun, Water};
use crate::matching::{filter_catalog, rank_by_size_then_name, ZoneConditions};

pub const ZONE_COUNT: u8 = 4;

/// Starting conditions for a zone: sunny loam for zones 1–2, shaded clay
/// for zones 3–4.
pub fn default_zone_conditions(zone_id: u8) -> ZoneConditions {
    if zone_id <= 2 {
        ZoneConditions {
            sun: Sun::FullSun,
            soil: Soil::Loam,
            water: Water::DrainsWell,
        }
    } else {
        ZoneConditions {
            sun: Sun::PartShade,
            soil: Soil::Clay,
            water: Water::HoldsWater,
        }
    }
}

/// Summary row for zone listings.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneSummary {
    pub id: u8,
    pub conditions: ZoneConditions,
    pub status: ZoneStatus,
}

#[derive(Debug, Clone)]
pub struct Garden {
    zones: Vec<GardenZoneState>,
    policy: OverflowPolicy,
}

impl Default for Garden {
    fn default() -> Self {
        Self::new(OverflowPolicy::default())
    }
}

impl Garden {
    pub fn new(policy: OverflowPolicy) -> Self {
        let zones = (1..=ZONE_COUNT)
            .map(|id| GardenZoneState::new(id, default_zone_conditions(id)))
            .collect();
        Garden { zones, policy }
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    pub fn zones(&self) -> &[GardenZoneState] {
        &self.zones
    }

    /// Zones are numbered from 1.
    pub fn zone(&self, zone_id: u8) -> Option<&GardenZoneState> {
        self.zones.iter().find(|z| z.id == zone_id)
    }

    pub fn zone_mut(&mut self, zone_id: u8) -> Option<&mut GardenZoneState> {
        self.zones.iter_mut().find(|z| z.id == zone_id)
    }

    /// Replace a zone's conditions. Placed plants stay where they are.
    pub fn update_conditions(&mut self, zone_id: u8, conditions: ZoneConditions) -> bool {
        match self.zone_mut(zone_id) {
            Some(zone) => {
                zone.conditions = conditions;
                true
            }
            None => false,
        }
    }

    pub fn layout(&self, zone_id: u8) -> Option<ZoneLayout> {
        self.zone(zone_id).map(|zone| zone.layout(self.policy))
    }

    pub fn summaries(&self) -> Vec<ZoneSummary> {
        self.zones
            .iter()
            .map(|zone| ZoneSummary {
                id: zone.id,
                conditions: zone.conditions,
                status: zone.status(),
            })
            .collect()
    }

    /// Sidebar plants for a zone: matched on sun/soil/water, smallest first.
    pub fn zone_library<'a>(&self, plants: &'a [Plant], zone_id: u8) -> Option<Vec<&'a Plant>> {
        let zone = self.zone(zone_id)?;
        let mut matches = filter_catalog(plants, &zone.conditions);
        rank_by_size_then_name(&mut matches);
        Some(matches)
    }
}
