//! Plant catalog entities
//!
//! Typed shape of one row of the hosted `plants` table after it has been
//! normalized at the data-access boundary:
//! - `raw`: loosely-typed rows as exported (scalar-or-list tag columns)
//! - `loader`: CSV (Polars) and JSON catalog files
//! - `source`: the read-only query capability the matcher consumes
//!
//! Every condition attribute is a set here, never a scalar.

pub mod loader;
pub mod raw;
pub mod source;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

pub use loader::load_catalog;
pub use raw::{normalize_rows, NormalizeReport, RawPlantRow, TagField, TagItem};
pub use source::{CatalogError, CatalogSource, FileCatalog, InMemoryCatalog};

/// A tag that does not belong to the fixed option set of its dimension.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised {kind} value: '{value}'")]
pub struct ParseConditionError {
    pub kind: &'static str,
    pub value: String,
}

/// Comparison key for tag labels: case-folded, whitespace removed, dashes unified.
fn normalize_tag(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' => '-',
            other => other,
        })
        .flat_map(char::to_lowercase)
        .collect()
}

/// Declares one condition dimension with its canonical labels and accepted aliases.
macro_rules! condition_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $variant:ident => $label:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $variant ),+
        }

        impl $name {
            /// Fixed option set, in the order the selectors present it.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            pub fn label(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ParseConditionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let key = normalize_tag(s);
                $(
                    if key == normalize_tag($label) $(|| key == normalize_tag($alias))* {
                        return Ok($name::$variant);
                    }
                )+
                Err(ParseConditionError {
                    kind: $kind,
                    value: s.trim().to_string(),
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                text.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

condition_enum! {
    /// Sun exposure a plant tolerates.
    Sun, "sun" {
        FullSun => "Full Sun",
        PartShade => "Part Shade" | "Partial Shade",
        FullShade => "Full Shade",
    }
}

condition_enum! {
    /// Soil type. "Healthy/loam" is the label the selectors show for loam.
    Soil, "soil" {
        Clay => "Clay",
        Sandy => "Sandy",
        Loam => "Loam" | "Healthy/loam" | "Healthy loam",
        PottingMix => "Potting Mix",
    }
}

condition_enum! {
    /// Water/drainage behaviour of the site.
    Water, "water" {
        HoldsWater => "Holds Water",
        DrainsWell => "Drains Well",
        Dry => "Dry",
        UnderARoof => "Under a Roof",
    }
}

condition_enum! {
    /// Mature size band.
    SizeBand, "size" {
        UnderOneMetre => "<1m" | "under 1m",
        OneToTwoMetres => "1-2m" | "1 to 2m",
        TwoToFourMetres => "2-4m" | "2 to 4m",
        OverFourMetres => "4m+" | "4m plus",
    }
}

impl SizeBand {
    /// Largest band: the label carries "4m" ("2-4m", "4m+").
    pub fn is_large(self) -> bool {
        matches!(self, SizeBand::TwoToFourMetres | SizeBand::OverFourMetres)
    }

    /// Medium band ("1-2m").
    pub fn is_medium(self) -> bool {
        self == SizeBand::OneToTwoMetres
    }
}

// ============================================================================
// Condition sets
// ============================================================================

/// Ordered, duplicate-free set of tags for one condition dimension.
///
/// Catalog rows carry at most four values per dimension, so the set lives on
/// the stack and containment is a linear scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionSet<T>(SmallVec<[T; 4]>);

impl<T> Default for ConditionSet<T> {
    fn default() -> Self {
        ConditionSet(SmallVec::new())
    }
}

impl<T: Copy + PartialEq> ConditionSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the value was already present.
    pub fn insert(&mut self, value: T) -> bool {
        if self.contains(value) {
            return false;
        }
        self.0.push(value);
        true
    }

    pub fn contains(&self, value: T) -> bool {
        self.0.iter().any(|v| *v == value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.0.iter().copied()
    }
}

impl<T: Copy + PartialEq> FromIterator<T> for ConditionSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = ConditionSet::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl<T: Serialize> Serialize for ConditionSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

// ============================================================================
// Plant category
// ============================================================================

/// Declared plant category (the `plant_type` column).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlantCategory {
    Tree,
    Shrub,
    Hedge,
    Flower,
    Palm,
    Flax,
    Groundcover,
    Climber,
    Fruit,
    Other(String),
}

/// Keyword lookup order for free-text categories. Back-row keywords come
/// first so "Fruit Tree" resolves to Tree.
const CATEGORY_KEYWORDS: &[&str] = &[
    "tree", "hedge", "shrub", "fruit", "palm", "flax", "climber", "groundcover", "flower",
];

fn category_for_keyword(word: &str) -> Option<PlantCategory> {
    let category = match word {
        "tree" => PlantCategory::Tree,
        "hedge" => PlantCategory::Hedge,
        "shrub" => PlantCategory::Shrub,
        "fruit" => PlantCategory::Fruit,
        "palm" => PlantCategory::Palm,
        "flax" => PlantCategory::Flax,
        "climber" => PlantCategory::Climber,
        "groundcover" => PlantCategory::Groundcover,
        "flower" => PlantCategory::Flower,
        _ => return None,
    };
    Some(category)
}

impl PlantCategory {
    /// Parse a free-text category. Empty text means no declared category.
    pub fn from_label(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let key = normalize_tag(trimmed);

        if let Some(category) = category_for_keyword(&key) {
            return Some(category);
        }
        CATEGORY_KEYWORDS
            .iter()
            .find(|word| key.contains(*word))
            .and_then(|word| category_for_keyword(word))
            .or_else(|| Some(PlantCategory::Other(trimmed.to_string())))
    }

    pub fn label(&self) -> &str {
        match self {
            PlantCategory::Tree => "Tree",
            PlantCategory::Shrub => "Shrub",
            PlantCategory::Hedge => "Hedge",
            PlantCategory::Flower => "Flower",
            PlantCategory::Palm => "Palm",
            PlantCategory::Flax => "Flax",
            PlantCategory::Groundcover => "Groundcover",
            PlantCategory::Climber => "Climber",
            PlantCategory::Fruit => "Fruit",
            PlantCategory::Other(text) => text,
        }
    }
}

impl fmt::Display for PlantCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for PlantCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// ============================================================================
// Plant
// ============================================================================

/// One species/cultivar in the catalog. Read-only from the app's side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plant {
    pub id: String,
    /// Display and sort key. Empty when the row had none.
    pub common_name: String,
    pub scientific_name: Option<String>,
    pub category: Option<PlantCategory>,
    /// Declared type text as stored ("Fruit Tree"); `category` keeps only
    /// its strongest keyword.
    pub plant_type: Option<String>,
    pub sun_requirement: ConditionSet<Sun>,
    pub soil_type: ConditionSet<Soil>,
    pub water_behavior: ConditionSet<Water>,
    pub mature_size: ConditionSet<SizeBand>,
    /// May be absent or point at a broken image.
    pub image_url: Option<String>,
}

impl Plant {
    pub fn new(id: impl Into<String>, common_name: impl Into<String>) -> Self {
        Plant {
            id: id.into(),
            common_name: common_name.into(),
            scientific_name: None,
            category: None,
            plant_type: None,
            sun_requirement: ConditionSet::new(),
            soil_type: ConditionSet::new(),
            water_behavior: ConditionSet::new(),
            mature_size: ConditionSet::new(),
            image_url: None,
        }
    }

    pub fn with_scientific_name(mut self, name: impl Into<String>) -> Self {
        self.scientific_name = Some(name.into());
        self
    }

    pub fn with_category(mut self, category: PlantCategory) -> Self {
        self.plant_type = Some(category.label().to_string());
        self.category = Some(category);
        self
    }

    /// Set the declared type text and the category parsed from it.
    pub fn with_plant_type(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.category = PlantCategory::from_label(&text);
        self.plant_type = Some(text.trim().to_string()).filter(|t| !t.is_empty());
        self
    }

    /// Whether the declared type text mentions any of `keywords` (lowercase).
    pub fn type_mentions(&self, keywords: &[&str]) -> bool {
        let Some(text) = self.plant_type.as_deref() else {
            return false;
        };
        let text = text.to_lowercase();
        keywords.iter().any(|word| text.contains(word))
    }

    pub fn with_sun(mut self, values: impl IntoIterator<Item = Sun>) -> Self {
        self.sun_requirement = values.into_iter().collect();
        self
    }

    pub fn with_soil(mut self, values: impl IntoIterator<Item = Soil>) -> Self {
        self.soil_type = values.into_iter().collect();
        self
    }

    pub fn with_water(mut self, values: impl IntoIterator<Item = Water>) -> Self {
        self.water_behavior = values.into_iter().collect();
        self
    }

    pub fn with_sizes(mut self, values: impl IntoIterator<Item = SizeBand>) -> Self {
        self.mature_size = values.into_iter().collect();
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn has_large_size(&self) -> bool {
        self.mature_size.iter().any(SizeBand::is_large)
    }

    pub fn has_medium_size(&self) -> bool {
        self.mature_size.iter().any(SizeBand::is_medium)
    }

    /// A plant with any empty condition set can never be matched.
    pub fn is_matchable(&self) -> bool {
        !self.sun_requirement.is_empty()
            && !self.soil_type.is_empty()
            && !self.water_behavior.is_empty()
            && !self.mature_size.is_empty()
    }
}

// ============================================================================
// Catalog snapshot
// ============================================================================

/// Ordered snapshot of the plant catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    plants: Vec<Plant>,
}

impl Catalog {
    pub fn new(plants: Vec<Plant>) -> Self {
        Catalog { plants }
    }

    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    pub fn len(&self) -> usize {
        self.plants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }

    /// First plant with this identifier.
    pub fn get(&self, id: &str) -> Option<&Plant> {
        self.plants.iter().find(|p| p.id == id)
    }
}
