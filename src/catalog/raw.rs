//! Loosely-typed catalog rows
//!
//! Rows come out of the hosted table with data-entry inconsistencies: a tag
//! column may hold a JSON list, a bare scalar, a Postgres array literal
//! (`{Full Sun,Part Shade}`) or a pipe-separated string. All of these are
//! folded into `ConditionSet`s here, once, so matching never has to care.

use serde::Deserialize;
use std::str::FromStr;

use super::{ConditionSet, ParseConditionError, Plant, PlantCategory};

/// Identifier as stored: numeric in the hosted table, text in some exports.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s.trim().to_string(),
        }
    }
}

/// One element of a tag list. Array columns can hold `NULL` or stray
/// non-text entries; those are kept as `Other` and skipped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TagItem {
    Text(String),
    Other(serde_json::Value),
}

/// A tag column value: list or scalar.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TagField {
    List(Vec<TagItem>),
    Scalar(String),
    Other(serde_json::Value),
}

impl TagField {
    /// Individual tag strings, with scalar encodings split apart.
    pub fn tags(&self) -> Vec<String> {
        match self {
            TagField::List(items) => items
                .iter()
                .filter_map(|item| match item {
                    TagItem::Text(text) => Some(text),
                    TagItem::Other(_) => None,
                })
                .flat_map(|text| split_tag_text(text))
                .collect(),
            TagField::Scalar(text) => split_tag_text(text),
            TagField::Other(_) => Vec::new(),
        }
    }

    /// Entries that are not text and carry no tag.
    pub fn skipped(&self) -> usize {
        match self {
            TagField::List(items) => items
                .iter()
                .filter(|item| matches!(item, TagItem::Other(_)))
                .count(),
            TagField::Scalar(_) => 0,
            TagField::Other(_) => 1,
        }
    }
}

/// Split a single text cell into tags.
///
/// - `{a,b}`: Postgres array literal (quoted elements allowed)
/// - `["a","b"]`: JSON list stored as text
/// - `a|b`: pipe-separated
/// - anything else: one tag
fn split_tag_text(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if let Some(inner) = trimmed.strip_prefix('{').and_then(|t| t.strip_suffix('}')) {
        return inner
            .split(',')
            .map(|t| t.trim().trim_matches('"').trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
    }

    if trimmed.starts_with('[') {
        if let Ok(items) = serde_json::from_str::<Vec<String>>(trimmed) {
            return items
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
        }
    }

    if trimmed.contains('|') {
        return trimmed
            .split('|')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
    }

    vec![trimmed.to_string()]
}

/// One row of the `plants` table as exported.
///
/// Unknown columns are ignored. `botanical_name` and `builder_image_url` are
/// fallbacks for `scientific_name` and `image_url`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlantRow {
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default)]
    pub common_name: Option<String>,
    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub botanical_name: Option<String>,
    #[serde(default)]
    pub plant_type: Option<String>,
    #[serde(default)]
    pub sun_requirement: Option<TagField>,
    #[serde(default)]
    pub soil_type: Option<TagField>,
    #[serde(default)]
    pub water_behavior: Option<TagField>,
    #[serde(default)]
    pub mature_size: Option<TagField>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub builder_image_url: Option<String>,
}

/// Counters collected while normalizing a batch of rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub rows: usize,
    /// Rows without an identifier; they get a positional id.
    pub missing_ids: usize,
    /// Tags outside the fixed option sets, plus null or non-text entries.
    pub dropped_tags: usize,
    /// Plants left with at least one empty condition set.
    pub unmatchable: usize,
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn parse_tags<T>(field: Option<&TagField>, plant_id: &str, report: &mut NormalizeReport) -> ConditionSet<T>
where
    T: FromStr<Err = ParseConditionError> + Copy + PartialEq,
{
    let mut set = ConditionSet::new();
    let Some(field) = field else {
        return set;
    };
    let skipped = field.skipped();
    if skipped > 0 {
        report.dropped_tags += skipped;
        tracing::debug!("Plant {}: skipping {} non-text tag entries", plant_id, skipped);
    }
    for tag in field.tags() {
        match tag.parse::<T>() {
            Ok(value) => {
                set.insert(value);
            }
            Err(e) => {
                report.dropped_tags += 1;
                tracing::debug!("Plant {}: dropping tag ({})", plant_id, e);
            }
        }
    }
    set
}

impl RawPlantRow {
    /// Normalize into the strict typed shape. `position` is the row's index in
    /// the export, used as the id when the row has none.
    pub fn normalize(self, position: usize, report: &mut NormalizeReport) -> Plant {
        report.rows += 1;

        let id = match self.id.map(RawId::into_string).filter(|s| !s.is_empty()) {
            Some(id) => id,
            None => {
                report.missing_ids += 1;
                format!("row-{}", position)
            }
        };

        let sun_requirement = parse_tags(self.sun_requirement.as_ref(), &id, report);
        let soil_type = parse_tags(self.soil_type.as_ref(), &id, report);
        let water_behavior = parse_tags(self.water_behavior.as_ref(), &id, report);
        let mature_size = parse_tags(self.mature_size.as_ref(), &id, report);

        let plant = Plant {
            common_name: self.common_name.map(|s| s.trim().to_string()).unwrap_or_default(),
            scientific_name: non_empty(self.scientific_name).or_else(|| non_empty(self.botanical_name)),
            category: self.plant_type.as_deref().and_then(PlantCategory::from_label),
            plant_type: non_empty(self.plant_type),
            sun_requirement,
            soil_type,
            water_behavior,
            mature_size,
            image_url: non_empty(self.image_url).or_else(|| non_empty(self.builder_image_url)),
            id,
        };

        if !plant.is_matchable() {
            report.unmatchable += 1;
        }
        plant
    }
}

/// Normalize a batch of rows, preserving their order.
pub fn normalize_rows(rows: impl IntoIterator<Item = RawPlantRow>) -> (Vec<Plant>, NormalizeReport) {
    let mut report = NormalizeReport::default();
    let plants = rows
        .into_iter()
        .enumerate()
        .map(|(position, row)| row.normalize(position, &mut report))
        .collect();
    (plants, report)
}
