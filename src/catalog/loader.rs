//! Catalog file loading
//!
//! Two export shapes of the hosted `plants` table are supported:
//! - CSV: read with Polars, every column as text (tag columns are encoded
//!   as Postgres array literals or pipe-separated strings)
//! - JSON: an array of row objects, as returned by the table's REST endpoint
//!
//! Both go through `RawPlantRow::normalize`, so the typed catalog looks the
//! same regardless of source.

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::raw::{normalize_rows, RawId, RawPlantRow, TagField};
use super::Catalog;

/// Load a catalog snapshot, choosing the reader from the file extension.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let rows = match extension.as_deref() {
        Some("csv") => load_csv_rows(path)?,
        Some("json") => load_json_rows(path)?,
        _ => bail!("Unsupported catalog format: {} (expected .csv or .json)", path.display()),
    };

    let (plants, report) = normalize_rows(rows);
    tracing::info!(
        "Loaded {} plants from {} ({} dropped tags, {} unmatchable, {} without id)",
        plants.len(),
        path.display(),
        report.dropped_tags,
        report.unmatchable,
        report.missing_ids
    );

    Ok(Catalog::new(plants))
}

/// Read a CSV export into raw rows.
pub fn load_csv_rows(path: &Path) -> Result<Vec<RawPlantRow>> {
    // Schema inference off: every column comes back as a string column.
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("Failed to create CSV reader: {}", path.display()))?
        .finish()
        .with_context(|| format!("Failed to load catalog CSV: {}", path.display()))?;

    rows_from_dataframe(&df)
}

/// Read a JSON array export into raw rows.
///
/// The file must be an array, but a row that does not fit `RawPlantRow` is
/// skipped with a warning rather than failing the whole catalog.
pub fn load_json_rows(path: &Path) -> Result<Vec<RawPlantRow>> {
    let file = File::open(path).with_context(|| format!("Failed to open catalog: {}", path.display()))?;
    let values: Vec<serde_json::Value> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse catalog JSON: {}", path.display()))?;

    let mut rows = Vec::with_capacity(values.len());
    for (position, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<RawPlantRow>(value) {
            Ok(row) => rows.push(row),
            Err(e) => tracing::warn!("Skipping catalog row {} in {}: {}", position, path.display(), e),
        }
    }
    Ok(rows)
}

/// First of `names` present in the frame, as a string column.
fn text_column<'a>(df: &'a DataFrame, names: &[&str]) -> Result<Option<&'a StringChunked>> {
    for name in names {
        if let Ok(column) = df.column(name) {
            let values = column
                .str()
                .with_context(|| format!("Column '{}' is not string type", name))?;
            return Ok(Some(values));
        }
    }
    Ok(None)
}

/// Convert a string-typed frame into raw rows.
pub fn rows_from_dataframe(df: &DataFrame) -> Result<Vec<RawPlantRow>> {
    let common_names = text_column(df, &["common_name"])?
        .context("Column 'common_name' not found")?;

    let ids = text_column(df, &["id"])?;
    let scientific = text_column(df, &["scientific_name", "botanical_name"])?;
    let plant_types = text_column(df, &["plant_type"])?;
    let sun = text_column(df, &["sun_requirement"])?;
    let soil = text_column(df, &["soil_type"])?;
    let water = text_column(df, &["water_behavior"])?;
    let size = text_column(df, &["mature_size"])?;
    let images = text_column(df, &["image_url", "builder_image_url"])?;

    let text = |column: Option<&StringChunked>, idx: usize| -> Option<String> {
        column.and_then(|c| c.get(idx)).map(|s| s.to_string())
    };
    let tags = |column: Option<&StringChunked>, idx: usize| -> Option<TagField> {
        column.and_then(|c| c.get(idx)).map(|s| TagField::Scalar(s.to_string()))
    };

    let rows = (0..df.height())
        .map(|idx| RawPlantRow {
            id: text(ids, idx).map(RawId::Text),
            common_name: common_names.get(idx).map(|s| s.to_string()),
            scientific_name: text(scientific, idx),
            botanical_name: None,
            plant_type: text(plant_types, idx),
            sun_requirement: tags(sun, idx),
            soil_type: tags(soil, idx),
            water_behavior: tags(water, idx),
            mature_size: tags(size, idx),
            image_url: text(images, idx),
            builder_image_url: None,
        })
        .collect();

    Ok(rows)
}
