// Catalog inspection tool
//
// Usage:
//   cargo run --bin inspect_catalog -- <catalog.csv|catalog.json>
//   cargo run --bin inspect_catalog -- <catalog> "Full Sun" Clay "Drains Well" 1-2m

use anyhow::{bail, Context};
use pocket_gardener::catalog::{loader, normalize_rows};
use pocket_gardener::layout::classify_row;
use pocket_gardener::{alphabetical_index, filter_catalog, rank_by_name, SiteConditions};
use std::path::Path;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(path) = args.first() else {
        bail!("usage: inspect_catalog <catalog.csv|catalog.json> [sun soil water size]");
    };
    let path = Path::new(path);

    let rows = match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => loader::load_csv_rows(path)?,
        Some("json") => loader::load_json_rows(path)?,
        _ => bail!("Unsupported catalog format: {}", path.display()),
    };
    let (plants, report) = normalize_rows(rows);

    println!("\n=== CATALOG {} ===\n", path.display());
    println!("Rows:              {}", report.rows);
    println!("Missing ids:       {}", report.missing_ids);
    println!("Dropped tags:      {}", report.dropped_tags);
    println!("Unmatchable plants: {}", report.unmatchable);

    let index = alphabetical_index(&plants);
    let unique: usize = index.iter().map(|g| g.plants.len()).sum();
    println!("Library entries:   {} ({} letters)", unique, index.len());

    let mut rows_by_class = [0usize; 3];
    for plant in &plants {
        rows_by_class[classify_row(plant).index()] += 1;
    }
    println!(
        "First-choice rows: back {}, middle {}, front {}",
        rows_by_class[0], rows_by_class[1], rows_by_class[2]
    );

    if args.len() == 5 {
        let conditions = SiteConditions {
            sun: args[1].parse().context("sun")?,
            soil: args[2].parse().context("soil")?,
            water: args[3].parse().context("water")?,
            size: args[4].parse().context("size")?,
        };
        let mut matches = filter_catalog(&plants, &conditions);
        rank_by_name(&mut matches);

        println!("\nMatches for {} / {} / {} / {}:", conditions.sun, conditions.soil, conditions.water, conditions.size);
        if matches.is_empty() {
            println!("  (no plants match)");
        }
        for plant in matches {
            println!("  {:<30} {}", plant.common_name, plant.scientific_name.as_deref().unwrap_or(""));
        }
    }

    Ok(())
}
