//! Folds the per-season tables into the all-seasons tables

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, instrument, warn};

use super::csv_store::{UpdateSummary, read_table, update_csv};
use crate::constants::files::COMBINED_PREFIX;
use crate::data_fetcher::models::{Category, Table};
use crate::error::AppError;

/// One combined table written by [`combine_seasons`].
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedTable {
    pub category: Category,
    pub path: PathBuf,
    pub source_files: usize,
    pub summary: UpdateSummary,
}

/// Concatenates every per-season table in `data_dir` by category and merges
/// each result into `combined<suffix>` inside `combined_dir`.
///
/// Files are visited in name order and classified by their longest matching
/// category suffix. Files matching no category are ignored, as are
/// previously combined tables when both directories coincide. Categories
/// without any season file are left untouched, and a missing `data_dir`
/// combines nothing.
#[instrument]
pub async fn combine_seasons(
    data_dir: &Path,
    combined_dir: &Path,
) -> Result<Vec<CombinedTable>, AppError> {
    if !fs::try_exists(data_dir).await? {
        warn!("No season directory at {}, nothing to combine", data_dir.display());
        return Ok(Vec::new());
    }

    let mut file_names = Vec::new();
    let mut entries = fs::read_dir(data_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            file_names.push(name.to_string());
        }
    }
    file_names.sort();

    let mut by_category: BTreeMap<Category, Vec<Table>> = BTreeMap::new();
    for name in file_names {
        if name.starts_with(COMBINED_PREFIX) {
            continue;
        }
        let Some(category) = Category::from_file_name(&name) else {
            continue;
        };
        debug!("Adding {name} to {category}");
        if let Some(table) = read_table(&data_dir.join(&name)).await? {
            by_category.entry(category).or_default().push(table);
        }
    }

    let mut combined = Vec::with_capacity(by_category.len());
    for (category, tables) in by_category {
        let source_files = tables.len();
        let path = combined_dir.join(category.combined_file_name());
        let summary = update_csv(&path, &Table::concat(tables)).await?;
        combined.push(CombinedTable {
            category,
            path,
            source_files,
            summary,
        });
    }

    info!(
        "Combined {} categories from {} into {}",
        combined.len(),
        data_dir.display(),
        combined_dir.display()
    );
    Ok(combined)
}
