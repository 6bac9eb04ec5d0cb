//! Incremental CSV tables on disk
//!
//! New rows are merged into the existing table, exact duplicate rows are
//! dropped and the result replaces the file atomically: content is written to
//! a sibling temporary file which is then renamed over the target.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use tokio::fs;
use tracing::{debug, info, instrument};

use crate::data_fetcher::models::Table;
use crate::error::AppError;

/// Row counts of a finished update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateSummary {
    /// Rows in the file before the update.
    pub existing_rows: usize,
    /// Rows in the file after the update.
    pub total_rows: usize,
}

impl UpdateSummary {
    pub fn added_rows(&self) -> usize {
        self.total_rows.saturating_sub(self.existing_rows)
    }
}

/// Parses CSV content with a header row. Empty content is an empty table.
///
/// Short records are padded with empty cells. A record with more cells than
/// the header is an `InvalidData` I/O error.
pub fn parse_table(content: &[u8]) -> Result<Table, AppError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content);

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() > columns.len() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(AppError::Io(std::io::Error::new(
                ErrorKind::InvalidData,
                format!(
                    "CSV record on line {line} has {} fields, header has {}",
                    record.len(),
                    columns.len()
                ),
            )));
        }
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(Table::with_rows(columns, rows))
}

/// Renders a table as CSV with a header row. A table without columns renders
/// as empty content.
pub fn render_table(table: &Table) -> Result<Vec<u8>, AppError> {
    let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());
    if !table.columns().is_empty() {
        writer.write_record(table.columns())?;
        for row in table.rows() {
            writer.write_record(row)?;
        }
    }
    writer
        .into_inner()
        .map_err(|e| AppError::Io(e.into_error()))
}

/// Reads a table from disk; `None` when the file does not exist.
pub async fn read_table(path: &Path) -> Result<Option<Table>, AppError> {
    match fs::read(path).await {
        Ok(content) => parse_table(&content).map(Some),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{file_name}.tmp"))
}

/// Replaces `path` with `content` via a temporary sibling and a rename.
/// Missing parent directories are created.
pub async fn write_atomic(path: &Path, content: &[u8]) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = temp_path_for(path);
    fs::write(&temp_path, content).await?;
    if let Err(e) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(e.into());
    }
    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// Merges `new_rows` into the table stored at `path`.
///
/// Without an existing file the new table becomes the initial content.
/// Otherwise the stored rows and the new rows are concatenated with their
/// columns aligned, exact duplicate rows are removed (first occurrence wins)
/// and the file is replaced atomically. Applying the same rows twice leaves
/// the file unchanged.
///
/// # Errors
/// * `AppError::Io` - the file or its directory can't be read or written
/// * `AppError::Csv` - the stored file is not valid CSV
/// * `AppError::Io` - a stored record is wider than the header; the file is
///   left untouched
#[instrument(skip_all, fields(path = %path.display(), new = new_rows.len()))]
pub async fn update_csv(path: &Path, new_rows: &Table) -> Result<UpdateSummary, AppError> {
    let (mut merged, existing_rows) = match read_table(path).await? {
        Some(existing) => {
            let count = existing.len();
            (existing, count)
        }
        None => (Table::default(), 0),
    };

    merged.append(new_rows.clone());
    merged.dedup_rows();

    write_atomic(path, &render_table(&merged)?).await?;

    let summary = UpdateSummary {
        existing_rows,
        total_rows: merged.len(),
    };
    info!(
        "Updated {}: {} rows ({} new)",
        path.display(),
        summary.total_rows,
        summary.added_rows()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table::with_rows(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_first_update_writes_initial_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("2023-24_box_data.csv");

        let summary = update_csv(&path, &table(&["GAME_ID", "PTS"], &[&["1", "20"]]))
            .await
            .unwrap();

        assert_eq!(summary.existing_rows, 0);
        assert_eq!(summary.total_rows, 1);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "GAME_ID,PTS\n1,20\n");
    }

    #[tokio::test]
    async fn test_update_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.csv");
        let rows = table(&["GAME_ID", "PTS"], &[&["1", "20"], &["2", "11"]]);

        update_csv(&path, &rows).await.unwrap();
        let first = std::fs::read(&path).unwrap();
        let summary = update_csv(&path, &rows).await.unwrap();

        assert_eq!(summary.added_rows(), 0);
        assert_eq!(std::fs::read(&path).unwrap(), first);
    }

    #[tokio::test]
    async fn test_sequential_updates_yield_union() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.csv");

        update_csv(&path, &table(&["GAME_ID", "PTS"], &[&["1", "20"], &["2", "11"]]))
            .await
            .unwrap();
        update_csv(&path, &table(&["GAME_ID", "PTS"], &[&["2", "11"], &["3", "9"]]))
            .await
            .unwrap();

        let stored = read_table(&path).await.unwrap().unwrap();
        assert_eq!(stored.len(), 3);
        let ids: Vec<&str> = stored.column_values("GAME_ID").unwrap().collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_new_columns_are_aligned() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.csv");

        update_csv(&path, &table(&["GAME_ID", "PTS"], &[&["1", "20"]]))
            .await
            .unwrap();
        update_csv(&path, &table(&["PTS", "GAME_ID", "AST"], &[&["20", "1", "4"]]))
            .await
            .unwrap();

        let stored = read_table(&path).await.unwrap().unwrap();
        assert_eq!(stored.columns(), ["GAME_ID", "PTS", "AST"]);
        assert_eq!(stored.rows()[1], vec!["1", "20", "4"]);
    }

    #[tokio::test]
    async fn test_empty_file_reads_as_empty_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "").unwrap();

        let stored = read_table(&path).await.unwrap().unwrap();
        assert!(stored.is_empty());

        update_csv(&path, &table(&["GAME_ID"], &[&["7"]]))
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "GAME_ID\n7\n");
    }

    #[test]
    fn test_short_records_are_padded() {
        let parsed = parse_table(b"GAME_ID,PTS,AST\n1,20\n").unwrap();
        assert_eq!(parsed.rows(), [vec!["1", "20", ""]]);
    }

    #[tokio::test]
    async fn test_overlong_record_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.csv");
        std::fs::write(&path, "GAME_ID,PTS\n1,20,EXTRA\n").unwrap();

        let result = update_csv(&path, &table(&["GAME_ID", "PTS"], &[&["2", "3"]])).await;

        let err = result.unwrap_err();
        assert!(err.to_string().contains("line 2"));
        // the stored file is left untouched
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "GAME_ID,PTS\n1,20,EXTRA\n"
        );
    }

    #[tokio::test]
    async fn test_no_temporary_file_left_behind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.csv");
        update_csv(&path, &table(&["A"], &[&["x"]])).await.unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["t.csv"]);
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_none() {
        let dir = tempdir().unwrap();
        assert!(read_table(&dir.path().join("nope.csv")).await.unwrap().is_none());
    }

    #[test]
    fn test_quoted_cells_survive() {
        let original = table(&["DESC", "N"], &[&["Jump shot, 24ft", "1"]]);
        let parsed = parse_table(&render_table(&original).unwrap()).unwrap();
        assert_eq!(parsed, original);
    }
}
