//! A directory of CSV exports.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{PayrollError, PayrollResult};
use crate::models::{PayPeriod, Table};

use super::{TabularSource, filter_to_period};

/// Reads tables from CSV files under a root directory.
///
/// Table paths are relative to the root, mirroring the layout of the export
/// container, e.g. `Transaction details/Transaction details.csv`.
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    root: PathBuf,
}

impl CsvDirectorySource {
    /// Creates a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_table(&self, table: &str) -> PayrollResult<Table> {
        let path = self.root.join(table);
        let file = fs::File::open(&path).map_err(|e| PayrollError::SourceUnavailable {
            source_name: table.to_string(),
            message: format!("{}: {}", path.display(), e),
        })?;

        let parse_error = |e: csv::Error| PayrollError::SourceParseError {
            source_name: table.to_string(),
            message: e.to_string(),
        };

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(file);

        let columns: Vec<String> = reader
            .headers()
            .map_err(parse_error)?
            .iter()
            .enumerate()
            .map(|(index, header)| {
                if index == 0 {
                    header.trim_start_matches('\u{feff}').to_string()
                } else {
                    header.to_string()
                }
            })
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(parse_error)?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Table::from_rows(columns, rows))
    }
}

impl TabularSource for CsvDirectorySource {
    fn fetch(&self, table: &str, period: Option<&PayPeriod>) -> PayrollResult<Table> {
        let loaded = self.read_table(table)?;
        let total = loaded.len();
        let filtered = match period {
            Some(period) => filter_to_period(loaded, period),
            None => loaded,
        };
        info!(
            table = %table,
            rows = filtered.len(),
            total_rows = total,
            "Fetched table"
        );
        Ok(filtered)
    }

    fn list_tables(&self) -> PayrollResult<Vec<String>> {
        let mut tables = Vec::new();
        collect_csv_files(&self.root, &self.root, &mut tables).map_err(|e| {
            PayrollError::SourceUnavailable {
                source_name: self.root.display().to_string(),
                message: e.to_string(),
            }
        })?;
        tables.sort();
        debug!(root = %self.root.display(), count = tables.len(), "Listed tables");
        Ok(tables)
    }
}

fn collect_csv_files(root: &Path, dir: &Path, out: &mut Vec<String>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_csv_files(root, &path, out)?;
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        {
            if let Ok(relative) = path.strip_prefix(root) {
                out.push(relative.to_string_lossy().replace('\\', "/"));
            }
        }
    }
    Ok(())
}
