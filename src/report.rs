//! Report writers.
//!
//! Writers only accept a [`FinalizedReport`], so a report with unresolved
//! employees cannot be written until an operator has acknowledged them.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{FinalizedReport, PayrollReport, round_money};

/// Output format for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// A report CSV plus sibling summary, addings and unresolved CSVs.
    #[default]
    Csv,
    /// The full report, including audit trails, as pretty-printed JSON.
    Json,
}

/// Writes a report in the requested format, returning every file written.
pub fn write_report(
    report: &FinalizedReport,
    path: &Path,
    format: ReportFormat,
) -> PayrollResult<Vec<PathBuf>> {
    let written = match format {
        ReportFormat::Csv => write_csv(report, path)?,
        ReportFormat::Json => {
            write_json(report, path)?;
            vec![path.to_path_buf()]
        }
    };
    info!(
        run_id = %report.report().run_id,
        files = written.len(),
        path = %path.display(),
        "Report saved"
    );
    Ok(written)
}

/// Writes the report table to `path` and its companions next to it:
/// `<stem>_summary.csv` always, `<stem>_addings.csv` when any addings
/// matched, and `<stem>_unresolved.csv` when employees were unresolved.
pub fn write_csv(report: &FinalizedReport, path: &Path) -> PayrollResult<Vec<PathBuf>> {
    let report = report.report();
    let mut written = Vec::new();

    let mut rows: Vec<Vec<String>> =
        vec![report.columns().iter().map(|c| c.to_string()).collect()];
    rows.extend(report.rows());
    write_rows(path, &rows)?;
    written.push(path.to_path_buf());

    let summary = report.summary_rows();
    let summary_path = sibling(path, "summary");
    write_rows(
        &summary_path,
        &[
            summary
                .iter()
                .map(|(label, _)| label.to_string())
                .collect::<Vec<String>>(),
            summary.into_iter().map(|(_, value)| value).collect::<Vec<String>>(),
        ],
    )?;
    written.push(summary_path);

    let addings = addings_rows(report);
    if addings.len() > 1 {
        let addings_path = sibling(path, "addings");
        write_rows(&addings_path, &addings)?;
        written.push(addings_path);
    }

    if report.has_unresolved() {
        let mut unresolved = vec![vec![
            "employee_name".to_string(),
            "reason".to_string(),
            "total_hours".to_string(),
        ]];
        unresolved.extend(report.unresolved.iter().map(|u| {
            vec![
                u.name.clone(),
                serde_json::to_value(u.reason)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default(),
                format!("{:.2}", round_money(u.hours)),
            ]
        }));
        let unresolved_path = sibling(path, "unresolved");
        write_rows(&unresolved_path, &unresolved)?;
        written.push(unresolved_path);
    }

    Ok(written)
}

/// Writes the whole report as pretty-printed JSON.
pub fn write_json(report: &FinalizedReport, path: &Path) -> PayrollResult<()> {
    let json = serde_json::to_string_pretty(report.report()).map_err(|e| write_error(path, e))?;
    ensure_parent(path)?;
    fs::write(path, json).map_err(|e| write_error(path, e))
}

fn addings_rows(report: &PayrollReport) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "employee_name".to_string(),
        "service".to_string(),
        "count".to_string(),
        "amount_per".to_string(),
        "subtotal".to_string(),
    ]];
    for result in &report.results {
        for detail in &result.adding_details {
            rows.push(vec![
                result.employee_name.clone(),
                detail.service.clone(),
                detail.count.to_string(),
                format!("{:.2}", round_money(detail.amount_per)),
                format!("{:.2}", round_money(detail.subtotal)),
            ]);
        }
    }
    rows
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "payroll_report".to_string());
    path.with_file_name(format!("{}_{}.csv", stem, suffix))
}

fn ensure_parent(path: &Path) -> PayrollResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| write_error(path, e))
        }
        _ => Ok(()),
    }
}

fn write_rows(path: &Path, rows: &[Vec<String>]) -> PayrollResult<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path).map_err(|e| write_error(path, e))?;
    for row in rows {
        writer.write_record(row).map_err(|e| write_error(path, e))?;
    }
    writer.flush().map_err(|e| write_error(path, e))
}

fn write_error(path: &Path, error: impl std::fmt::Display) -> PayrollError {
    PayrollError::ReportWriteError {
        path: path.display().to_string(),
        message: error.to_string(),
    }
}
