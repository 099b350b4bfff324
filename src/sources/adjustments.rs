//! Manual adjustment files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{PayrollError, PayrollResult};
use crate::models::Adjustment;

/// Loads a list of adjustments from a `.json` file, or YAML for any other
/// extension.
///
/// ```yaml
/// - employee: Jane
///   kind: bonus
///   amount: 25.00
///   reason: Product launch
/// ```
pub fn load_adjustments(path: &Path) -> PayrollResult<Vec<Adjustment>> {
    let source_name = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| PayrollError::SourceUnavailable {
        source_name: source_name.clone(),
        message: e.to_string(),
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let parsed: Result<Vec<Adjustment>, String> = if is_json {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str(&content).map_err(|e| e.to_string())
    };
    let adjustments = parsed.map_err(|message| PayrollError::SourceParseError {
        source_name: source_name.clone(),
        message,
    })?;

    if let Some(negative) = adjustments.iter().find(|a| a.amount.is_sign_negative()) {
        return Err(PayrollError::SourceParseError {
            source_name,
            message: format!(
                "adjustment for '{}' has negative amount {}; use kind: deduction",
                negative.employee, negative.amount
            ),
        });
    }

    info!(path = %source_name, count = adjustments.len(), "Loaded adjustments");
    Ok(adjustments)
}
