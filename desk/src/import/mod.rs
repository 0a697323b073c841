//! Attendee import.
//!
//! An import file is a JSON array of `{name, email, bidder_number}` objects.
//! [`plan_import`] validates the rows and reconciles them with the event's
//! current attendees without any request; [`AttendeeImporter::commit`] then
//! applies the plan. Bidder-number conflicts with existing attendees are left
//! to the backend, which swaps, and are listed in the plan beforehand.

pub mod commit;
pub mod plan;

pub use commit::AttendeeImporter;
pub use plan::{ImportAction, ImportIssue, ImportPlan, ImportRow, SwapWarning, plan_import};

use thiserror::Error;

/// Import file errors
#[derive(Error, Debug)]
pub enum ImportError {
    /// The file could not be read
    #[error("Failed to read import file: {0}")]
    Read(#[from] std::io::Error),

    /// The file is not a JSON array of rows
    #[error("Invalid import file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parse an import file, numbering rows from 1 in array order.
///
/// # Errors
///
/// Returns [`ImportError::Parse`] if `json` is not an array of row objects.
pub fn parse_rows(json: &str) -> Result<Vec<ImportRow>, ImportError> {
    let mut rows: Vec<ImportRow> = serde_json::from_str(json)?;
    for (index, row) in rows.iter_mut().enumerate() {
        row.line = index + 1;
    }
    Ok(rows)
}

/// Read and parse an import file.
///
/// # Errors
///
/// Returns [`ImportError::Read`] if the file can't be read, or as
/// [`parse_rows`].
pub async fn load_rows(path: &std::path::Path) -> Result<Vec<ImportRow>, ImportError> {
    let json = tokio::fs::read_to_string(path).await?;
    parse_rows(&json)
}
