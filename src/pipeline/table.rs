//! Table writer: validate a CSV block and persist it to disk.
//!
//! The written file is *not* a byte copy of the model's output. The block is
//! parsed with the first row as headers and re-serialised through
//! [`csv::Writer`], which normalises quoting and delimiters and rejects text
//! that is not actually tabular (ragged rows, prose, markdown). A rejected
//! block is a per-table skip with a diagnostic; only filesystem failures are
//! fatal.
//!
//! Filenames are `Page-<page>-<sanitised_title>.csv`. Two blocks from the
//! same page whose titles sanitise identically collide on the same path and
//! the later write wins — accepted behaviour, not an error.

use crate::error::ExtractError;
use crate::output::SavedTable;
use crate::pipeline::split::TableBlock;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::{info, warn};

/// Characters illegal in filenames on common platforms.
static RE_ILLEGAL_FILENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\\/*?:"<>|]"#).unwrap());

/// Strip `\ / * ? : " < > |` from a table title and trim whitespace.
///
/// Removes exactly those characters and nothing else. A title made entirely
/// of illegal characters sanitises to the empty string; the resulting
/// `Page-<n>-.csv` name is preserved as-is rather than invented around.
pub fn sanitize_title(name: &str) -> String {
    RE_ILLEGAL_FILENAME.replace_all(name, "").trim().to_string()
}

/// Validate `block.csv_text` and write it under `output_dir`.
///
/// Returns `Ok(Some(SavedTable))` on success, `Ok(None)` when the block was
/// rejected by the CSV parser (already logged, non-fatal), and `Err` only
/// for filesystem failures, which halt the run.
pub fn write_table(
    block: &TableBlock,
    output_dir: &Path,
) -> Result<Option<SavedTable>, ExtractError> {
    let title = sanitize_title(&block.title);
    let page = block.page_number;

    std::fs::create_dir_all(output_dir).map_err(|e| ExtractError::OutputWriteFailed {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    let Some((headers, rows)) = parse_csv(&block.csv_text, &title, page) else {
        return Ok(None);
    };

    let path = output_dir.join(format!("Page-{page}-{title}.csv"));
    let data = serialize_csv(&headers, &rows)?;
    std::fs::write(&path, data).map_err(|e| ExtractError::OutputWriteFailed {
        path: path.clone(),
        source: e,
    })?;

    info!("Saved: {}", path.display());
    Ok(Some(SavedTable {
        page_number: page,
        title,
        path,
        rows: rows.len(),
    }))
}

/// Parse the block as headers + records, logging and returning `None` on
/// anything the CSV reader rejects (or an empty block).
fn parse_csv(
    csv_text: &str,
    title: &str,
    page: usize,
) -> Option<(csv::StringRecord, Vec<csv::StringRecord>)> {
    if csv_text.trim().is_empty() {
        warn!("Failed to save '{title}' on page {page}: empty CSV block");
        return None;
    }

    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());

    let headers = match reader.headers() {
        Ok(h) => h.clone(),
        Err(e) => {
            warn!("Failed to save '{title}' on page {page}: {e}");
            return None;
        }
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        match record {
            Ok(r) => rows.push(r),
            Err(e) => {
                warn!("Failed to save '{title}' on page {page}: {e}");
                return None;
            }
        }
    }

    Some((headers, rows))
}

/// Re-serialise headers + rows with normalised quoting. Headers first, no
/// index column.
fn serialize_csv(
    headers: &csv::StringRecord,
    rows: &[csv::StringRecord],
) -> Result<Vec<u8>, ExtractError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(headers)
        .and_then(|_| rows.iter().try_for_each(|r| writer.write_record(r)))
        .map_err(|e| ExtractError::Internal(format!("CSV serialisation failed: {e}")))?;

    writer
        .into_inner()
        .map_err(|e| ExtractError::Internal(format!("CSV serialisation failed: {e}")))
}
