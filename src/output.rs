//! Output types: per-table artefacts, per-page outcomes, and run statistics.
//!
//! The primary signal of a run is its diagnostics (tracing lines); these
//! types are the structured report returned to library callers so partial
//! success can be inspected programmatically — which pages produced tables,
//! which were skipped, and why.

use crate::error::PageError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A CSV file persisted by the table writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTable {
    /// 1-based page number the table came from.
    pub page_number: usize,
    /// Sanitised title used in the filename.
    pub title: String,
    /// Path the CSV was written to.
    pub path: PathBuf,
    /// Number of data rows (excluding the header row).
    pub rows: usize,
}

/// The outcome of processing a single page.
///
/// `error` is `Some` when the page produced nothing: either the model call
/// failed or its reply contained no table markers. Individual rejected CSV
/// blocks do not set `error` — they only bump `rejected_tables` — because
/// the page may still have produced other valid tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageOutcome {
    /// 1-based page number.
    pub page_number: usize,
    /// Tables written to disk for this page, in marker order.
    pub tables: Vec<SavedTable>,
    /// Table blocks whose CSV text failed to parse and were skipped.
    pub rejected_tables: usize,
    /// Why the page produced no tables at all, if it didn't.
    pub error: Option<PageError>,
    /// Wall-clock time spent on this page (dominated by the model call).
    pub duration_ms: u64,
}

/// Aggregate statistics for a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    /// Pages in range that had extractable text (records produced by the source).
    pub pages_with_text: usize,
    /// Pages whose model call returned a reply.
    pub pages_answered: usize,
    /// Pages recorded with a [`PageError`].
    pub pages_failed: usize,
    /// CSV files written.
    pub tables_saved: usize,
    /// Table blocks rejected by the CSV parser.
    pub tables_rejected: usize,
    /// Total wall-clock duration of the run.
    pub total_duration_ms: u64,
}

/// The full result of a run: per-page outcomes plus aggregate stats.
///
/// A run that saved zero tables is still `Ok` — completion is best-effort
/// and signalled through diagnostics, never through an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutput {
    /// One outcome per page that reached the pipeline, in page order.
    pub pages: Vec<PageOutcome>,
    /// Aggregate statistics.
    pub stats: RunStats,
}

impl RunOutput {
    /// All saved tables across every page, in page-then-marker order.
    pub fn saved_tables(&self) -> impl Iterator<Item = &SavedTable> {
        self.pages.iter().flat_map(|p| p.tables.iter())
    }
}
