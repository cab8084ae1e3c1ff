//! Error types for the pdf2tables library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ExtractError`] — **Fatal**: the run cannot proceed at all (bad input
//!   file, missing API key, output directory unwritable). Returned as
//!   `Err(ExtractError)` from the top-level `run*` functions.
//!
//! * [`PageError`] — **Non-fatal**: a single page yielded nothing usable
//!   (the model call failed, or its reply contained no table markers) but all
//!   other pages are fine. Stored inside [`crate::output::PageOutcome`] so
//!   callers can inspect partial success rather than losing the whole run to
//!   one bad page.
//!
//! The separation mirrors the run semantics: model and parse failures are
//! best-effort diagnostics, filesystem failures halt the run.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2tables library.
///
/// Page-level failures use [`PageError`] and are stored in
/// [`crate::output::PageOutcome`] rather than propagated here.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// The text layer could not be extracted from the document at all.
    #[error("Failed to extract text from '{path}': {detail}")]
    ExtractionFailed { path: PathBuf, detail: String },

    // ── Model errors ──────────────────────────────────────────────────────
    /// No model client was injected and the API key env var is unset.
    #[error("No LLM client configured and {var} is not set.\nSet {var}=gsk_... or inject a TableModel via ExtractionConfig.")]
    MissingApiKey { var: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create the output directory or write a CSV file.
    #[error("Failed to write output '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single page.
///
/// Stored in [`crate::output::PageOutcome`] when a page produces no tables.
/// The run always continues with the next page.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// The model call failed (network error, API error, empty reply).
    #[error("Page {page}: model request failed: {detail}")]
    ModelFailed { page: usize, detail: String },

    /// The model replied but the reply contained no table markers.
    #[error("Page {page}: no valid tables found in model response")]
    NoTablesFound { page: usize },
}
