//! Progress-callback trait for per-page run events.
//!
//! Inject an [`Arc<dyn RunProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! events as the pipeline works through each page.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a terminal progress bar, a log file, or a database
//! record without the library knowing anything about how the host application
//! communicates. The trait is `Send + Sync` so the same implementation works
//! from a CLI or an async service.

use std::sync::Arc;

/// Called by the run as it processes each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Pages are processed strictly sequentially, so no
/// two methods are ever called concurrently within one run.
pub trait RunProgressCallback: Send + Sync {
    /// Called once after page texts are extracted, before any model call.
    ///
    /// # Arguments
    /// * `total_pages` — pages with extractable text that will be processed
    fn on_run_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called just before the model request is sent for a page.
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called when a page has been fully processed.
    ///
    /// # Arguments
    /// * `tables_saved` — CSV files written for this page (may be 0)
    fn on_page_complete(&self, page_num: usize, total_pages: usize, tables_saved: usize) {
        let _ = (page_num, total_pages, tables_saved);
    }

    /// Called when a page produced nothing (model failure or no markers).
    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        let _ = (page_num, total_pages, error);
    }

    /// Called once after all pages have been attempted.
    fn on_run_complete(&self, total_pages: usize, tables_saved: usize) {
        let _ = (total_pages, tables_saved);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl RunProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn RunProgressCallback>;
