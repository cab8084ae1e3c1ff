//! Run entry points: drive the pipeline over every page in range.
//!
//! The run is strictly sequential — one model call in flight at a time, no
//! cross-page state. A page that fails (no reply, no markers, every block
//! rejected) is recorded and the run moves on; only setup and filesystem
//! errors abort. Callers who want per-page events while the run progresses
//! inject a [`crate::progress::RunProgressCallback`].

use crate::config::ExtractionConfig;
use crate::error::{ExtractError, PageError};
use crate::output::{PageOutcome, RunOutput, RunStats};
use crate::pipeline::llm::{self, GroqClient, TableModel};
use crate::pipeline::source::PageRecord;
use crate::pipeline::{source, split, table};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Extract tables from a PDF into the configured output directory.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input`  — path to a local PDF file
/// * `config` — run configuration
///
/// # Returns
/// `Ok(RunOutput)` on completion, even if some or all pages produced nothing
/// (check `output.stats`).
///
/// # Errors
/// Returns `Err(ExtractError)` only for fatal conditions:
/// - file not found / unreadable / not a PDF
/// - no model client injected and `GROQ_API_KEY` unset
/// - output directory or CSV file unwritable
pub async fn run(
    input: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<RunOutput, ExtractError> {
    let input = input.as_ref();
    info!("Starting table extraction: {}", input.display());

    // ── Step 1: Resolve the model client ─────────────────────────────────
    let model = resolve_model(config)?;

    // ── Step 2: Extract page texts ───────────────────────────────────────
    let pages = source::extract_page_texts(input, config.pages)?;

    // ── Step 3: Drive the per-page pipeline ──────────────────────────────
    process_pages(pages, &model, config).await
}

/// Blocking wrapper around [`run`].
///
/// Creates a temporary tokio runtime internally.
pub fn run_sync(
    input: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<RunOutput, ExtractError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ExtractError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(run(input, config))
}

/// Process already-extracted pages through request → split → write.
///
/// Split out from [`run`] so integration tests can drive the full
/// orchestration with synthetic [`PageRecord`]s and a mock model, without a
/// PDF fixture or a live API.
pub async fn process_pages(
    pages: Vec<PageRecord>,
    model: &Arc<dyn TableModel>,
    config: &ExtractionConfig,
) -> Result<RunOutput, ExtractError> {
    let total_start = Instant::now();
    let total = pages.len();
    info!("Processing {total} pages");
    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(total);
    }

    let mut outcomes: Vec<PageOutcome> = Vec::with_capacity(total);
    let mut pages_answered = 0usize;

    for record in &pages {
        let page_num = record.page_number;
        let page_start = Instant::now();
        info!("Sending page {page_num} to {}", config.model);
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page_num, total);
        }

        let reply =
            llm::request_tables(model, page_num, &record.text, config.system_prompt.as_deref())
                .await;

        let mut outcome = PageOutcome {
            page_number: page_num,
            tables: Vec::new(),
            rejected_tables: 0,
            error: None,
            duration_ms: 0,
        };

        match reply {
            None => {
                // Already logged by the requester; record the skip.
                outcome.error = Some(PageError::ModelFailed {
                    page: page_num,
                    detail: "model request failed".into(),
                });
            }
            Some(raw) => {
                pages_answered += 1;
                let blocks = split::split_tables(&raw, page_num);
                if blocks.is_empty() {
                    outcome.error = Some(PageError::NoTablesFound { page: page_num });
                }
                for block in &blocks {
                    match table::write_table(block, &config.output_dir)? {
                        Some(saved) => outcome.tables.push(saved),
                        None => outcome.rejected_tables += 1,
                    }
                }
            }
        }

        outcome.duration_ms = page_start.elapsed().as_millis() as u64;

        if let Some(ref cb) = config.progress_callback {
            match &outcome.error {
                None => cb.on_page_complete(page_num, total, outcome.tables.len()),
                Some(e) => cb.on_page_error(page_num, total, &e.to_string()),
            }
        }

        outcomes.push(outcome);
    }

    let stats = RunStats {
        pages_with_text: total,
        pages_answered,
        pages_failed: outcomes.iter().filter(|o| o.error.is_some()).count(),
        tables_saved: outcomes.iter().map(|o| o.tables.len()).sum(),
        tables_rejected: outcomes.iter().map(|o| o.rejected_tables).sum(),
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    if stats.pages_failed > 0 {
        warn!(
            "{}/{} pages produced no tables",
            stats.pages_failed, stats.pages_with_text
        );
    }
    info!(
        "Run complete: {} tables from {} pages in {}ms",
        stats.tables_saved, stats.pages_with_text, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(total, stats.tables_saved);
    }

    Ok(RunOutput {
        pages: outcomes,
        stats,
    })
}

/// Resolve the model client: an injected [`TableModel`] takes priority,
/// otherwise a [`GroqClient`] is built from the environment. Construction is
/// scoped to the run — no ambient global client.
fn resolve_model(config: &ExtractionConfig) -> Result<Arc<dyn TableModel>, ExtractError> {
    if let Some(ref client) = config.client {
        return Ok(Arc::clone(client));
    }
    Ok(Arc::new(GroqClient::from_env(config)?))
}
