//! # pdf2tables
//!
//! Extract tables from PDF pages as CSV files using a hosted LLM.
//!
//! ## Why this crate?
//!
//! Geometric table detection (ruling lines, column clustering) breaks down on
//! the layouts real reports use — merged cells, wrapped headers, tables set
//! apart only by whitespace. Instead this crate hands each page's *text* to a
//! chat-completion model and asks it to return every table it can see as
//! titled CSV, then validates each block through a real CSV parser before
//! anything touches disk. The model output is never trusted verbatim.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Source  read the text layer per page (pdf-extract), skip empty pages
//!  ├─ 2. Model   one chat-completion call per page (Groq, llama3-70b-8192)
//!  ├─ 3. Split   carve the reply on `**Table N: Title**` markers
//!  └─ 4. Write   CSV round-trip, then tables/Page-<n>-<title>.csv
//! ```
//!
//! Processing is strictly sequential, one page at a time. A failed page —
//! model error, markerless reply, unparseable CSV — is logged and skipped;
//! the run never aborts for anything short of a filesystem error.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2tables::{run, ExtractionConfig, PageRange};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credential read from GROQ_API_KEY
//!     let config = ExtractionConfig::builder()
//!         .pages(PageRange::new(300, Some(306)))
//!         .output_dir("tables")
//!         .build()?;
//!     let output = run("publication.pdf", &config).await?;
//!     eprintln!(
//!         "{} tables saved from {} pages",
//!         output.stats.tables_saved, output.stats.pages_with_text
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2tables` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2tables = { version = "0.1", default-features = false }
//! ```
//!
//! ## Testing without a live model
//!
//! The model boundary is the one-operation [`TableModel`] trait. Inject a
//! mock via [`ExtractionConfig::builder()`]'s `client` to feed canned
//! replies through the full split/write path — no API key, no network.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod run;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, PageRange};
pub use error::{ExtractError, PageError};
pub use output::{PageOutcome, RunOutput, RunStats, SavedTable};
pub use pipeline::llm::{GroqClient, ModelError, TableModel};
pub use pipeline::source::PageRecord;
pub use pipeline::split::TableBlock;
pub use progress::{NoopProgressCallback, ProgressCallback, RunProgressCallback};
pub use run::{process_pages, run, run_sync};
