//! Pipeline stages for page-to-CSV table extraction.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap
//! implementations (e.g. a different text extractor or model provider)
//! without touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! source ──▶ llm ──▶ split ──▶ table
//! (text)  (model)  (blocks)  (CSV files)
//! ```
//!
//! 1. [`source`] — read the PDF text layer for the selected range, dropping
//!    pages with no extractable text
//! 2. [`llm`]    — one chat-completion call per page; the only stage with
//!    network I/O, and the only non-deterministic one
//! 3. [`split`]  — carve the reply into titled CSV blocks on the
//!    `**Table N: Title**` marker grammar
//! 4. [`table`]  — validate each block through a CSV round-trip and persist
//!    it as `Page-<n>-<title>.csv`

pub mod llm;
pub mod source;
pub mod split;
pub mod table;
