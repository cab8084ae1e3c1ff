//! Response splitter: carve the model's reply into titled CSV blocks.
//!
//! ## The marker grammar
//!
//! The prompt instructs the model to introduce each table with a line of the
//! exact form `**Table <N>: <Title>**` followed immediately by CSV text. The
//! reply is therefore a preamble (usually empty, discarded) followed by an
//! alternating sequence of markers and bodies:
//!
//! ```text
//! [preamble] **Table 1: Sales** body₁ **Table 2: Notes** body₂ …
//! ```
//!
//! A body runs from the end of its marker to the start of the next marker or
//! the end of the reply. Splitting is done by iterating marker matches and
//! slicing between them rather than one monolithic split, so the edge cases
//! (trailing whitespace, marker at end of input, zero markers) are each
//! independently testable.
//!
//! Bodies are trimmed but otherwise passed through untouched; validation is
//! the table writer's job. A marker with an empty body still yields a block —
//! k markers always produce k blocks, in marker order.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

/// One titled CSV block carved out of a model reply.
///
/// `title` is the raw captured text; it may contain characters unsafe for
/// filenames and is sanitised by the writer, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBlock {
    /// Raw title text captured from the marker.
    pub title: String,
    /// Whitespace-trimmed body between this marker and the next.
    pub csv_text: String,
    /// 1-based page number the reply came from.
    pub page_number: usize,
}

/// `**Table <digits>: <title>**`, title non-greedy up to the closing stars.
static RE_TABLE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*Table\s+\d+:\s*(.*?)\*\*").unwrap());

/// Split a model reply into [`TableBlock`]s, in marker order.
///
/// A reply with no recognisable marker logs a diagnostic naming the page and
/// returns an empty vector — never an error. The orchestrator treats that
/// page as exhausted and moves on.
pub fn split_tables(raw_text: &str, page_number: usize) -> Vec<TableBlock> {
    let markers: Vec<(usize, usize, String)> = RE_TABLE_MARKER
        .captures_iter(raw_text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let title = caps.get(1)?.as_str().to_string();
            Some((whole.start(), whole.end(), title))
        })
        .collect();

    if markers.is_empty() {
        warn!("No valid tables found on page {page_number}");
        return Vec::new();
    }

    markers
        .iter()
        .enumerate()
        .map(|(i, (_, body_start, title))| {
            let body_end = markers
                .get(i + 1)
                .map(|(next_start, _, _)| *next_start)
                .unwrap_or(raw_text.len());
            TableBlock {
                title: title.clone(),
                csv_text: raw_text[*body_start..body_end].trim().to_string(),
                page_number,
            }
        })
        .collect()
}
