//! Prompts for LLM-based table extraction.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing the extraction instructions or
//!    the output template requires editing exactly one place. The splitter's
//!    marker grammar in [`crate::pipeline::split`] must stay in sync with the
//!    template below.
//!
//! 2. **Testability** — unit tests can inspect the rendered user prompt
//!    directly without a live model.
//!
//! Callers can override the system prompt via
//! [`crate::config::ExtractionConfig::system_prompt`]; the constant here is
//! used only when no override is provided.

/// Default system prompt asking the model to act as a table-extraction
/// assistant returning clean CSV.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a data assistant. Extract all tables from the following PDF page text. Return each table as clean CSVs. If multiple tables exist, return each table with a title like 'Table X: Title', followed by the CSV.";

/// Build the user message for a page.
///
/// Embeds the page text verbatim between literal delimiter lines and spells
/// out the required reply template: each table introduced by a
/// `**Table <N>: <Title>**` line followed immediately by CSV, with no
/// explanatory prose anywhere in the reply.
pub fn page_prompt(page_number: usize, text: &str) -> String {
    format!(
        r#"Extract all tables from this page and return them as clean CSVs (include headers and rows).

--- PAGE {page_number} TEXT START ---
{}
--- PAGE TEXT END ---

Return the output as:

**Table 1: Table Name**
<CSV>

**Table 2: Table Name**
<CSV>

Do not include explanations.
"#,
        text.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_prompt_embeds_trimmed_text_between_delimiters() {
        let prompt = page_prompt(42, "  Revenue 2023: 1,000  \n");
        assert!(prompt.contains("--- PAGE 42 TEXT START ---\nRevenue 2023: 1,000\n--- PAGE TEXT END ---"));
    }

    #[test]
    fn page_prompt_spells_out_marker_template() {
        let prompt = page_prompt(1, "x");
        assert!(prompt.contains("**Table 1: Table Name**"));
        assert!(prompt.contains("Do not include explanations."));
    }

    #[test]
    fn system_prompt_mentions_csv() {
        assert!(DEFAULT_SYSTEM_PROMPT.contains("CSV"));
    }
}
