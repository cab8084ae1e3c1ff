//! Configuration types for table extraction runs.
//!
//! All run behaviour is controlled through [`ExtractionConfig`], built via its
//! [`ExtractionConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across calls, log them, and diff two runs to
//! understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor is unreadable and breaks on every new field. The
//! builder lets callers set only what they care about and rely on documented
//! defaults for the rest.

use crate::error::ExtractError;
use crate::pipeline::llm::TableModel;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for a table-extraction run.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2tables::{ExtractionConfig, PageRange};
///
/// let config = ExtractionConfig::builder()
///     .model("llama3-70b-8192")
///     .pages(PageRange::new(300, Some(306)))
///     .output_dir("tables")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Chat-completion model identifier. Default: `llama3-70b-8192`.
    pub model: String,

    /// Pre-constructed model client. Takes precedence over the built-in
    /// Groq client; inject a mock here in tests.
    pub client: Option<Arc<dyn TableModel>>,

    /// Sampling temperature for the completion. Default: 0.2.
    ///
    /// Low temperature keeps the model faithful to the digits and labels it
    /// sees on the page. Higher values introduce creativity that corrupts
    /// transcribed values.
    pub temperature: f32,

    /// Maximum tokens the model may generate per page. Default: 4096.
    ///
    /// A dense page can carry several tables; set this too low and the last
    /// table is silently truncated mid-row.
    pub max_tokens: usize,

    /// Per-API-call timeout in seconds. Default: 60.
    ///
    /// There is no retry: a timed-out page is logged and skipped, matching
    /// the one-call-per-page contract.
    pub api_timeout_secs: u64,

    /// Page range to process. Default: all pages.
    pub pages: PageRange,

    /// Directory the CSV files are written to. Default: `tables`.
    ///
    /// Created on first write if absent. Existing files with the same name
    /// are overwritten silently.
    pub output_dir: PathBuf,

    /// Custom system prompt. If None, uses the built-in default.
    pub system_prompt: Option<String>,

    /// Optional per-page progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            model: "llama3-70b-8192".to_string(),
            client: None,
            temperature: 0.2,
            max_tokens: 4096,
            api_timeout_secs: 60,
            pages: PageRange::default(),
            output_dir: PathBuf::from("tables"),
            system_prompt: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("model", &self.model)
            .field("client", &self.client.as_ref().map(|_| "<dyn TableModel>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("pages", &self.pages)
            .field("output_dir", &self.output_dir)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn client(mut self, client: Arc<dyn TableModel>) -> Self {
        self.config.client = Some(client);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn pages(mut self, range: PageRange) -> Self {
        self.config.pages = range;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(ExtractError::InvalidConfig(
                "Model identifier must not be empty".into(),
            ));
        }
        if let Some(end) = c.pages.end {
            if end <= c.pages.start {
                return Err(ExtractError::InvalidConfig(format!(
                    "Page range end ({}) must be greater than start ({})",
                    end, c.pages.start
                )));
            }
        }
        Ok(self.config)
    }
}

// ── Page range ───────────────────────────────────────────────────────────

/// A half-open range of pages to process, in 0-based document order.
///
/// `start` defaults to 0 (first page); `end` is exclusive, with `None`
/// meaning "through the last page". This is deliberately slice-shaped:
/// the page *numbers* reported downstream are always 1-based regardless.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    /// First page to process, 0-based. Default: 0.
    pub start: usize,
    /// One past the last page to process, 0-based. `None` = end of document.
    pub end: Option<usize>,
}

impl PageRange {
    /// Range covering the whole document.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(start: usize, end: Option<usize>) -> Self {
        Self { start, end }
    }

    /// A single page given its 1-based page number.
    pub fn single(page_number: usize) -> Self {
        let idx = page_number.saturating_sub(1);
        Self {
            start: idx,
            end: Some(idx + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = ExtractionConfig::builder().build().unwrap();
        assert_eq!(config.model, "llama3-70b-8192");
        assert_eq!(config.output_dir, PathBuf::from("tables"));
        assert_eq!(config.pages, PageRange::all());
        assert!(config.client.is_none());
    }

    #[test]
    fn builder_rejects_empty_model() {
        let err = ExtractionConfig::builder().model("  ").build();
        assert!(matches!(err, Err(ExtractError::InvalidConfig(_))));
    }

    #[test]
    fn builder_rejects_inverted_range() {
        let err = ExtractionConfig::builder()
            .pages(PageRange::new(10, Some(5)))
            .build();
        assert!(matches!(err, Err(ExtractError::InvalidConfig(_))));
    }

    #[test]
    fn temperature_is_clamped() {
        let config = ExtractionConfig::builder()
            .temperature(9.0)
            .build()
            .unwrap();
        assert_eq!(config.temperature, 2.0);
    }

    #[test]
    fn single_page_range() {
        assert_eq!(PageRange::single(7), PageRange::new(6, Some(7)));
        // Page numbers are 1-based; 0 degrades to the first page.
        assert_eq!(PageRange::single(0), PageRange::new(0, Some(1)));
    }
}
