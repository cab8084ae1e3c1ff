//! CLI binary for pdf2tables.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use pdf2tables::{
    run, ExtractionConfig, PageRange, ProgressCallback, RunProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus a per-page log line. Pages
/// complete strictly in order, so no out-of-order bookkeeping is needed.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set by `on_run_start`
    /// (called once the page texts are extracted).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_run_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading PDF…");
        bar.enable_steady_tick(std::time::Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl RunProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_pages: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Extracting");
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Processing {total_pages} pages…"))
        ));
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, tables_saved: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!(
                "{tables_saved} table{}",
                if tables_saved == 1 { "" } else { "s" }
            )),
        ));
        self.bar.inc(1);
    }

    fn on_page_error(&self, page_num: usize, total: usize, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg = if error.chars().count() > 80 {
            let head: String = error.chars().take(79).collect();
            format!("{head}\u{2026}")
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            red("✗"),
            page_num,
            total,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, total_pages: usize, tables_saved: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} tables saved from {} pages",
            if tables_saved > 0 { green("✔") } else { cyan("⚠") },
            bold(&tables_saved.to_string()),
            total_pages,
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract tables from every page into ./tables/
  pdf2tables report.pdf

  # Pages 301-306 only, custom output directory
  pdf2tables --pages 301-306 --output-dir out/tables publication.pdf

  # A different Groq model, structured JSON report on stdout
  pdf2tables --model llama-3.3-70b-versatile --json report.pdf

OUTPUT:
  One CSV file per detected table, named Page-<page>-<title>.csv.
  Existing files with the same name are overwritten.

ENVIRONMENT VARIABLES:
  GROQ_API_KEY   Groq API key (required)

SETUP:
  1. Set API key:      export GROQ_API_KEY=gsk_...
  2. Extract tables:   pdf2tables report.pdf
"#;

/// Extract tables from PDF pages as CSV files using a hosted LLM.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2tables",
    version,
    about = "Extract tables from PDF pages as CSV files using a hosted LLM",
    long_about = "Send each PDF page's text to a Groq-hosted chat-completion model, ask it to \
return every table as titled CSV, validate each block through a CSV parser, and write one \
file per table.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path.
    input: PathBuf,

    /// Directory to write CSV files into.
    #[arg(short, long, env = "PDF2TABLES_OUTPUT_DIR", default_value = "tables")]
    output_dir: PathBuf,

    /// Page selection: all, 5, or 301-306 (1-indexed, inclusive).
    #[arg(long, env = "PDF2TABLES_PAGES", default_value = "all")]
    pages: String,

    /// Chat-completion model ID.
    #[arg(long, env = "PDF2TABLES_MODEL", default_value = "llama3-70b-8192")]
    model: String,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "PDF2TABLES_TEMPERATURE", default_value_t = 0.2)]
    temperature: f32,

    /// Max model output tokens per page.
    #[arg(long, env = "PDF2TABLES_MAX_TOKENS", default_value_t = 4096)]
    max_tokens: usize,

    /// Per-page API call timeout in seconds.
    #[arg(long, env = "PDF2TABLES_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, env = "PDF2TABLES_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Output a structured JSON report (RunOutput) instead of a summary.
    #[arg(long, env = "PDF2TABLES_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2TABLES_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2TABLES_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2TABLES_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn RunProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb).await?;

    // ── Run ──────────────────────────────────────────────────────────────
    let output = run(&cli.input, &config)
        .await
        .context("Table extraction failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(json.as_bytes())
            .and_then(|_| handle.write_all(b"\n"))
            .context("Failed to write to stdout")?;
    } else if !cli.quiet && !show_progress {
        // Only print inline stats when the progress callback is disabled.
        eprintln!(
            "Saved {} tables from {} pages in {}ms",
            output.stats.tables_saved, output.stats.pages_with_text, output.stats.total_duration_ms
        );
        if output.stats.pages_failed > 0 {
            eprintln!("  {} pages produced no tables", output.stats.pages_failed);
        }
        if output.stats.tables_rejected > 0 {
            eprintln!(
                "  {} table blocks rejected by the CSV parser",
                output.stats.tables_rejected
            );
        }
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let system_prompt = if let Some(ref path) = cli.system_prompt {
        Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read system prompt from {:?}", path))?,
        )
    } else {
        None
    };

    let pages = parse_pages(&cli.pages)?;

    let mut builder = ExtractionConfig::builder()
        .model(&cli.model)
        .pages(pages)
        .output_dir(&cli.output_dir)
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .api_timeout_secs(cli.api_timeout);

    if let Some(prompt) = system_prompt {
        builder = builder.system_prompt(prompt);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--pages` (1-indexed, inclusive) into the library's 0-based
/// half-open `PageRange`.
fn parse_pages(s: &str) -> Result<PageRange> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageRange::all());
    }

    // Range: "301-306"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start.trim().parse().context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;

        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", start);
        }
        if start > end {
            anyhow::bail!("Invalid page range '{}-{}': start must be <= end", start, end);
        }

        return Ok(PageRange::new(start - 1, Some(end)));
    }

    // Single page: "5"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", page);
    }

    Ok(PageRange::single(page))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pages_all() {
        assert_eq!(parse_pages("all").unwrap(), PageRange::all());
        assert_eq!(parse_pages(" ALL ").unwrap(), PageRange::all());
    }

    #[test]
    fn parse_pages_single() {
        assert_eq!(parse_pages("5").unwrap(), PageRange::new(4, Some(5)));
    }

    #[test]
    fn parse_pages_inclusive_range_maps_to_half_open() {
        assert_eq!(parse_pages("301-306").unwrap(), PageRange::new(300, Some(306)));
    }

    #[test]
    fn parse_pages_rejects_garbage() {
        assert!(parse_pages("abc").is_err());
        assert!(parse_pages("0").is_err());
        assert!(parse_pages("9-3").is_err());
    }
}
