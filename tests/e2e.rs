//! End-to-end tests for pdf2tables.
//!
//! The model boundary is mocked with canned replies, so every test here runs
//! the real orchestration — request, split, CSV round-trip, file writes —
//! without a network call or an API key. Output directories are tempdirs.

use async_trait::async_trait;
use pdf2tables::{
    process_pages, run, ExtractError, ExtractionConfig, ModelError, PageError, PageRecord,
    TableModel,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// A model scripted per page: replies keyed by the page number found in the
/// user prompt's `--- PAGE <N> TEXT START ---` delimiter.
struct ScriptedModel {
    replies: HashMap<usize, Result<String, String>>,
}

impl ScriptedModel {
    fn new(replies: Vec<(usize, Result<&str, &str>)>) -> Arc<dyn TableModel> {
        Arc::new(Self {
            replies: replies
                .into_iter()
                .map(|(page, r)| (page, r.map(str::to_string).map_err(str::to_string)))
                .collect(),
        })
    }
}

#[async_trait]
impl TableModel for ScriptedModel {
    async fn complete(&self, _system: &str, user: &str) -> Result<String, ModelError> {
        let page = page_number_in_prompt(user).expect("prompt must carry a page number");
        match self.replies.get(&page) {
            Some(Ok(reply)) => Ok(reply.clone()),
            Some(Err(detail)) => Err(ModelError::Api {
                status: 503,
                body: detail.clone(),
            }),
            None => panic!("unexpected model call for page {page}"),
        }
    }
}

fn page_number_in_prompt(user: &str) -> Option<usize> {
    let rest = user.split("--- PAGE ").nth(1)?;
    rest.split_whitespace().next()?.parse().ok()
}

fn page(page_number: usize, text: &str) -> PageRecord {
    PageRecord {
        page_number,
        text: text.to_string(),
    }
}

fn config_for(dir: &Path) -> ExtractionConfig {
    ExtractionConfig::builder()
        .output_dir(dir)
        .build()
        .expect("valid config")
}

fn csv_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

// ── Two tables on one page ───────────────────────────────────────────────────

#[tokio::test]
async fn two_tables_on_page_7_produce_two_files() {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::new(vec![(
        7,
        Ok("**Table 1: Sales**\nname,amount\nA,10\nB,20\n\n**Table 2: Notes**\nfoo,bar\n1,2"),
    )]);

    let output = process_pages(
        vec![page(7, "quarterly sales figures...")],
        &model,
        &config_for(dir.path()),
    )
    .await
    .unwrap();

    assert_eq!(
        csv_files(dir.path()),
        vec!["Page-7-Notes.csv", "Page-7-Sales.csv"]
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("Page-7-Sales.csv")).unwrap(),
        "name,amount\nA,10\nB,20\n"
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("Page-7-Notes.csv")).unwrap(),
        "foo,bar\n1,2\n"
    );

    assert_eq!(output.stats.tables_saved, 2);
    assert_eq!(output.stats.pages_failed, 0);
    assert_eq!(output.pages.len(), 1);
    assert!(output.pages[0].error.is_none());
    assert_eq!(output.pages[0].tables[0].title, "Sales");
    assert_eq!(output.pages[0].tables[1].title, "Notes");
}

// ── Markerless reply ─────────────────────────────────────────────────────────

#[tokio::test]
async fn markerless_reply_yields_zero_files_and_a_page_error() {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::new(vec![(3, Ok("This page contains no tabular data."))]);

    let output = process_pages(vec![page(3, "prose only")], &model, &config_for(dir.path()))
        .await
        .unwrap();

    assert!(csv_files(dir.path()).is_empty());
    assert_eq!(output.stats.pages_failed, 1);
    assert!(matches!(
        output.pages[0].error,
        Some(PageError::NoTablesFound { page: 3 })
    ));
}

// ── Model failure does not stop the run ──────────────────────────────────────

#[tokio::test]
async fn model_failure_on_one_page_continues_with_the_next() {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::new(vec![
        (1, Ok("**Table 1: First**\na,b\n1,2")),
        (2, Err("service unavailable")),
        (3, Ok("**Table 1: Third**\nc,d\n3,4")),
    ]);

    let output = process_pages(
        vec![page(1, "p1"), page(2, "p2"), page(3, "p3")],
        &model,
        &config_for(dir.path()),
    )
    .await
    .unwrap();

    // Pages 1 and 3 still produced their files.
    assert_eq!(
        csv_files(dir.path()),
        vec!["Page-1-First.csv", "Page-3-Third.csv"]
    );

    assert_eq!(output.pages.len(), 3);
    assert!(output.pages[0].error.is_none());
    assert!(matches!(
        output.pages[1].error,
        Some(PageError::ModelFailed { page: 2, .. })
    ));
    assert!(output.pages[2].error.is_none());
    assert_eq!(output.stats.pages_answered, 2);
    assert_eq!(output.stats.tables_saved, 2);
}

// ── Colliding titles: last write wins ────────────────────────────────────────

#[tokio::test]
async fn same_sanitised_title_twice_leaves_one_file_with_second_content() {
    let dir = tempfile::tempdir().unwrap();
    // "Sum:mary" and "Sum?mary" both sanitise to "Summary".
    let model = ScriptedModel::new(vec![(
        5,
        Ok("**Table 1: Sum:mary**\nx\nfirst\n\n**Table 2: Sum?mary**\nx\nsecond"),
    )]);

    let output = process_pages(vec![page(5, "p5")], &model, &config_for(dir.path()))
        .await
        .unwrap();

    assert_eq!(csv_files(dir.path()), vec!["Page-5-Summary.csv"]);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("Page-5-Summary.csv")).unwrap(),
        "x\nsecond\n"
    );
    // Both writes were recorded as saved; the collision is silent.
    assert_eq!(output.stats.tables_saved, 2);
}

// ── Rejected CSV blocks are per-table, not per-page ──────────────────────────

#[tokio::test]
async fn bad_csv_block_is_skipped_while_good_one_is_saved() {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::new(vec![(
        2,
        Ok("**Table 1: Good**\na,b\n1,2\n\n**Table 2: Ragged**\na,b\n1,2,3,4"),
    )]);

    let output = process_pages(vec![page(2, "p2")], &model, &config_for(dir.path()))
        .await
        .unwrap();

    assert_eq!(csv_files(dir.path()), vec!["Page-2-Good.csv"]);
    assert_eq!(output.stats.tables_saved, 1);
    assert_eq!(output.stats.tables_rejected, 1);
    // The page still produced a table, so it carries no error.
    assert!(output.pages[0].error.is_none());
    assert_eq!(output.pages[0].rejected_tables, 1);
}

// ── Quoting normalisation through the full path ──────────────────────────────

#[tokio::test]
async fn model_quoting_is_normalised_not_copied() {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::new(vec![(
        1,
        Ok("**Table 1: Quoted**\n\"name\",\"note\"\n\"A\",\"x, y\""),
    )]);

    process_pages(vec![page(1, "p1")], &model, &config_for(dir.path()))
        .await
        .unwrap();

    let content = std::fs::read_to_string(dir.path().join("Page-1-Quoted.csv")).unwrap();
    assert_eq!(content, "name,note\nA,\"x, y\"\n");
}

// ── Sequential order and page isolation ──────────────────────────────────────

#[tokio::test]
async fn outcomes_are_reported_in_page_order() {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::new(vec![
        (4, Ok("no markers")),
        (9, Ok("**Table 1: Nine**\na\n9")),
        (12, Err("boom")),
    ]);

    let output = process_pages(
        vec![page(4, "a"), page(9, "b"), page(12, "c")],
        &model,
        &config_for(dir.path()),
    )
    .await
    .unwrap();

    let order: Vec<usize> = output.pages.iter().map(|p| p.page_number).collect();
    assert_eq!(order, vec![4, 9, 12]);
    assert_eq!(output.stats.pages_with_text, 3);
    assert_eq!(output.stats.pages_failed, 2);
}

// ── Fatal input errors from the top-level run ────────────────────────────────

#[tokio::test]
async fn run_on_missing_file_is_fatal() {
    let model = ScriptedModel::new(vec![]);
    let config = ExtractionConfig::builder()
        .client(model)
        .build()
        .unwrap();

    let err = run("/no/such/document.pdf", &config).await;
    assert!(matches!(err, Err(ExtractError::FileNotFound { .. })));
}

#[tokio::test]
async fn run_on_non_pdf_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.pdf");
    std::fs::write(&path, b"PK\x03\x04 definitely a zip").unwrap();

    let model = ScriptedModel::new(vec![]);
    let config = ExtractionConfig::builder()
        .client(model)
        .build()
        .unwrap();

    let err = run(&path, &config).await;
    assert!(matches!(err, Err(ExtractError::NotAPdf { .. })));
}

// ── Structured report ────────────────────────────────────────────────────────

#[tokio::test]
async fn run_output_serialises_to_json() {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::new(vec![(1, Ok("**Table 1: T**\na\n1"))]);

    let output = process_pages(vec![page(1, "p")], &model, &config_for(dir.path()))
        .await
        .unwrap();

    let json = serde_json::to_string_pretty(&output).unwrap();
    assert!(json.contains("Page-1-T.csv"));
    assert!(json.contains("tables_saved"));
}

// ── Custom system prompt reaches the model ───────────────────────────────────

#[tokio::test]
async fn system_prompt_override_is_forwarded() {
    struct AssertingModel;

    #[async_trait]
    impl TableModel for AssertingModel {
        async fn complete(&self, system: &str, _user: &str) -> Result<String, ModelError> {
            assert_eq!(system, "custom directive");
            Ok("**Table 1: T**\na\n1".to_string())
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let model: Arc<dyn TableModel> = Arc::new(AssertingModel);
    let config = ExtractionConfig::builder()
        .output_dir(dir.path())
        .system_prompt("custom directive")
        .build()
        .unwrap();

    let output = process_pages(vec![page(1, "p")], &model, &config).await.unwrap();
    assert_eq!(output.stats.tables_saved, 1);
}
