//! Page text source: read the PDF text layer, one string per page.
//!
//! ## Why catch_unwind?
//!
//! `pdf_extract` can panic on malformed input rather than returning an
//! error, so the extraction call is wrapped in [`std::panic::catch_unwind`]
//! and panics are converted into [`ExtractError::ExtractionFailed`]. We also
//! validate the `%PDF` magic bytes before handing the file to the parser so
//! callers get a meaningful error instead of a parser crash on, say, a DOCX
//! renamed to `.pdf`.

use crate::config::PageRange;
use crate::error::ExtractError;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A page that reached the pipeline: 1-based page number plus its
/// non-empty extracted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// 1-based absolute page number in the document.
    pub page_number: usize,
    /// The page's text layer, as extracted. Never empty.
    pub text: String,
}

/// Extract text for the pages in `range`, in increasing page order.
///
/// Pages whose text layer is empty or whitespace-only are silently dropped —
/// a scanned page without a text layer is expected, not an error. A `start`
/// beyond the end of the document yields an empty vector.
///
/// # Errors
/// Fatal only: missing/unreadable file, non-PDF content, or a document the
/// text extractor cannot open at all.
pub fn extract_page_texts(path: &Path, range: PageRange) -> Result<Vec<PageRecord>, ExtractError> {
    let bytes = read_pdf_bytes(path)?;
    let pages = extract_all_pages(&bytes, path)?;
    debug!("Extracted text layer for {} pages from {}", pages.len(), path.display());
    Ok(select_pages(pages, range))
}

/// Slice the full page list down to `range` and drop empty pages.
///
/// Pure so the range and skip semantics are testable without a PDF fixture.
/// Page numbers are 1-based absolute positions, independent of the range.
pub fn select_pages(pages: Vec<String>, range: PageRange) -> Vec<PageRecord> {
    let end = range.end.unwrap_or(pages.len()).min(pages.len());
    if range.start >= end {
        return Vec::new();
    }

    pages
        .into_iter()
        .enumerate()
        .skip(range.start)
        .take(end - range.start)
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(idx, text)| PageRecord {
            page_number: idx + 1,
            text,
        })
        .collect()
}

/// Read the file, mapping I/O errors and checking the PDF magic bytes.
fn read_pdf_bytes(path: &Path) -> Result<Vec<u8>, ExtractError> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ExtractError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(ExtractError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    };

    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        let n = bytes.len().min(4);
        magic[..n].copy_from_slice(&bytes[..n]);
        return Err(ExtractError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }

    Ok(bytes)
}

/// Run `pdf_extract` over the whole document, one string per page,
/// converting both errors and panics into [`ExtractError::ExtractionFailed`].
fn extract_all_pages(bytes: &[u8], path: &Path) -> Result<Vec<String>, ExtractError> {
    let owned = bytes.to_vec(); // owned copy for the unwind boundary
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(&owned)
    }));

    let fail = |detail: String| ExtractError::ExtractionFailed {
        path: PathBuf::from(path),
        detail,
    };

    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(fail(e.to_string())),
        Err(_) => Err(fail("text extraction panicked (malformed document)".into())),
    }
}
