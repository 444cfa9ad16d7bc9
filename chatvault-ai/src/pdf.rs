use std::path::Path;

use lopdf::Document;
use tracing::warn;

use chatvault_common::Error;

/// Text extracted from one PDF page.
#[derive(Debug, Clone)]
pub struct PageText {
    /// 1-based page number.
    pub page: u32,
    pub text: String,
}

/// Extract text page by page. Pages whose extraction fails are skipped with
/// a warning; a document that fails to parse at all is an error.
pub fn extract_pages(path: &Path) -> Result<Vec<PageText>, Error> {
    let doc = Document::load(path)
        .map_err(|e| Error::Pdf(format!("{}: {}", path.display(), e)))?;

    let mut pages = Vec::new();
    for (page_num, _object_id) in doc.get_pages() {
        match doc.extract_text(&[page_num]) {
            Ok(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    pages.push(PageText {
                        page: page_num,
                        text: text.to_string(),
                    });
                }
            }
            Err(e) => {
                warn!(
                    "Skipping page {} of {}: text extraction failed ({})",
                    page_num,
                    path.display(),
                    e
                );
            }
        }
    }
    Ok(pages)
}
