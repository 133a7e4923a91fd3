use crate::engine::{DocumentEngine, EngineError};

/// Text pulled from a whole document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub page_count: usize,
}

/// Render one page's block: a separator line, the page's runs joined by
/// single spaces, then a blank line.
pub fn page_block(index: usize, runs: &[String]) -> String {
    format!("--- Page {} ---\n{}\n\n", index, runs.join(" "))
}

/// Open `bytes` with `engine` and concatenate every page's block in page
/// order. Any engine failure aborts the whole extraction.
pub fn extract_document_text(
    engine: &dyn DocumentEngine,
    bytes: &[u8],
) -> Result<ExtractedText, EngineError> {
    let document = engine.open(bytes)?;
    let page_count = document.page_count();

    let mut text = String::new();
    for index in 1..=page_count {
        let runs = document.page(index)?.text_runs()?;
        tracing::trace!(page = index, runs = runs.len(), "page text extracted");
        text.push_str(&page_block(index, &runs));
    }

    tracing::debug!(pages = page_count, chars = text.len(), "document text extracted");
    Ok(ExtractedText { text, page_count })
}
