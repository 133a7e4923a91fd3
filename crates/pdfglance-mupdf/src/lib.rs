use mupdf::TextPageFlags;

use pdfglance_core::{Document, DocumentEngine, EngineError, PDF_MIME, Page};

/// MuPDF-based implementation of [`DocumentEngine`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency
/// (which is AGPL-3.0) so the core and its front ends do not link it
/// directly.
///
/// Each line of a page's structured text becomes one text run, in the
/// order MuPDF reports blocks and lines.
#[derive(Debug, Default)]
pub struct MupdfEngine;

impl MupdfEngine {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentEngine for MupdfEngine {
    fn open(&self, bytes: &[u8]) -> Result<Box<dyn Document>, EngineError> {
        let document = mupdf::Document::from_bytes(bytes, PDF_MIME)
            .map_err(|e| EngineError::OpenError(e.to_string()))?;

        if document
            .needs_password()
            .map_err(|e| EngineError::OpenError(e.to_string()))?
        {
            return Err(EngineError::PasswordRequired);
        }

        let page_count = document
            .page_count()
            .map_err(|e| EngineError::OpenError(e.to_string()))
            .and_then(checked_page_count)?;

        tracing::debug!(bytes = bytes.len(), pages = page_count, "opened document");
        Ok(Box::new(MupdfDocument {
            document,
            page_count,
        }))
    }
}

/// MuPDF reports page counts as `i32`; a negative one means a broken document.
fn checked_page_count(raw: i32) -> Result<usize, EngineError> {
    usize::try_from(raw)
        .map_err(|_| EngineError::OpenError(format!("invalid page count {raw}")))
}

struct MupdfDocument {
    document: mupdf::Document,
    page_count: usize,
}

impl Document for MupdfDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page(&self, index: usize) -> Result<Box<dyn Page + '_>, EngineError> {
        if index == 0 || index > self.page_count {
            return Err(EngineError::PageOutOfRange {
                page: index,
                count: self.page_count,
            });
        }
        // MuPDF numbers pages from zero.
        let page = self
            .document
            .load_page((index - 1) as i32)
            .map_err(|e| EngineError::ExtractionError(e.to_string()))?;
        Ok(Box::new(MupdfPage { page }))
    }
}

struct MupdfPage {
    page: mupdf::Page,
}

impl Page for MupdfPage {
    fn text_runs(&self) -> Result<Vec<String>, EngineError> {
        let text_page = self
            .page
            .to_text_page(TextPageFlags::empty())
            .map_err(|e| EngineError::ExtractionError(e.to_string()))?;

        let mut runs = Vec::new();
        for block in text_page.blocks() {
            for line in block.lines() {
                let line_text: String = line
                    .chars()
                    .map(|c| c.char().unwrap_or('\u{FFFD}'))
                    .collect();
                runs.push(line_text);
            }
        }
        Ok(runs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_page_count_is_an_open_error() {
        assert!(matches!(
            checked_page_count(-1),
            Err(EngineError::OpenError(msg)) if msg.contains("-1")
        ));
        assert_eq!(checked_page_count(0).unwrap(), 0);
        assert_eq!(checked_page_count(12).unwrap(), 12);
    }
}
