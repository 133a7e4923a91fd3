use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("document is password-protected")]
    PasswordRequired,
    #[error("page {page} out of range (document has {count} pages)")]
    PageOutOfRange { page: usize, count: usize },
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
}

/// Trait for document engines.
///
/// The engine is an opaque capability: given raw bytes it produces a
/// [`Document`], a document hands out pages by 1-based index, and a page
/// reports its text runs in reading order. Everything above that (page
/// separators, modal state, error messages) lives in the controller.
pub trait DocumentEngine: Send + Sync {
    /// Open a document from its raw bytes.
    fn open(&self, bytes: &[u8]) -> Result<Box<dyn Document>, EngineError>;
}

/// An opened document.
pub trait Document {
    fn page_count(&self) -> usize;

    /// Load page `index` (1-based).
    fn page(&self, index: usize) -> Result<Box<dyn Page + '_>, EngineError>;
}

/// A single page of an opened document.
pub trait Page {
    /// The ordered text fragments reported for this page.
    fn text_runs(&self) -> Result<Vec<String>, EngineError>;
}
