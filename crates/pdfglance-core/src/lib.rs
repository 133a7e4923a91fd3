use thiserror::Error;

pub mod clipboard;
pub mod config_file;
pub mod controller;
pub mod engine;
pub mod extract;
pub mod intake;
pub mod mock;
pub mod preview;
pub mod size;
pub mod state;

// Re-export for convenience
pub use clipboard::{ClipboardError, Osc52Host, PrimaryClipboard, SurfaceHost, SystemClipboard};
pub use config_file::{ConfigFile, Settings};
pub use controller::{
    EXTRACTION_FAILED_ERROR, ExtractionJob, ExtractionOutcome, INVALID_FILE_ERROR,
    PREVIEW_FAILED_ERROR, ViewerController,
};
pub use engine::{Document, DocumentEngine, EngineError, Page};
pub use extract::{ExtractedText, extract_document_text};
pub use intake::{FileSource, IntakeError, PDF_MIME, SelectedFile};
pub use preview::{PreviewHandle, PreviewRequest, PreviewSummary, TrustedPreview};
pub use size::format_file_size;
pub use state::{ViewerEvent, ViewerState};

/// Failure while reading a file and handing it to the document engine.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read file: {0}")]
    Read(#[from] std::io::Error),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("background task failed: {0}")]
    Task(String),
}
