use pdfglance_core::{ExtractionJob, ExtractionOutcome, PreviewRequest, ViewerEvent};

/// Commands sent from the TUI to the backend.
pub enum BackendCommand {
    /// Load the preview pane for a live preview handle.
    LoadPreview {
        request: PreviewRequest,
        max_lines: usize,
    },
    /// Run a text extraction started by the controller.
    Extract(ExtractionJob),
}

/// Events flowing from the backend task to the TUI.
#[derive(Debug)]
pub enum BackendEvent {
    /// Preview surface outcome, routed through the controller.
    Viewer(ViewerEvent),
    /// Text extraction finished (successfully or not).
    ExtractionFinished(ExtractionOutcome),
}
