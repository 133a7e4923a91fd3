use serde::Serialize;

use crate::LoadError;
use crate::intake::SelectedFile;
use crate::preview::{PreviewHandle, PreviewSummary, TrustedPreview};

/// Everything a front end needs to render the viewer.
///
/// Owned by [`crate::ViewerController`]; front ends read it through
/// [`crate::ViewerController::state`] and never mutate it directly.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ViewerState {
    pub selected_file: Option<SelectedFile>,
    pub preview: Option<TrustedPreview>,
    /// Summary of the loaded preview, once the preview surface reports back.
    pub preview_summary: Option<PreviewSummary>,
    /// The single user-visible error, if any.
    pub error: Option<String>,
    pub extracted_text: String,
    pub is_extracting: bool,
    pub show_modal: bool,
    pub copy_success: bool,
}

/// Typed events delivered to the controller by the picker and the preview
/// surface.
#[derive(Debug)]
pub enum ViewerEvent {
    /// The picker closed; `None` when the user cancelled.
    FileChanged(Option<SelectedFile>),
    PreviewLoaded {
        handle: PreviewHandle,
        summary: PreviewSummary,
    },
    PreviewFailed {
        handle: PreviewHandle,
        error: LoadError,
    },
}
