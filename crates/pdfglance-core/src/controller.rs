use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::LoadError;
use crate::clipboard::{PrimaryClipboard, SurfaceHost, fallback_copy};
use crate::engine::DocumentEngine;
use crate::extract::{ExtractedText, extract_document_text};
use crate::intake::{FileSource, SelectedFile};
use crate::preview::{PreviewHandle, PreviewRegistry, PreviewRequest, PreviewSummary};
use crate::state::{ViewerEvent, ViewerState};

pub const INVALID_FILE_ERROR: &str = "Please select a valid PDF file.";
pub const EXTRACTION_FAILED_ERROR: &str =
    "Failed to extract text from PDF. The file might be corrupted or password-protected.";
pub const PREVIEW_FAILED_ERROR: &str = "Failed to display PDF preview";

/// How long the copy-success flag stays up.
pub const DEFAULT_COPY_FEEDBACK: Duration = Duration::from_millis(2000);

/// An extraction that has been started but not yet run.
///
/// Produced by [`ViewerController::begin_extraction`]; the front end runs it
/// wherever it likes and hands the outcome back to
/// [`ViewerController::finish_extraction`].
#[derive(Debug, Clone)]
pub struct ExtractionJob {
    generation: u64,
    file_name: String,
    source: FileSource,
}

/// Result of running an [`ExtractionJob`].
#[derive(Debug)]
pub struct ExtractionOutcome {
    generation: u64,
    pub result: Result<ExtractedText, LoadError>,
}

impl ExtractionJob {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Settle a job that will never run, so the outcome still clears the
    /// in-progress flag.
    pub fn abandon(self, error: LoadError) -> ExtractionOutcome {
        tracing::warn!(file = %self.file_name, error = %error, "extraction abandoned");
        ExtractionOutcome {
            generation: self.generation,
            result: Err(error),
        }
    }

    /// Read the file and extract every page's text.
    pub async fn run(self, engine: Arc<dyn DocumentEngine>) -> ExtractionOutcome {
        ExtractionOutcome {
            generation: self.generation,
            result: read_and_extract(&self.file_name, &self.source, engine).await,
        }
    }
}

async fn read_and_extract(
    file_name: &str,
    source: &FileSource,
    engine: Arc<dyn DocumentEngine>,
) -> Result<ExtractedText, LoadError> {
    let bytes = source.read_bytes().await?;
    tracing::debug!(file = file_name, bytes = bytes.len(), "extracting text");
    let extracted =
        tokio::task::spawn_blocking(move || extract_document_text(engine.as_ref(), &bytes))
            .await
            .map_err(|e| LoadError::Task(e.to_string()))??;
    Ok(extracted)
}

/// Owns the [`ViewerState`] and every operation that changes it.
pub struct ViewerController {
    state: ViewerState,
    engine: Arc<dyn DocumentEngine>,
    clipboard: Arc<dyn PrimaryClipboard>,
    fallback: Option<Box<dyn SurfaceHost>>,
    previews: PreviewRegistry,
    /// Pending copy-flag resets, oldest first. A new copy does not cancel
    /// earlier ones.
    copy_resets: VecDeque<Instant>,
    copy_feedback: Duration,
    /// Bumped on every accepted file selection.
    generation: u64,
}

impl ViewerController {
    pub fn new(engine: Arc<dyn DocumentEngine>, clipboard: Arc<dyn PrimaryClipboard>) -> Self {
        Self {
            state: ViewerState::default(),
            engine,
            clipboard,
            fallback: None,
            previews: PreviewRegistry::new(),
            copy_resets: VecDeque::new(),
            copy_feedback: DEFAULT_COPY_FEEDBACK,
            generation: 0,
        }
    }

    /// Install the surface host used when the primary clipboard fails.
    pub fn with_fallback(mut self, host: Box<dyn SurfaceHost>) -> Self {
        self.fallback = Some(host);
        self
    }

    pub fn with_copy_feedback(mut self, feedback: Duration) -> Self {
        self.copy_feedback = feedback;
        self
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn engine(&self) -> Arc<dyn DocumentEngine> {
        Arc::clone(&self.engine)
    }

    /// Number of preview handles still live.
    pub fn live_previews(&self) -> usize {
        self.previews.live_count()
    }

    pub fn handle_event(&mut self, event: ViewerEvent) {
        match event {
            ViewerEvent::FileChanged(file) => self.on_file_selected(file),
            ViewerEvent::PreviewLoaded { handle, summary } => {
                self.on_preview_loaded(handle, summary)
            }
            ViewerEvent::PreviewFailed { handle, error } => self.on_preview_failed(handle, error),
        }
    }

    /// Accept or reject a picked file. `None` (cancelled picker) changes
    /// nothing.
    pub fn on_file_selected(&mut self, file: Option<SelectedFile>) {
        let Some(file) = file else {
            return;
        };

        self.state.error = None;
        self.release_preview();

        if file.is_pdf() {
            tracing::info!(file = %file.name, size = file.size, "file selected");
            self.generation += 1;
            self.state.preview = Some(self.previews.create(file.source.clone()));
            self.state.selected_file = Some(file);
        } else {
            tracing::info!(
                file = %file.name,
                declared_type = %file.declared_type,
                "rejected non-PDF file"
            );
            self.state.error = Some(INVALID_FILE_ERROR.to_string());
            self.state.selected_file = None;
        }
    }

    fn release_preview(&mut self) {
        if let Some(preview) = self.state.preview.take() {
            self.previews.revoke(&preview);
        }
        self.state.preview_summary = None;
    }

    /// A load request for the current preview handle, if one is live.
    pub fn preview_request(&self) -> Option<PreviewRequest> {
        let preview = self.state.preview.as_ref()?;
        let source = self.previews.resolve(preview)?;
        Some(PreviewRequest {
            handle: preview.handle(),
            source,
        })
    }

    fn is_current_preview(&self, handle: PreviewHandle) -> bool {
        self.state
            .preview
            .as_ref()
            .is_some_and(|p| p.handle() == handle)
    }

    pub fn on_preview_loaded(&mut self, handle: PreviewHandle, summary: PreviewSummary) {
        if !self.is_current_preview(handle) {
            tracing::debug!(handle = %handle, "ignoring load of superseded preview");
            return;
        }
        tracing::debug!(handle = %handle, pages = summary.page_count, "preview loaded");
        self.state.preview_summary = Some(summary);
    }

    pub fn on_preview_failed(&mut self, handle: PreviewHandle, error: LoadError) {
        if !self.is_current_preview(handle) {
            tracing::debug!(handle = %handle, "ignoring failure of superseded preview");
            return;
        }
        tracing::error!(handle = %handle, error = %error, "preview failed");
        self.state.error = Some(PREVIEW_FAILED_ERROR.to_string());
    }

    /// Mark an extraction as started and hand back the job to run. Returns
    /// `None` when no file is selected.
    pub fn begin_extraction(&mut self) -> Option<ExtractionJob> {
        let file = self.state.selected_file.as_ref()?;
        let job = ExtractionJob {
            generation: self.generation,
            file_name: file.name.clone(),
            source: file.source.clone(),
        };
        self.state.is_extracting = true;
        self.state.error = None;
        Some(job)
    }

    /// Apply an extraction outcome. Always clears the in-progress flag.
    ///
    /// Outcomes are applied even if a different file has been selected since
    /// the job started.
    pub fn finish_extraction(&mut self, outcome: ExtractionOutcome) {
        if outcome.generation != self.generation {
            tracing::debug!(
                job = outcome.generation,
                current = self.generation,
                "applying extraction outcome for a superseded file"
            );
        }

        match outcome.result {
            Ok(extracted) => {
                tracing::info!(pages = extracted.page_count, "text extraction complete");
                self.state.extracted_text = extracted.text;
                self.state.show_modal = true;
            }
            Err(e) => {
                tracing::error!(error = %e, "text extraction failed");
                self.state.error = Some(EXTRACTION_FAILED_ERROR.to_string());
            }
        }
        self.state.is_extracting = false;
    }

    /// Extract the selected file's text and open the modal.
    pub async fn extract_text(&mut self) {
        let Some(job) = self.begin_extraction() else {
            return;
        };
        let outcome = job.run(self.engine()).await;
        self.finish_extraction(outcome);
    }

    /// Copy the extracted text, falling back to the transient surface when
    /// the primary clipboard fails. Fallback failures are logged only.
    pub async fn copy_text(&mut self) {
        let text = self.state.extracted_text.clone();
        let clipboard = Arc::clone(&self.clipboard);
        let primary = tokio::task::spawn_blocking(move || clipboard.write_text(&text)).await;

        let error = match primary {
            Ok(Ok(())) => {
                tracing::debug!(chars = self.state.extracted_text.len(), "copied to clipboard");
                self.mark_copied();
                return;
            }
            Ok(Err(e)) => e.to_string(),
            Err(e) => e.to_string(),
        };
        tracing::warn!(error = %error, "clipboard write failed, using fallback");

        let Some(host) = self.fallback.as_deref_mut() else {
            tracing::error!("fallback copy failed: no fallback surface configured");
            return;
        };
        match fallback_copy(host, &self.state.extracted_text) {
            Ok(()) => self.mark_copied(),
            Err(e) => tracing::error!(error = %e, "fallback copy failed"),
        }
    }

    fn mark_copied(&mut self) {
        self.state.copy_success = true;
        self.copy_resets.push_back(Instant::now() + self.copy_feedback);
    }

    /// Apply every copy-flag reset due at `now`.
    pub fn poll_timers(&mut self, now: Instant) {
        while let Some(&due) = self.copy_resets.front() {
            if due > now {
                break;
            }
            self.copy_resets.pop_front();
            self.state.copy_success = false;
        }
    }

    /// When the next copy-flag reset is due.
    pub fn next_timer(&self) -> Option<Instant> {
        self.copy_resets.front().copied()
    }

    pub fn close_modal(&mut self) {
        self.state.show_modal = false;
        self.state.copy_success = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::PDF_MIME;
    use crate::mock::{MockClipboard, MockEngine};

    fn controller() -> ViewerController {
        ViewerController::new(
            Arc::new(MockEngine::with_pages(vec![vec!["A"]])),
            Arc::new(MockClipboard::new()),
        )
    }

    fn pdf(name: &str) -> SelectedFile {
        SelectedFile::from_bytes(name, PDF_MIME, b"%PDF-1.7".to_vec())
    }

    #[test]
    fn pdf_selection_stores_file_and_preview() {
        let mut c = controller();
        c.on_file_selected(Some(pdf("a.pdf")));
        assert_eq!(c.state().selected_file.as_ref().unwrap().name, "a.pdf");
        assert!(c.state().preview.is_some());
        assert!(c.state().error.is_none());
        assert!(c.preview_request().is_some());
    }

    #[test]
    fn rejection_clears_file_and_preview() {
        let mut c = controller();
        c.on_file_selected(Some(pdf("a.pdf")));
        c.on_file_selected(Some(SelectedFile::from_bytes("a.png", "image/png", vec![0u8])));
        assert_eq!(c.state().error.as_deref(), Some(INVALID_FILE_ERROR));
        assert!(c.state().selected_file.is_none());
        assert!(c.state().preview.is_none());
        assert!(c.preview_request().is_none());
    }

    #[test]
    fn superseded_previews_are_revoked() {
        let mut c = controller();
        c.on_file_selected(Some(pdf("a.pdf")));
        c.on_file_selected(Some(pdf("b.pdf")));
        assert_eq!(c.live_previews(), 1);
        c.on_file_selected(Some(SelectedFile::from_bytes("c.txt", "text/plain", vec![0u8])));
        assert_eq!(c.live_previews(), 0);
    }

    #[test]
    fn begin_extraction_without_file_is_noop() {
        let mut c = controller();
        assert!(c.begin_extraction().is_none());
        assert!(!c.state().is_extracting);
    }

    #[test]
    fn abandoned_job_clears_extracting_flag() {
        let mut c = controller();
        c.on_file_selected(Some(pdf("a.pdf")));
        let job = c.begin_extraction().unwrap();
        assert!(c.state().is_extracting);

        c.finish_extraction(job.abandon(LoadError::Task("no runner".into())));

        assert!(!c.state().is_extracting);
        assert_eq!(c.state().error.as_deref(), Some(EXTRACTION_FAILED_ERROR));
        assert!(c.state().extracted_text.is_empty());
    }

    #[test]
    fn preview_failure_sets_error_but_keeps_file() {
        let mut c = controller();
        c.on_file_selected(Some(pdf("a.pdf")));
        let handle = c.state().preview.as_ref().unwrap().handle();
        c.handle_event(ViewerEvent::PreviewFailed {
            handle,
            error: LoadError::Task("boom".into()),
        });
        assert_eq!(c.state().error.as_deref(), Some(PREVIEW_FAILED_ERROR));
        assert!(c.state().selected_file.is_some());
    }

    #[test]
    fn stale_preview_events_are_ignored() {
        let mut c = controller();
        c.on_file_selected(Some(pdf("a.pdf")));
        let old = c.state().preview.as_ref().unwrap().handle();
        c.on_file_selected(Some(pdf("b.pdf")));

        c.on_preview_failed(old, LoadError::Task("late".into()));
        assert!(c.state().error.is_none());

        c.on_preview_loaded(
            old,
            PreviewSummary {
                page_count: 9,
                excerpt: vec![],
            },
        );
        assert!(c.state().preview_summary.is_none());
    }

    #[test]
    fn close_modal_resets_flags() {
        let mut c = controller();
        c.state.show_modal = true;
        c.state.copy_success = true;
        c.close_modal();
        assert!(!c.state().show_modal);
        assert!(!c.state().copy_success);
    }
}
