use std::sync::Arc;

use pdfglance_core::mock::{MockClipboard, MockEngine};
use pdfglance_core::{
    EXTRACTION_FAILED_ERROR, INVALID_FILE_ERROR, PREVIEW_FAILED_ERROR, ViewerController,
};
use tempfile::TempDir;

use super::*;
use crate::action::Action;

/// A fixture directory with a PDF, a non-PDF, a subdirectory and a hidden file.
fn fixture_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("paper.pdf"), b"%PDF-1.4 fake").unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"plain").unwrap();
    std::fs::write(dir.path().join(".hidden.pdf"), b"%PDF").unwrap();
    std::fs::create_dir(dir.path().join("chapters")).unwrap();
    dir
}

fn test_app_with(dir: &TempDir, clipboard: Arc<MockClipboard>) -> App {
    let engine = Arc::new(MockEngine::with_pages(vec![
        vec!["Hello", "world"],
        vec!["Second page"],
    ]));
    let controller = ViewerController::new(engine, clipboard);
    App::new(controller, Theme::hacker(), dir.path().to_path_buf())
}

/// Create a minimal App for testing (no backend attached).
fn test_app(dir: &TempDir) -> App {
    test_app_with(dir, Arc::new(MockClipboard::new()))
}

fn attach_backend(app: &mut App) -> mpsc::UnboundedReceiver<BackendCommand> {
    let (tx, rx) = mpsc::unbounded_channel();
    app.backend_cmd_tx = Some(tx);
    rx
}

/// Move the picker cursor onto the named entry and press Enter.
fn pick(app: &mut App, name: &str) {
    app.update(Action::OpenFile);
    let index = app
        .file_picker
        .entries
        .iter()
        .position(|e| e.name == name)
        .unwrap();
    app.file_picker.cursor = index;
    app.update(Action::DrillIn);
}

// ── File picker listing ─────────────────────────────────────────

#[test]
fn picker_lists_dirs_first_and_skips_hidden() {
    let dir = fixture_dir();
    let app = test_app(&dir);
    let names: Vec<&str> = app
        .file_picker
        .entries
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(names, vec!["..", "chapters", "notes.txt", "paper.pdf"]);
    assert!(app.file_picker.entries[3].is_pdf);
    assert!(!app.file_picker.entries[2].is_pdf);
}

#[test]
fn drill_into_directory_stays_in_picker() {
    let dir = fixture_dir();
    let mut app = test_app(&dir);
    pick(&mut app, "chapters");
    assert_eq!(app.screen, Screen::FilePicker);
    assert_eq!(app.file_picker.current_dir, dir.path().join("chapters"));
}

// ── Picking files ───────────────────────────────────────────────

#[test]
fn open_file_shows_picker() {
    let dir = fixture_dir();
    let mut app = test_app(&dir);
    app.update(Action::OpenFile);
    assert_eq!(app.screen, Screen::FilePicker);
}

#[test]
fn cancelling_picker_keeps_state() {
    let dir = fixture_dir();
    let mut app = test_app(&dir);
    pick(&mut app, "paper.pdf");
    let before = app.controller.state().selected_file.clone();

    app.update(Action::OpenFile);
    app.update(Action::NavigateBack);

    assert_eq!(app.screen, Screen::Viewer);
    assert_eq!(app.controller.state().selected_file, before);
    assert!(app.controller.state().preview.is_some());
}

#[test]
fn picking_pdf_selects_it_and_requests_preview() {
    let dir = fixture_dir();
    let mut app = test_app(&dir);
    let mut rx = attach_backend(&mut app);

    pick(&mut app, "paper.pdf");

    assert_eq!(app.screen, Screen::Viewer);
    let state = app.controller.state();
    assert_eq!(state.selected_file.as_ref().unwrap().name, "paper.pdf");
    assert!(state.error.is_none());
    let preview = state.preview.as_ref().unwrap().handle();
    match rx.try_recv().unwrap() {
        BackendCommand::LoadPreview { request, max_lines } => {
            assert_eq!(request.handle, preview);
            assert_eq!(max_lines, 12);
        }
        BackendCommand::Extract(_) => panic!("expected a preview request"),
    }
}

#[test]
fn picking_non_pdf_shows_error() {
    let dir = fixture_dir();
    let mut app = test_app(&dir);
    pick(&mut app, "notes.txt");

    assert_eq!(app.screen, Screen::Viewer);
    let state = app.controller.state();
    assert_eq!(state.error.as_deref(), Some(INVALID_FILE_ERROR));
    assert!(state.selected_file.is_none());
    assert!(state.preview.is_none());
}

#[test]
fn vanished_file_leaves_notice_in_picker() {
    let dir = fixture_dir();
    let mut app = test_app(&dir);
    app.update(Action::OpenFile);
    std::fs::remove_file(dir.path().join("paper.pdf")).unwrap();
    app.file_picker.cursor = app
        .file_picker
        .entries
        .iter()
        .position(|e| e.name == "paper.pdf")
        .unwrap();
    app.update(Action::DrillIn);

    assert_eq!(app.screen, Screen::FilePicker);
    assert!(app.file_picker.notice.is_some());
    assert!(app.controller.state().selected_file.is_none());
}

// ── Preview events ──────────────────────────────────────────────

#[tokio::test]
async fn preview_loads_through_backend_event() {
    let dir = fixture_dir();
    let mut app = test_app(&dir);
    let mut rx = attach_backend(&mut app);
    pick(&mut app, "paper.pdf");

    let BackendCommand::LoadPreview { request, max_lines } = rx.try_recv().unwrap() else {
        panic!("expected a preview request");
    };
    let handle = request.handle;
    let summary = request
        .load(app.controller.engine(), max_lines)
        .await
        .unwrap();
    app.handle_backend_event(BackendEvent::Viewer(ViewerEvent::PreviewLoaded {
        handle,
        summary,
    }));

    let summary = app.controller.state().preview_summary.as_ref().unwrap();
    assert_eq!(summary.page_count, 2);
    assert_eq!(summary.excerpt, vec!["Hello".to_string(), "world".to_string()]);
}

#[tokio::test]
async fn superseded_preview_failure_is_ignored() {
    let dir = fixture_dir();
    let mut app = test_app(&dir);
    let mut rx = attach_backend(&mut app);
    pick(&mut app, "paper.pdf");
    let BackendCommand::LoadPreview { request: first, .. } = rx.try_recv().unwrap() else {
        panic!("expected a preview request");
    };
    pick(&mut app, "paper.pdf");

    app.handle_backend_event(BackendEvent::Viewer(ViewerEvent::PreviewFailed {
        handle: first.handle,
        error: pdfglance_core::LoadError::Task("boom".into()),
    }));
    assert!(app.controller.state().error.is_none());
    assert_eq!(app.controller.live_previews(), 1);

    let current = app.controller.state().preview.as_ref().unwrap().handle();
    app.handle_backend_event(BackendEvent::Viewer(ViewerEvent::PreviewFailed {
        handle: current,
        error: pdfglance_core::LoadError::Task("boom".into()),
    }));
    assert_eq!(
        app.controller.state().error.as_deref(),
        Some(PREVIEW_FAILED_ERROR)
    );
}

// ── Extraction ──────────────────────────────────────────────────

#[test]
fn extract_without_file_does_nothing() {
    let dir = fixture_dir();
    let mut app = test_app(&dir);
    let mut rx = attach_backend(&mut app);
    app.update(Action::ExtractText);
    assert!(!app.controller.state().is_extracting);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn extraction_round_trip_opens_modal() {
    let dir = fixture_dir();
    let mut app = test_app(&dir);
    let mut rx = attach_backend(&mut app);
    pick(&mut app, "paper.pdf");
    let _preview = rx.try_recv().unwrap();

    app.update(Action::ExtractText);
    assert!(app.controller.state().is_extracting);
    // A second press while running is ignored
    app.update(Action::ExtractText);

    let BackendCommand::Extract(job) = rx.try_recv().unwrap() else {
        panic!("expected an extraction job");
    };
    assert!(rx.try_recv().is_err());

    let outcome = job.run(app.controller.engine()).await;
    app.handle_backend_event(BackendEvent::ExtractionFinished(outcome));

    let state = app.controller.state();
    assert!(!state.is_extracting);
    assert!(state.show_modal);
    assert_eq!(
        state.extracted_text,
        "--- Page 1 ---\nHello world\n\n--- Page 2 ---\nSecond page\n\n"
    );
}

#[test]
fn extraction_without_backend_clears_flag() {
    let dir = fixture_dir();
    let mut app = test_app(&dir);
    let rx = attach_backend(&mut app);
    pick(&mut app, "paper.pdf");
    drop(rx);

    app.update(Action::ExtractText);
    app.update(Action::Tick);

    let state = app.controller.state();
    assert!(!state.is_extracting);
    assert_eq!(state.error.as_deref(), Some(EXTRACTION_FAILED_ERROR));

    // x is live again
    app.update(Action::ExtractText);
    assert!(!app.controller.state().is_extracting);
}

// ── Text modal ──────────────────────────────────────────────────

async fn app_with_modal(dir: &TempDir, clipboard: Arc<MockClipboard>) -> App {
    let mut app = test_app_with(dir, clipboard);
    let mut rx = attach_backend(&mut app);
    pick(&mut app, "paper.pdf");
    let _preview = rx.try_recv().unwrap();
    app.update(Action::ExtractText);
    let BackendCommand::Extract(job) = rx.try_recv().unwrap() else {
        panic!("expected an extraction job");
    };
    let outcome = job.run(app.controller.engine()).await;
    app.handle_backend_event(BackendEvent::ExtractionFinished(outcome));
    app
}

#[tokio::test]
async fn escape_closes_modal_but_keeps_text() {
    let dir = fixture_dir();
    let mut app = app_with_modal(&dir, Arc::new(MockClipboard::new())).await;

    app.update(Action::NavigateBack);

    let state = app.controller.state();
    assert!(!state.show_modal);
    assert!(!state.extracted_text.is_empty());
    assert_eq!(app.screen, Screen::Viewer);
}

#[tokio::test]
async fn copy_in_modal_writes_clipboard() {
    let dir = fixture_dir();
    let clipboard = Arc::new(MockClipboard::new());
    let mut app = app_with_modal(&dir, Arc::clone(&clipboard)).await;

    app.update(Action::CopyText);
    assert!(app.pending_copy);
    app.flush_pending().await;

    assert!(!app.pending_copy);
    assert!(app.controller.state().copy_success);
    assert_eq!(clipboard.writes(), vec![app.controller.state().extracted_text.clone()]);
}

#[tokio::test]
async fn modal_scroll_is_clamped() {
    let dir = fixture_dir();
    let mut app = app_with_modal(&dir, Arc::new(MockClipboard::new())).await;
    app.visible_rows = 2;

    // 6 lines of text, 2 visible
    app.update(Action::GoBottom);
    assert_eq!(app.modal_scroll, 4);
    app.update(Action::MoveDown);
    assert_eq!(app.modal_scroll, 4);
    app.update(Action::GoTop);
    app.update(Action::MoveUp);
    assert_eq!(app.modal_scroll, 0);
}

#[tokio::test]
async fn modal_scroll_reaches_end_of_long_document() {
    let dir = fixture_dir();
    let engine = Arc::new(MockEngine::with_pages(vec![vec!["line"]; 25_000]));
    let controller = ViewerController::new(engine, Arc::new(MockClipboard::new()));
    let mut app = App::new(controller, Theme::hacker(), dir.path().to_path_buf());
    let mut rx = attach_backend(&mut app);
    pick(&mut app, "paper.pdf");
    let _preview = rx.try_recv().unwrap();
    app.update(Action::ExtractText);
    let BackendCommand::Extract(job) = rx.try_recv().unwrap() else {
        panic!("expected an extraction job");
    };
    let outcome = job.run(app.controller.engine()).await;
    app.handle_backend_event(BackendEvent::ExtractionFinished(outcome));
    app.visible_rows = 20;

    // 3 lines per page, more than a u16 offset can hold
    assert_eq!(app.text_line_count(), 75_000);
    app.update(Action::GoBottom);
    assert_eq!(app.modal_scroll, 74_980);
    app.update(Action::MoveDown);
    app.update(Action::PageDown);
    assert_eq!(app.modal_scroll, 74_980);
    app.update(Action::PageUp);
    assert_eq!(app.modal_scroll, 74_960);
}

#[test]
fn copy_without_text_is_ignored() {
    let dir = fixture_dir();
    let mut app = test_app(&dir);
    app.update(Action::CopyText);
    assert!(!app.pending_copy);
}

// ── Quit / help overlays ────────────────────────────────────────

#[test]
fn quit_requires_confirmation() {
    let dir = fixture_dir();
    let mut app = test_app(&dir);
    assert!(!app.update(Action::Quit));
    assert!(app.confirm_quit);
    assert!(!app.update(Action::NavigateBack));
    assert!(!app.confirm_quit);

    app.update(Action::Quit);
    assert!(app.update(Action::Quit));
    assert!(app.should_quit);
}

#[test]
fn force_quit_skips_confirmation() {
    let dir = fixture_dir();
    let mut app = test_app(&dir);
    app.update(Action::OpenFile);
    assert!(app.update(Action::ForceQuit));
    assert!(app.should_quit);
}

#[test]
fn help_overlay_swallows_actions() {
    let dir = fixture_dir();
    let mut app = test_app(&dir);
    app.update(Action::ToggleHelp);
    assert!(app.show_help);

    app.update(Action::OpenFile);
    assert_eq!(app.screen, Screen::Viewer);

    app.update(Action::NavigateBack);
    assert!(!app.show_help);
}
