mod update;
mod update_file_picker;

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;

use pdfglance_core::{SelectedFile, ViewerController, ViewerEvent};

use crate::theme::Theme;
use crate::tui_event::{BackendCommand, BackendEvent};

/// Which screen is currently displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Viewer,
    FilePicker,
}

/// State for the file picker screen.
#[derive(Debug, Clone)]
pub struct FilePickerState {
    /// Current directory being browsed.
    pub current_dir: PathBuf,
    /// Entries in the current directory (dirs first, then files).
    pub entries: Vec<FileEntry>,
    /// Cursor position in the entries list.
    pub cursor: usize,
    /// Problem reading the directory or the picked file, shown in the picker.
    pub notice: Option<String>,
}

/// A single entry in the file picker.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub is_pdf: bool,
}

impl FilePickerState {
    pub fn new(current_dir: PathBuf) -> Self {
        let mut state = Self {
            current_dir,
            entries: Vec::new(),
            cursor: 0,
            notice: None,
        };
        state.refresh_entries();
        state
    }

    /// Refresh the entries list from the current directory.
    pub fn refresh_entries(&mut self) {
        let mut entries = Vec::new();

        // Parent directory entry
        if let Some(parent) = self.current_dir.parent() {
            entries.push(FileEntry {
                name: "..".to_string(),
                path: parent.to_path_buf(),
                is_dir: true,
                is_pdf: false,
            });
        }

        self.notice = None;
        match std::fs::read_dir(&self.current_dir) {
            Ok(read_dir) => {
                let mut dirs = Vec::new();
                let mut files = Vec::new();

                for entry in read_dir.flatten() {
                    let path = entry.path();
                    let name = entry.file_name().to_string_lossy().to_string();

                    // Skip hidden files/dirs
                    if name.starts_with('.') {
                        continue;
                    }

                    if path.is_dir() {
                        dirs.push(FileEntry {
                            name,
                            path,
                            is_dir: true,
                            is_pdf: false,
                        });
                    } else {
                        let is_pdf = path
                            .extension()
                            .and_then(|e| e.to_str())
                            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
                        files.push(FileEntry {
                            name,
                            path,
                            is_dir: false,
                            is_pdf,
                        });
                    }
                }

                dirs.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
                files.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

                entries.extend(dirs);
                entries.extend(files);
            }
            Err(e) => {
                tracing::warn!(dir = %self.current_dir.display(), error = %e, "cannot read directory");
                self.notice = Some(format!("Cannot read {}: {}", self.current_dir.display(), e));
            }
        }

        self.entries = entries;
        self.cursor = 0;
    }

    /// Enter the directory at cursor, or return false if not a directory.
    pub fn enter_directory(&mut self) -> bool {
        if let Some(entry) = self.entries.get(self.cursor)
            && entry.is_dir
        {
            self.current_dir = entry.path.clone();
            self.refresh_entries();
            return true;
        }
        false
    }

    pub fn current_entry(&self) -> Option<&FileEntry> {
        self.entries.get(self.cursor)
    }
}

/// Main application state.
///
/// Everything the viewer shows lives in the controller's state record; the
/// fields here only track navigation and overlays.
pub struct App {
    pub screen: Screen,
    pub controller: ViewerController,
    pub theme: Theme,
    pub tick: usize,
    pub should_quit: bool,
    pub confirm_quit: bool,
    pub show_help: bool,
    /// First line of extracted text shown in the modal.
    pub modal_scroll: usize,
    /// Height of the visible list/text area (set on resize, used for page up/down).
    pub visible_rows: usize,
    pub file_picker: FilePickerState,
    /// How many first-page lines the preview pane asks for.
    pub preview_lines: usize,
    /// Channel to send commands to the backend listener.
    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
    /// A copy was requested; run on the next loop turn by [`App::flush_pending`].
    pub(crate) pending_copy: bool,
}

impl App {
    pub fn new(controller: ViewerController, theme: Theme, start_dir: PathBuf) -> Self {
        Self {
            screen: Screen::Viewer,
            controller,
            theme,
            tick: 0,
            should_quit: false,
            confirm_quit: false,
            show_help: false,
            modal_scroll: 0,
            visible_rows: 20,
            file_picker: FilePickerState::new(start_dir),
            preview_lines: 12,
            backend_cmd_tx: None,
            pending_copy: false,
        }
    }

    pub fn with_preview_lines(mut self, lines: usize) -> Self {
        self.preview_lines = lines;
        self
    }

    /// Read a file's metadata and hand it to the controller as a pick.
    ///
    /// Returns false when the file could not be read at all; the reason is
    /// left in the picker's notice.
    pub fn select_path(&mut self, path: &Path) -> bool {
        match SelectedFile::from_path(path) {
            Ok(file) => {
                self.file_picker.notice = None;
                self.controller
                    .handle_event(ViewerEvent::FileChanged(Some(file)));
                self.modal_scroll = 0;
                self.request_preview();
                true
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read picked file");
                self.file_picker.notice = Some(e.to_string());
                false
            }
        }
    }

    /// Ask the backend to load the current preview handle, if any.
    fn request_preview(&self) {
        let Some(request) = self.controller.preview_request() else {
            return;
        };
        let _ = self.send_backend(BackendCommand::LoadPreview {
            request,
            max_lines: self.preview_lines,
        });
    }

    /// Hand a command to the backend listener. On failure the command comes
    /// back so the caller can settle whatever it started.
    pub(crate) fn send_backend(&self, command: BackendCommand) -> Result<(), BackendCommand> {
        match &self.backend_cmd_tx {
            Some(tx) => tx.send(command).map_err(|e| {
                tracing::error!("backend listener is gone");
                e.0
            }),
            None => {
                tracing::debug!("no backend attached, command dropped");
                Err(command)
            }
        }
    }

    /// Apply an event coming back from the backend task.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::Viewer(event) => self.controller.handle_event(event),
            BackendEvent::ExtractionFinished(outcome) => {
                self.controller.finish_extraction(outcome);
                self.modal_scroll = 0;
            }
        }
    }

    /// Run work queued by `update` that needs to await.
    pub async fn flush_pending(&mut self) {
        if std::mem::take(&mut self.pending_copy) {
            self.controller.copy_text().await;
        }
    }

    /// Number of lines in the extracted text, for modal scrolling.
    pub(crate) fn text_line_count(&self) -> usize {
        self.controller.state().extracted_text.lines().count()
    }

    /// Render the current screen.
    pub fn view(&self, f: &mut ratatui::Frame) {
        let area = f.area();

        match self.screen {
            Screen::FilePicker => crate::view::file_picker::render_in(f, self, area),
            Screen::Viewer => {
                crate::view::viewer::render_in(f, self, area);
                if self.controller.state().show_modal {
                    crate::view::text_modal::render(f, self);
                }
            }
        }

        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }

        if self.confirm_quit {
            crate::view::quit_confirm::render(f, &self.theme);
        }
    }
}

#[cfg(test)]
mod tests;
