use tokio::time::Instant;

use pdfglance_core::LoadError;

use super::{App, Screen};
use crate::action::Action;
use crate::tui_event::BackendCommand;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        // Ticks and resizes apply whatever overlay is showing
        match action {
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
                self.controller.poll_timers(Instant::now());
                return false;
            }
            Action::Resize(_w, h) => {
                self.visible_rows = (h as usize).saturating_sub(8);
                return false;
            }
            Action::ForceQuit => {
                self.should_quit = true;
                return true;
            }
            _ => {}
        }

        // Quit confirmation modal: q confirms, Esc cancels
        if self.confirm_quit {
            match action {
                Action::Quit => {
                    self.should_quit = true;
                    return true;
                }
                Action::NavigateBack => {
                    self.confirm_quit = false;
                }
                _ => {}
            }
            return false;
        }

        if self.show_help {
            match action {
                Action::ToggleHelp | Action::NavigateBack => self.show_help = false,
                Action::Quit => self.confirm_quit = true,
                _ => {}
            }
            return false;
        }

        match self.screen {
            Screen::FilePicker => self.handle_file_picker_action(action),
            Screen::Viewer if self.controller.state().show_modal => {
                self.handle_modal_action(action)
            }
            Screen::Viewer => self.handle_viewer_action(action),
        }
        false
    }

    fn handle_viewer_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.confirm_quit = true;
            }
            Action::OpenFile => {
                self.file_picker.refresh_entries();
                self.screen = Screen::FilePicker;
            }
            Action::ExtractText => self.start_extraction(),
            Action::CopyText => {
                if !self.controller.state().extracted_text.is_empty() {
                    self.pending_copy = true;
                }
            }
            Action::ToggleHelp => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    fn handle_modal_action(&mut self, action: Action) {
        let max_scroll = self
            .text_line_count()
            .saturating_sub(self.visible_rows.max(1));
        let page = self.visible_rows.max(1);

        match action {
            Action::Quit => {
                self.confirm_quit = true;
            }
            Action::NavigateBack => {
                self.controller.close_modal();
                self.modal_scroll = 0;
            }
            Action::CopyText => {
                self.pending_copy = true;
            }
            Action::MoveDown => {
                self.modal_scroll = self.modal_scroll.saturating_add(1).min(max_scroll);
            }
            Action::MoveUp => {
                self.modal_scroll = self.modal_scroll.saturating_sub(1);
            }
            Action::PageDown => {
                self.modal_scroll = self.modal_scroll.saturating_add(page).min(max_scroll);
            }
            Action::PageUp => {
                self.modal_scroll = self.modal_scroll.saturating_sub(page);
            }
            Action::GoTop => {
                self.modal_scroll = 0;
            }
            Action::GoBottom => {
                self.modal_scroll = max_scroll;
            }
            Action::ToggleHelp => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    /// Kick off an extraction on the backend. Ignored while one is running.
    fn start_extraction(&mut self) {
        if self.controller.state().is_extracting {
            return;
        }
        if let Some(job) = self.controller.begin_extraction() {
            tracing::info!(file = job.file_name(), "extraction requested");
            // An unsent job would leave the in-progress flag up for good
            if let Err(BackendCommand::Extract(job)) =
                self.send_backend(BackendCommand::Extract(job))
            {
                let outcome = job.abandon(LoadError::Task("backend unavailable".into()));
                self.controller.finish_extraction(outcome);
            }
        }
    }
}
