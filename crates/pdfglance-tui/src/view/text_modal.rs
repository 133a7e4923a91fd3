use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::App;

/// Render the extracted text in a large centered popup.
pub fn render(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let state = app.controller.state();
    let area = f.area();

    let popup = crate::view::centered_rect(
        area.width.saturating_sub(4),
        area.height.saturating_sub(2),
        area,
    );
    let chunks = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).split(popup);

    let title = match &state.selected_file {
        Some(file) => format!(" Extracted Text: {} ", file.name),
        None => " Extracted Text ".to_string(),
    };
    // Only the visible window is built; the text can run past u16 lines
    let lines: Vec<Line> = state
        .extracted_text
        .lines()
        .skip(app.modal_scroll)
        .take(chunks[0].height as usize)
        .map(|line| {
            let style = if line.starts_with("--- Page ") {
                Style::default()
                    .fg(theme.active)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            Line::from(Span::styled(line, style))
        })
        .collect();

    let body = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.active))
            .title(title),
    );

    let footer = if state.copy_success {
        Line::from(Span::styled(
            " Copied!",
            Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(vec![
            Span::styled(" y", Style::default().fg(theme.active)),
            Span::styled(": copy  ", Style::default().fg(theme.footer_fg)),
            Span::styled("j/k", Style::default().fg(theme.active)),
            Span::styled(": scroll  ", Style::default().fg(theme.footer_fg)),
            Span::styled("Esc", Style::default().fg(theme.active)),
            Span::styled(": close", Style::default().fg(theme.footer_fg)),
        ])
    };

    f.render_widget(Clear, popup);
    f.render_widget(body, chunks[0]);
    f.render_widget(Paragraph::new(footer).style(theme.footer_style()), chunks[1]);
}
