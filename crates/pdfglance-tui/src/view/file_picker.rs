use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use crate::app::App;

/// Render the file picker screen into the given area.
pub fn render_in(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let picker = &app.file_picker;

    let chunks = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Length(1), // current dir
        Constraint::Min(5),    // file list
        Constraint::Length(1), // notice
        Constraint::Length(1), // footer
    ])
    .split(area);

    let header = Line::from(vec![
        Span::styled(" Files ", theme.header_style()),
        Span::styled(
            " > Select a PDF",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(header), chunks[0]);

    let dir_line = Line::from(vec![
        Span::styled(" \u{1F4C1} ", Style::default().fg(theme.active)),
        Span::styled(
            picker.current_dir.display().to_string(),
            Style::default().fg(theme.dim),
        ),
    ]);
    f.render_widget(Paragraph::new(dir_line), chunks[1]);

    let visible_height = chunks[2].height.saturating_sub(2) as usize; // borders
    let scroll_offset = if picker.cursor >= visible_height {
        picker.cursor - visible_height + 1
    } else {
        0
    };

    let items: Vec<ListItem> = picker
        .entries
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(visible_height)
        .map(|(i, entry)| {
            let (icon, style) = if entry.is_dir {
                ("\u{1F4C1} ", Style::default().fg(theme.active))
            } else if entry.is_pdf {
                (
                    "\u{1F4C4} ",
                    Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
                )
            } else {
                ("  ", Style::default().fg(theme.dim))
            };
            let style = if i == picker.cursor {
                style.patch(theme.highlight_style())
            } else {
                style
            };
            ListItem::new(Line::from(vec![
                Span::styled(icon, style),
                Span::styled(entry.name.as_str(), style),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style()),
    );
    f.render_widget(list, chunks[2]);

    if let Some(notice) = &picker.notice {
        f.render_widget(
            Paragraph::new(Span::styled(format!(" {notice}"), theme.warning_style())),
            chunks[3],
        );
    }

    let footer = Line::from(vec![
        Span::styled(" j/k", Style::default().fg(theme.active)),
        Span::styled(": move  ", Style::default().fg(theme.footer_fg)),
        Span::styled("Enter", Style::default().fg(theme.active)),
        Span::styled(": open/pick  ", Style::default().fg(theme.footer_fg)),
        Span::styled("Esc", Style::default().fg(theme.active)),
        Span::styled(": cancel  ", Style::default().fg(theme.footer_fg)),
        Span::styled("?", Style::default().fg(theme.active)),
        Span::styled(": help", Style::default().fg(theme.footer_fg)),
    ]);
    f.render_widget(Paragraph::new(footer).style(theme.footer_style()), chunks[4]);
}
