use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use pdfglance_core::format_file_size;

use crate::app::App;
use crate::view::{spinner_char, truncate};

/// Render the main viewer screen: file details, preview pane, error line, footer.
pub fn render_in(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let state = app.controller.state();

    let chunks = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Length(5), // file details
        Constraint::Min(4),    // preview
        Constraint::Length(1), // error
        Constraint::Length(1), // footer
    ])
    .split(area);

    let header = Line::from(vec![
        Span::styled(" pdfglance ", theme.header_style()),
        Span::styled(
            " PDF preview & text extraction",
            Style::default().fg(theme.dim),
        ),
    ]);
    f.render_widget(Paragraph::new(header), chunks[0]);

    let label = Style::default().fg(theme.dim);
    let value = Style::default().fg(theme.text).add_modifier(Modifier::BOLD);
    let width = chunks[1].width.saturating_sub(14) as usize;
    let details = match &state.selected_file {
        Some(file) => vec![
            Line::from(vec![
                Span::styled("  Name:     ", label),
                Span::styled(truncate(&file.name, width), value),
            ]),
            Line::from(vec![
                Span::styled("  Size:     ", label),
                Span::styled(format_file_size(file.size), value),
            ]),
            Line::from(vec![
                Span::styled("  Type:     ", label),
                Span::styled(file.declared_type.as_str(), value),
            ]),
        ],
        None => vec![Line::from(Span::styled(
            "  No file selected. Press o to pick a PDF.",
            label,
        ))],
    };
    f.render_widget(
        Paragraph::new(details).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(" File "),
        ),
        chunks[1],
    );

    let preview_title = match &state.preview {
        Some(preview) => format!(" Preview {} ", preview.handle().url()),
        None => " Preview ".to_string(),
    };
    let preview_lines: Vec<Line> = match (&state.preview, &state.preview_summary) {
        (Some(_), Some(summary)) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    format!(
                        "  {} page{}",
                        summary.page_count,
                        if summary.page_count == 1 { "" } else { "s" }
                    ),
                    Style::default().fg(theme.active),
                )),
                Line::from(""),
            ];
            lines.extend(summary.excerpt.iter().map(|run| {
                Line::from(Span::styled(
                    format!("  {run}"),
                    Style::default().fg(theme.text),
                ))
            }));
            lines
        }
        (Some(_), None) => vec![Line::from(Span::styled(
            format!("  {} Loading preview...", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        ))],
        (None, _) => Vec::new(),
    };
    f.render_widget(
        Paragraph::new(preview_lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.border_style())
                    .title(preview_title),
            ),
        chunks[2],
    );

    if let Some(error) = &state.error {
        f.render_widget(
            Paragraph::new(Span::styled(format!(" {error}"), theme.error_style())),
            chunks[3],
        );
    }

    let mut footer = Vec::new();
    if state.is_extracting {
        footer.push(Span::styled(
            format!(" {} Extracting...  ", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        ));
    } else if state.copy_success {
        footer.push(Span::styled(
            " Copied!  ",
            Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
        ));
    }
    for (key, desc) in [
        ("o", "open"),
        ("x", "extract"),
        ("y", "copy"),
        ("?", "help"),
        ("q", "quit"),
    ] {
        footer.push(Span::styled(format!(" {key}"), Style::default().fg(theme.active)));
        footer.push(Span::styled(
            format!(": {desc} "),
            Style::default().fg(theme.footer_fg),
        ));
    }
    f.render_widget(
        Paragraph::new(Line::from(footer)).style(theme.footer_style()),
        chunks[4],
    );
}
