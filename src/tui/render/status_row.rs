use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};

use super::pad_line;

/// Render the status row (bottom of screen): last message, else key hints
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans = Vec::new();
    if let Some(message) = &app.message {
        spans.push(Span::styled(
            format!(" {}", message),
            Style::default().fg(app.theme.red).bg(bg),
        ));
    } else if app.show_key_hints {
        let hints = match app.mode {
            Mode::Navigate => "a add  space toggle  e edit  d remove  f filter  q quit",
            Mode::Input => "Enter add  Esc done",
            Mode::Edit => "Enter save  Esc cancel",
        };
        spans.push(Span::styled(
            format!(" {}", hints),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }
    pad_line(&mut spans, width, Style::default().bg(bg));

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
