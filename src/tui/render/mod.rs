pub mod header;
pub mod list_view;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;

use super::app::App;

/// Main render function: header, list, status row
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header::HEADER_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    header::render_header(frame, app, chunks[0]);
    list_view::render_list_view(frame, app, chunks[1]);
    status_row::render_status_row(frame, app, chunks[2]);
}

/// Push `text` split at `cursor` with a block cursor between the halves
pub(super) fn push_text_with_cursor<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    cursor: usize,
    text_style: Style,
    cursor_style: Style,
) {
    let mut pos = cursor.min(text.len());
    while !text.is_char_boundary(pos) {
        pos -= 1;
    }
    spans.push(Span::styled(text[..pos].to_string(), text_style));
    spans.push(Span::styled("\u{258C}", cursor_style));
    spans.push(Span::styled(text[pos..].to_string(), text_style));
}

/// Fill the rest of a `width`-cell line with `style`
pub(super) fn pad_line(spans: &mut Vec<Span<'_>>, width: usize, style: Style) {
    let used: usize = spans
        .iter()
        .map(|s| crate::util::text::display_width(&s.content))
        .sum();
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), style));
    }
}
