use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Filter;
use crate::ops::view::completion_counts;
use crate::tui::app::{App, Mode};

use super::{pad_line, push_text_with_cursor};

/// Title, input field, filter selector, separator
pub const HEADER_HEIGHT: u16 = 4;

const PLACEHOLDER: &str = "Enter a new ToDo";

pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let width = area.width as usize;
    let lines = vec![
        title_line(app, width),
        input_line(app, width),
        filter_line(app),
        Line::from(Span::styled(
            "\u{2500}".repeat(width),
            Style::default().fg(app.theme.dim).bg(app.theme.background),
        )),
    ];
    let paragraph = Paragraph::new(lines).style(Style::default().bg(app.theme.background));
    frame.render_widget(paragraph, area);
}

fn title_line(app: &App, width: usize) -> Line<'static> {
    let bg = app.theme.background;
    let (done, total) = completion_counts(&app.state().todos);
    let title = Span::styled(
        " ToDo List",
        Style::default()
            .fg(app.theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    );
    let count = format!("{}/{} done ", done, total);
    let gap = width.saturating_sub(title.content.len() + count.len());
    Line::from(vec![
        title,
        Span::styled(" ".repeat(gap), Style::default().bg(bg)),
        Span::styled(count, Style::default().fg(app.theme.dim).bg(bg)),
    ])
}

fn input_line(app: &App, width: usize) -> Line<'static> {
    let bg = app.theme.background;
    let focused = app.mode == Mode::Input;
    let text = &app.state().new_todo_text;

    let prompt_style = if focused {
        Style::default().fg(app.theme.highlight).bg(bg)
    } else {
        Style::default().fg(app.theme.dim).bg(bg)
    };
    let mut spans = vec![Span::styled(" + ", prompt_style)];

    if focused {
        push_text_with_cursor(
            &mut spans,
            text,
            app.text_cursor,
            Style::default().fg(app.theme.text_bright).bg(bg),
            Style::default().fg(app.theme.highlight).bg(bg),
        );
    } else if text.is_empty() {
        spans.push(Span::styled(PLACEHOLDER, Style::default().fg(app.theme.dim).bg(bg)));
    } else {
        spans.push(Span::styled(text.clone(), Style::default().fg(app.theme.text).bg(bg)));
    }
    pad_line(&mut spans, width, Style::default().bg(bg));
    Line::from(spans)
}

fn filter_line(app: &App) -> Line<'static> {
    let bg = app.theme.background;
    let current = app.state().filter;
    let mut spans = vec![Span::styled(
        " Filter: ",
        Style::default().fg(app.theme.dim).bg(bg),
    )];
    for (i, filter) in Filter::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" ", Style::default().bg(bg)));
        }
        if *filter == current {
            spans.push(Span::styled(
                format!("[{}]", filter.label()),
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(
                format!(" {} ", filter.label()),
                Style::default().fg(app.theme.text).bg(bg),
            ));
        }
    }
    Line::from(spans)
}
