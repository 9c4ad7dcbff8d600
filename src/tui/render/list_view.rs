use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::{Filter, Todo};
use crate::ops::due::is_overdue;
use crate::tui::app::App;
use crate::util::text::{display_width, truncate_to_width};

use super::{pad_line, push_text_with_cursor};

/// Width of the " [x] " prefix
const CHECKBOX_WIDTH: usize = 5;
/// Below this many cells for the text, the creation stamp is dropped
const MIN_TEXT_WIDTH: usize = 12;

/// Render the filtered todo list
pub fn render_list_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let height = area.height as usize;
    let width = area.width as usize;

    if app.visible_count() == 0 {
        let msg = match app.state().filter {
            Filter::All => " Nothing here yet. Press a to add a todo.",
            Filter::Completed => " No completed todos",
            Filter::Uncompleted => " No uncompleted todos",
        };
        let empty = Paragraph::new(msg).style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    app.clamp_cursor();
    app.scroll_into_view(height);

    // One clock reading per frame; overdue state is never cached across frames
    let now = Local::now();
    let lines: Vec<Line> = app
        .visible_todos()
        .into_iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(height)
        .map(|(row, todo)| {
            if app.state().is_editing(todo.id) {
                edit_line(app, todo, width)
            } else {
                todo_line(app, todo, row == app.cursor, width, now)
            }
        })
        .collect();

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn checkbox_span(app: &App, todo: &Todo, bg: ratatui::style::Color) -> Span<'static> {
    let color = if todo.completed {
        app.theme.green
    } else {
        app.theme.text
    };
    Span::styled(
        format!(" [{}] ", todo.checkbox_char()),
        Style::default().fg(color).bg(bg),
    )
}

fn todo_line(
    app: &App,
    todo: &Todo,
    is_cursor: bool,
    width: usize,
    now: DateTime<Local>,
) -> Line<'static> {
    let bg = if is_cursor {
        app.theme.selection_bg
    } else {
        app.theme.background
    };

    let due = todo.due_date.as_deref().map(|d| {
        let style = if is_overdue(Some(d), now) {
            Style::default()
                .fg(app.theme.red)
                .bg(bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.dim).bg(bg)
        };
        Span::styled(format!("  Due: {}", d), style)
    });
    let mut created = Some(Span::styled(
        format!("  Created: {}", todo.timestamp),
        Style::default().fg(app.theme.dim).bg(bg),
    ));

    let meta_width = |due: &Option<Span>, created: &Option<Span>| {
        due.iter()
            .chain(created.iter())
            .map(|s| display_width(&s.content))
            .sum::<usize>()
    };
    if width.saturating_sub(CHECKBOX_WIDTH + meta_width(&due, &created)) < MIN_TEXT_WIDTH {
        created = None;
    }
    let text_budget = width.saturating_sub(CHECKBOX_WIDTH + meta_width(&due, &created));

    let mut text_style = Style::default().fg(app.theme.text).bg(bg);
    if is_cursor {
        text_style = text_style.fg(app.theme.text_bright).add_modifier(Modifier::BOLD);
    }
    if todo.completed {
        text_style = text_style
            .fg(app.theme.dim)
            .add_modifier(Modifier::CROSSED_OUT);
    }

    let mut spans = vec![
        checkbox_span(app, todo, bg),
        Span::styled(truncate_to_width(&todo.text, text_budget), text_style),
    ];
    spans.extend(due);
    spans.extend(created);
    if is_cursor {
        pad_line(&mut spans, width, Style::default().bg(bg));
    }
    Line::from(spans)
}

fn edit_line(app: &App, todo: &Todo, width: usize) -> Line<'static> {
    let bg = app.theme.selection_bg;
    let Some(edit) = &app.state().edit else {
        return Line::default();
    };
    let mut spans = vec![checkbox_span(app, todo, bg)];
    push_text_with_cursor(
        &mut spans,
        &edit.text,
        app.text_cursor,
        Style::default().fg(app.theme.text_bright).bg(bg),
        Style::default().fg(app.theme.highlight).bg(bg),
    );
    spans.push(Span::styled(
        "  Enter save  Esc cancel",
        Style::default().fg(app.theme.dim).bg(bg),
    ));
    pad_line(&mut spans, width, Style::default().bg(bg));
    Line::from(spans)
}
