use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::Filter;
use crate::state::Action;
use crate::util::text::{next_grapheme_boundary, prev_grapheme_boundary, sanitize_single_line};

use super::app::{App, Mode};

/// Handle a key event in the current mode. Each key produces at most one action.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    app.message = None;

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Input => handle_input(app, key),
        Mode::Edit => handle_edit(app, key),
    }
}

/// Bracketed paste: inserted into the active text field as one line.
pub fn handle_paste(app: &mut App, text: &str) {
    let clean = sanitize_single_line(text);
    if clean.is_empty() {
        return;
    }
    match app.mode {
        Mode::Navigate => {}
        Mode::Input => {
            let (buffer, cursor) = insert_at(&app.state().new_todo_text, app.text_cursor, &clean);
            app.text_cursor = cursor;
            app.dispatch(Action::SetInput(buffer));
        }
        Mode::Edit => {
            let Some(edit) = &app.state().edit else {
                return;
            };
            let (buffer, cursor) = insert_at(&edit.text, app.text_cursor, &clean);
            app.text_cursor = cursor;
            app.dispatch(Action::SetEditText(buffer));
        }
    }
}

fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Commands are bare keys; Shift only selects the letter (`G`)
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return;
    }
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Char('g') | KeyCode::Home => app.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => {
            app.cursor = usize::MAX;
            app.clamp_cursor();
        }
        KeyCode::Char('a') | KeyCode::Char('i') => {
            app.text_cursor = app.state().new_todo_text.len();
            app.mode = Mode::Input;
        }
        KeyCode::Char(' ') | KeyCode::Char('x') | KeyCode::Enter => {
            if let Some(id) = app.selected_id() {
                app.dispatch(Action::ToggleComplete(id));
            }
        }
        KeyCode::Char('e') => {
            if let Some(id) = app.selected_id()
                && app.dispatch(Action::BeginEdit(id)).is_some()
            {
                app.text_cursor = app.state().edit.as_ref().map_or(0, |e| e.text.len());
                app.mode = Mode::Edit;
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(id) = app.selected_id() {
                app.dispatch(Action::Remove(id));
            }
        }
        KeyCode::Char('f') => {
            let next = app.state().filter.cycle();
            set_filter(app, next);
        }
        KeyCode::Char('1') => set_filter(app, Filter::All),
        KeyCode::Char('2') => set_filter(app, Filter::Completed),
        KeyCode::Char('3') => set_filter(app, Filter::Uncompleted),
        _ => {}
    }
}

fn set_filter(app: &mut App, filter: Filter) {
    app.dispatch(Action::SetFilter(filter));
    app.cursor = 0;
    app.scroll_offset = 0;
}

fn handle_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.mode = Mode::Navigate,
        KeyCode::Enter => {
            let text = app.state().new_todo_text.clone();
            if app.dispatch(Action::Add { text }) == Some(crate::state::Change::Todos) {
                app.text_cursor = 0;
                // land on the new row when the filter shows it
                app.cursor = usize::MAX;
                app.clamp_cursor();
            }
        }
        _ => {
            let buffer = app.state().new_todo_text.clone();
            if let Some(updated) = edit_field(&buffer, &mut app.text_cursor, key) {
                app.dispatch(Action::SetInput(updated));
            }
        }
    }
}

fn handle_edit(app: &mut App, key: KeyEvent) {
    let Some(edit) = app.state().edit.clone() else {
        app.mode = Mode::Navigate;
        return;
    };
    match key.code {
        KeyCode::Enter => {
            if app.dispatch(Action::SaveEdit).is_some() {
                app.mode = Mode::Navigate;
            }
        }
        KeyCode::Esc => {
            app.dispatch(Action::CancelEdit);
            app.mode = Mode::Navigate;
        }
        _ => {
            if let Some(updated) = edit_field(&edit.text, &mut app.text_cursor, key) {
                app.dispatch(Action::SetEditText(updated));
            }
        }
    }
}

/// Apply a line-editing key to `buffer`. Moves `cursor` in place and returns
/// the new contents when they changed.
fn edit_field(buffer: &str, cursor: &mut usize, key: KeyEvent) -> Option<String> {
    let mut pos = (*cursor).min(buffer.len());
    while !buffer.is_char_boundary(pos) {
        pos -= 1;
    }
    *cursor = pos;

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('u') {
            *cursor = 0;
            return Some(buffer[pos..].to_string());
        }
        return None;
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        return None;
    }

    match key.code {
        KeyCode::Char(c) => {
            let (updated, new_pos) = insert_at(buffer, pos, c.encode_utf8(&mut [0; 4]));
            *cursor = new_pos;
            Some(updated)
        }
        KeyCode::Backspace => {
            let start = prev_grapheme_boundary(buffer, pos)?;
            *cursor = start;
            Some(format!("{}{}", &buffer[..start], &buffer[pos..]))
        }
        KeyCode::Delete => {
            let end = next_grapheme_boundary(buffer, pos)?;
            Some(format!("{}{}", &buffer[..pos], &buffer[end..]))
        }
        KeyCode::Left => {
            *cursor = prev_grapheme_boundary(buffer, pos).unwrap_or(0);
            None
        }
        KeyCode::Right => {
            *cursor = next_grapheme_boundary(buffer, pos).unwrap_or(buffer.len());
            None
        }
        KeyCode::Home => {
            *cursor = 0;
            None
        }
        KeyCode::End => {
            *cursor = buffer.len();
            None
        }
        _ => None,
    }
}

fn insert_at(buffer: &str, pos: usize, text: &str) -> (String, usize) {
    let mut pos = pos.min(buffer.len());
    while !buffer.is_char_boundary(pos) {
        pos -= 1;
    }
    let mut updated = String::with_capacity(buffer.len() + text.len());
    updated.push_str(&buffer[..pos]);
    updated.push_str(text);
    updated.push_str(&buffer[pos..]);
    (updated, pos + text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TodoId;
    use crate::tui::render::test_helpers::{app_with_todos, empty_app};

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn texts(app: &App) -> Vec<String> {
        app.state().todos.iter().map(|t| t.text.clone()).collect()
    }

    #[test]
    fn typing_and_enter_adds_a_todo() {
        let mut app = empty_app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.mode, Mode::Input);
        type_str(&mut app, "Buy milk");
        assert_eq!(app.state().new_todo_text, "Buy milk");
        press(&mut app, KeyCode::Enter);

        assert_eq!(texts(&app), vec!["Buy milk"]);
        assert_eq!(app.state().new_todo_text, "");
        // still in the input field, ready for the next one
        assert_eq!(app.mode, Mode::Input);
    }

    #[test]
    fn enter_on_blank_input_adds_nothing() {
        let mut app = empty_app();
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "   ");
        press(&mut app, KeyCode::Enter);
        assert!(app.state().todos.is_empty());
        assert_eq!(app.message, None);
    }

    #[test]
    fn letters_in_input_mode_are_text_not_commands() {
        let mut app = app_with_todos(&["keep"]);
        press(&mut app, KeyCode::Char('i'));
        type_str(&mut app, "dqx");
        assert_eq!(app.state().new_todo_text, "dqx");
        assert!(!app.should_quit);
        assert_eq!(texts(&app), vec!["keep"]);
    }

    #[test]
    fn space_toggles_row_under_cursor() {
        let mut app = app_with_todos(&["a", "b"]);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.state().todos[0].completed);
        assert!(app.state().todos[1].completed);
    }

    #[test]
    fn edit_then_enter_saves() {
        let mut app = app_with_todos(&["draft"]);
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.mode, Mode::Edit);
        assert!(app.state().is_editing(TodoId(1)));
        press(&mut app, KeyCode::Backspace);
        type_str(&mut app, "s");
        press(&mut app, KeyCode::Enter);
        assert_eq!(texts(&app), vec!["drafs"]);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.state().edit, None);
    }

    #[test]
    fn esc_cancels_edit() {
        let mut app = app_with_todos(&["draft"]);
        press(&mut app, KeyCode::Char('e'));
        type_str(&mut app, "!!!");
        press(&mut app, KeyCode::Esc);
        assert_eq!(texts(&app), vec!["draft"]);
        assert_eq!(app.mode, Mode::Navigate);
    }

    #[test]
    fn d_removes_and_filter_keys_switch_views() {
        let mut app = app_with_todos(&["a", "b", "c"]);
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(texts(&app), vec!["b", "c"]);

        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.state().filter, Filter::Completed);
        assert_eq!(app.visible_count(), 1);
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.state().filter, Filter::Uncompleted);
        assert_eq!(app.visible_count(), 1);
    }

    #[test]
    fn cursor_keys_move_within_the_field() {
        let mut app = empty_app();
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "milk");
        press(&mut app, KeyCode::Home);
        type_str(&mut app, "buy ");
        press(&mut app, KeyCode::End);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.state().new_todo_text, "buy mil");
    }

    #[test]
    fn paste_flattens_newlines_into_the_field() {
        let mut app = empty_app();
        press(&mut app, KeyCode::Char('a'));
        handle_paste(&mut app, "one\ntwo");
        assert_eq!(app.state().new_todo_text, "one two");
        assert_eq!(app.text_cursor, 7);
    }

    #[test]
    fn modified_keys_are_not_commands() {
        let mut app = app_with_todos(&["a", "b"]);
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL));
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT));
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('q'), KeyModifiers::ALT));
        assert_eq!(texts(&app), vec!["a", "b"]);
        assert!(!app.state().todos[0].completed);
        assert!(!app.should_quit);

        // Shift is part of the letter
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT));
        assert_eq!(app.cursor, 1);
    }

    #[test]
    fn alt_letters_are_not_typed_into_fields() {
        let mut app = empty_app();
        press(&mut app, KeyCode::Char('a'));
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('b'), KeyModifiers::ALT));
        assert_eq!(app.state().new_todo_text, "");
    }

    #[test]
    fn q_quits_from_navigate() {
        let mut app = empty_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
