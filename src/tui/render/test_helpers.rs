use chrono::{Local, TimeZone};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use crate::io::kv::{KvStore, MemoryStore};
use crate::model::{TickConfig, Todo};
use crate::state::{Action, DynSession, Environment, FixedClock, Session};
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 12;

/// Creation stamp every helper-built todo carries
pub const FIXED_TIMESTAMP: &str = "1/2/2026, 3:04:05 PM";

/// Render into an in-memory buffer.
pub fn render_to_buffer<F>(w: u16, h: u16, f: F) -> Buffer
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();
    terminal.backend().buffer().clone()
}

/// Render and return plain text (no styles), trailing blanks trimmed.
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let buf = render_to_buffer(w, h, f);
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

fn fixed_env() -> Environment {
    let at = Local.with_ymd_and_hms(2026, 1, 2, 15, 4, 5).unwrap();
    Environment::default().with_clock(FixedClock(at))
}

fn session_over(store: MemoryStore) -> DynSession {
    let store: Box<dyn KvStore> = Box::new(store);
    Session::open(store, "todos", fixed_env(), None).unwrap()
}

/// An app over an empty in-memory store
pub fn empty_app() -> App {
    App::new(session_over(MemoryStore::new()), &TickConfig::default())
}

/// An app whose store already holds `todos`
pub fn app_from_todos(todos: Vec<Todo>) -> App {
    let mut store = MemoryStore::new();
    store
        .set("todos", &serde_json::to_string(&todos).unwrap())
        .unwrap();
    App::new(session_over(store), &TickConfig::default())
}

/// An app with one uncompleted todo per text, added through the reducer
pub fn app_with_todos(texts: &[&str]) -> App {
    let mut app = empty_app();
    for text in texts {
        app.dispatch(Action::Add {
            text: text.to_string(),
        });
    }
    app.cursor = 0;
    app
}
