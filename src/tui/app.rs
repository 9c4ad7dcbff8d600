use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::config_io::read_config;
use crate::io::data_dir::discover_data_dir;
use crate::model::{TickConfig, Todo, TodoId};
use crate::ops::todo_ops;
use crate::state::{Action, Change, DynSession, State};

use super::input;
use super::render;
use super::theme::Theme;

/// Which part of the screen owns the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Moving over the list
    Navigate,
    /// Typing into the "new todo" field
    Input,
    /// Typing into the inline editor of one row
    Edit,
}

/// Main application state: the session plus purely visual bookkeeping
pub struct App {
    pub session: DynSession,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    pub show_key_hints: bool,
    /// Cursor row in the filtered list
    pub cursor: usize,
    /// First list row on screen
    pub scroll_offset: usize,
    /// Byte offset of the text cursor in whichever field is being typed into
    pub text_cursor: usize,
    /// Last error or notice, shown in the status row until the next key
    pub message: Option<String>,
}

impl App {
    pub fn new(session: DynSession, config: &TickConfig) -> Self {
        let message = session
            .recovered_on_load()
            .then(|| "stored list was unreadable; a copy is in the recovery log".to_string());
        App {
            session,
            mode: Mode::Navigate,
            should_quit: false,
            theme: Theme::from_config(&config.ui),
            show_key_hints: config.ui.show_key_hints,
            cursor: 0,
            scroll_offset: 0,
            text_cursor: 0,
            message,
        }
    }

    pub fn state(&self) -> &State {
        self.session.state()
    }

    /// Rows the list currently shows, in order
    pub fn visible_todos(&self) -> Vec<&Todo> {
        self.state().visible().collect()
    }

    pub fn visible_count(&self) -> usize {
        self.state().visible().count()
    }

    /// Id of the todo under the cursor
    pub fn selected_id(&self) -> Option<TodoId> {
        todo_ops::id_at(self.state().visible(), self.cursor).ok()
    }

    /// Send one action through the session. Errors land in the status row.
    pub fn dispatch(&mut self, action: Action) -> Option<Change> {
        let result = self.session.dispatch(action);
        self.clamp_cursor();
        match result {
            Ok(change) => Some(change),
            Err(e) => {
                self.message = Some(e.to_string());
                None
            }
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        self.cursor = self.cursor.saturating_add_signed(delta);
        self.clamp_cursor();
    }

    pub fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.visible_count().saturating_sub(1));
    }

    /// Keep the cursor row inside a viewport of `height` rows
    pub fn scroll_into_view(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + height {
            self.scroll_offset = self.cursor + 1 - height;
        }
    }
}

/// Run the TUI against the `.tick/` directory found from `dir` (or the cwd).
pub fn run(dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let start = match dir {
        Some(d) => d.to_path_buf(),
        None => std::env::current_dir()?,
    };
    let data_dir = discover_data_dir(&start)?;
    let config = read_config(&data_dir)?;
    let session = DynSession::open_dir_with(&data_dir, &config)?;
    let mut app = App::new(session, &config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal before the panic message prints
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Redraw on every tick so overdue markers follow the clock
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
