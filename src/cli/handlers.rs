use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::data_dir::{discover_data_dir, init_data_dir};
use crate::io::recovery::{prune_recovery, read_recovery_entries, recovery_log_path};
use crate::model::{Todo, TodoId};
use crate::ops::todo_ops::{self, TodoError};
use crate::ops::view::completion_counts;
use crate::state::{Action, Change, DynSession};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let dir = cli.dir.as_deref();

    match cli.command {
        None => Err("no subcommand given (run `tick` without arguments for the TUI)".into()),
        Some(cmd) => match cmd {
            Commands::Init(args) => cmd_init(args, dir),
            Commands::List(args) => cmd_list(args, dir, json),
            Commands::Recovery(args) => cmd_recovery(args, dir, json),
            Commands::Add(args) => cmd_add(args, dir, json),
            Commands::Toggle(args) => cmd_toggle(args, dir, json),
            Commands::Edit(args) => cmd_edit(args, dir, json),
            Commands::Rm(args) => cmd_rm(args, dir, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn start_dir(dir: Option<&Path>) -> Result<PathBuf, std::io::Error> {
    match dir {
        Some(d) => std::fs::canonicalize(d),
        None => std::env::current_dir(),
    }
}

/// Find `.tick/` and load its list, warning when the stored list was unreadable.
fn open_session(dir: Option<&Path>) -> Result<(PathBuf, DynSession), Box<dyn std::error::Error>> {
    let data_dir = discover_data_dir(&start_dir(dir)?)?;
    let session = DynSession::open_dir(&data_dir)?;
    if session.recovered_on_load() {
        eprintln!(
            "warning: stored list was unreadable and has been reset; the old value is in {}",
            recovery_log_path(&data_dir).display()
        );
    }
    Ok((data_dir, session))
}

fn print_todo(todo: &Todo, json: bool) -> CmdResult {
    let now = chrono::Local::now();
    if json {
        println!("{}", serde_json::to_string_pretty(&todo_to_json(todo, now))?);
    } else {
        println!("{}", format_todo_line(todo, now));
    }
    Ok(())
}

fn find_todo(session: &DynSession, id: TodoId) -> Result<&Todo, TodoError> {
    todo_ops::find(&session.state().todos, id)
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

pub fn cmd_init(args: InitArgs, dir: Option<&Path>) -> CmdResult {
    let root = start_dir(dir)?;
    let data_dir = init_data_dir(&root, args.force)?;
    println!("initialized {}", data_dir.display());
    Ok(())
}

fn cmd_list(args: ListArgs, dir: Option<&Path>, json: bool) -> CmdResult {
    let (_, mut session) = open_session(dir)?;
    session.dispatch(Action::SetFilter(args.filter))?;
    let state = session.state();
    let now = chrono::Local::now();

    if json {
        let (done, total) = completion_counts(&state.todos);
        let output = TodoListJson {
            filter: state.filter,
            done,
            total,
            todos: state.visible().map(|t| todo_to_json(t, now)).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for todo in state.visible() {
            println!("{}", format_todo_line(todo, now));
        }
    }
    Ok(())
}

fn cmd_add(args: AddArgs, dir: Option<&Path>, json: bool) -> CmdResult {
    let (_, mut session) = open_session(dir)?;
    let change = session.dispatch(Action::Add { text: args.text })?;
    if change == Change::Unchanged {
        return Err(TodoError::EmptyInput.into());
    }
    let todo = session
        .state()
        .todos
        .last()
        .ok_or(TodoError::EmptyInput)?;
    print_todo(todo, json)
}

fn cmd_toggle(args: IdArgs, dir: Option<&Path>, json: bool) -> CmdResult {
    let (_, mut session) = open_session(dir)?;
    let id = TodoId(args.id);
    session.dispatch(Action::ToggleComplete(id))?;
    print_todo(find_todo(&session, id)?, json)
}

fn cmd_edit(args: EditArgs, dir: Option<&Path>, json: bool) -> CmdResult {
    let (_, mut session) = open_session(dir)?;
    let id = TodoId(args.id);
    session.dispatch(Action::BeginEdit(id))?;
    session.dispatch(Action::SetEditText(args.text))?;
    session.dispatch(Action::SaveEdit)?;
    print_todo(find_todo(&session, id)?, json)
}

fn cmd_rm(args: IdArgs, dir: Option<&Path>, json: bool) -> CmdResult {
    let (_, mut session) = open_session(dir)?;
    let id = TodoId(args.id);
    let removed = find_todo(&session, id)?.clone();
    session.dispatch(Action::Remove(id))?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&todo_to_json(&removed, chrono::Local::now()))?
        );
    } else {
        println!("removed {}", removed.id);
    }
    Ok(())
}

fn cmd_recovery(args: RecoveryArgs, dir: Option<&Path>, json: bool) -> CmdResult {
    let data_dir = discover_data_dir(&start_dir(dir)?)?;
    if args.clear {
        let removed = prune_recovery(&data_dir, None)?;
        if json {
            println!("{}", serde_json::json!({ "removed": removed }));
        } else {
            println!("removed {} recovery entries", removed);
        }
        return Ok(());
    }
    let entries = read_recovery_entries(&data_dir, Some(args.limit.unwrap_or(10)));

    if json {
        let output: Vec<_> = entries.iter().map(recovery_entry_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if entries.is_empty() {
        println!("recovery log is empty");
    } else {
        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                println!();
            }
            println!("{}", format_recovery_entry(entry));
        }
    }
    Ok(())
}
