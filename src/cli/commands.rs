use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::Filter;

#[derive(Parser)]
#[command(name = "tick", about = concat!("[x] tick v", env!("CARGO_PKG_VERSION"), " - a small todo list"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a .tick/ directory here
    Init(InitArgs),
    /// List todos
    List(ListArgs),
    /// Add a todo to the end of the list
    Add(AddArgs),
    /// Flip a todo between open and done
    Toggle(IdArgs),
    /// Replace a todo's text
    Edit(EditArgs),
    /// Remove a todo
    Rm(IdArgs),
    /// Show entries from the recovery log
    Recovery(RecoveryArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Reinitialize even if .tick/ already exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Which todos to show (all, completed, uncompleted)
    #[arg(long, default_value_t = Filter::All)]
    pub filter: Filter,
}

#[derive(Args)]
pub struct AddArgs {
    /// Todo text
    pub text: String,
}

#[derive(Args)]
pub struct IdArgs {
    /// Todo id (as shown by `tick list`)
    pub id: u64,
}

#[derive(Args)]
pub struct EditArgs {
    /// Todo id (as shown by `tick list`)
    pub id: u64,
    /// New text
    pub text: String,
}

#[derive(Args)]
pub struct RecoveryArgs {
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
    /// Delete every entry instead of showing them
    #[arg(long, conflicts_with = "limit")]
    pub clear: bool,
}
