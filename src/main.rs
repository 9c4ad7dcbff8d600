use clap::Parser;
use tick::cli::commands::{Cli, Commands};
use tick::cli::handlers;

fn main() {
    let cli = Cli::parse();
    let dir = cli.dir.clone();

    match cli.command {
        None => {
            // No subcommand → launch TUI
            if let Err(e) = tick::tui::run(dir.as_deref()) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Init(args)) => {
            // Init is handled before data dir discovery
            if let Err(e) = handlers::cmd_init(args, dir.as_deref()) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
