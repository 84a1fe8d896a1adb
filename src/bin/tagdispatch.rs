//! tagdispatch CLI — replay recorded pushes against dry-run backends.
//!
//! Usage:
//!   tagdispatch replay <file> [--config path]
//!   tagdispatch functions [--config path]

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tagdispatch::replay::load_pushes;
use tagdispatch::{build_dispatcher, replay, Config, TagDispatcher, TracingDiagnostics};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tagdispatch",
    version,
    about = "Route tag pushes to analytics backend adapters"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Path to a YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch a JSON array of pushes through dry-run backends
    Replay {
        /// File holding `[{"function": ..., "params": {...}}, ...]`
        file: PathBuf,
    },
    /// List every registered function, grouped by handler
    Functions,
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_dispatcher(config: &Config) -> Result<TagDispatcher, String> {
    let mut dispatcher = build_dispatcher(config, Arc::new(TracingDiagnostics))
        .map_err(|e| format!("Failed to register handlers: {}", e))?;
    dispatcher.initialize_all();
    Ok(dispatcher)
}

fn cmd_replay(config: &Config, file: &Path) -> i32 {
    let pushes = match load_pushes(file) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let mut dispatcher = match open_dispatcher(config) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let summary = replay(&mut dispatcher, &pushes);
    print!("{}", summary);
    0
}

fn cmd_functions(config: &Config) -> i32 {
    let dispatcher = match open_dispatcher(config) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    if dispatcher.is_empty() {
        println!("No handlers enabled.");
        return 0;
    }
    for handler in dispatcher.handlers() {
        println!("{}", handler.id());
        for function in handler.functions() {
            let marker = if *function == handler.init_function() { " (init)" } else { "" };
            println!("  {}{}", function, marker);
        }
    }
    0
}

fn main() {
    let cli = Cli::parse();
    let config = match Config::resolve(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    init_logging(&config);

    let code = match cli.command {
        Commands::Replay { file } => cmd_replay(&config, &file),
        Commands::Functions => cmd_functions(&config),
    };
    std::process::exit(code);
}
