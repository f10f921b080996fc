//! # IDSR Chat Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Entry point for the `idsr-chat` binary, a keyword-matched question
//! answering service over IDSR measles surveillance guidelines. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to appropriate command handlers
//!
//! ## Examples
//!
//! ```bash
//! # Run the API
//! idsr-chat serve --port 8000
//!
//! # Ask the running API from another terminal
//! idsr-chat ask "What is the standard case definition for measles?"
//!
//! # Answer offline with debug logging
//! idsr-chat -vv answer "How should serum samples be stored?"
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command implementations (serve, ask, answer, topics)
mod core; // Core infrastructure (errors, config)
mod guidelines; // Topic table and keyword responder

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "idsr-chat",
    about = "IDSR measles guideline chat: keyword-matched answers over HTTP",
    long_about = "Serve and query canned answers about IDSR and measles detection guidelines.\n\
                  Questions are matched against fixed keyword rules; no model is involved.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// All available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    /// Run the chat HTTP API.
    #[command(alias = "s")]
    Serve(commands::serve::ServeArgs),
    /// Send questions to a running chat API.
    #[command(alias = "a")]
    Ask(commands::ask::AskArgs),
    /// Answer one question locally without a server.
    Answer(commands::answer::AnswerArgs),
    /// List topics and their trigger substrings in priority order.
    Topics(commands::topics::TopicsArgs),
}

/// Log directives used when `RUST_LOG` is unset. Without `-v` only warnings
/// are shown, except that `serve` keeps its request log (one line per
/// question) at info.
fn default_filter(command: &Commands, verbose: u8) -> String {
    match (command, verbose) {
        (Commands::Serve(_), 0) => "warn,idsr_chat::commands::serve=info".to_string(),
        (_, 0) => "warn".to_string(),
        (_, 1) => "info".to_string(),
        (_, 2) => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(&cli.command, cli.verbose)));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Serve(args) => commands::serve::handle_serve(args).await,
        Commands::Ask(args) => commands::ask::handle_ask(args).await,
        Commands::Answer(args) => commands::answer::handle_answer(args).await,
        Commands::Topics(args) => commands::topics::handle_topics(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
