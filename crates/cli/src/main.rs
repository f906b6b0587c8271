//! Pulsecast CLI — the main entry point.
//!
//! Commands:
//! - `ask`     — Stream a computation's answer to the terminal
//! - `replay`  — Replay a recorded chunk sequence onto a Slack message
//! - `event`   — Verify and answer a Slack Events API payload

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "pulsecast",
    about = "Pulsecast — live progress for streaming agent and workflow output",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream a computation's answer to the terminal
    Ask {
        /// The message to send
        message: String,

        /// Computation to run (defaults to config `default_computation`)
        #[arg(short, long)]
        computation: Option<String>,

        /// Resource identifier passed through to the computation
        #[arg(long, default_value = "local_user")]
        resource: String,

        /// Thread identifier passed through to the computation
        #[arg(long, default_value = "cli_session")]
        thread: String,
    },

    /// Replay a JSONL chunk recording onto a Slack message
    Replay {
        /// Recording file, one chunk per line
        file: PathBuf,

        /// Channel to post into
        #[arg(long, default_value = "C0REPLAY")]
        channel: String,

        /// Thread to reply in
        #[arg(long)]
        thread: Option<String>,
    },

    /// Verify and answer a Slack Events API request body
    Event {
        /// File holding the raw request body
        file: PathBuf,

        /// Value of the X-Slack-Request-Timestamp header
        #[arg(long)]
        timestamp: Option<String>,

        /// Value of the X-Slack-Signature header
        #[arg(long)]
        signature: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so streamed output stays clean on stdout
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Ask {
            message,
            computation,
            resource,
            thread,
        } => commands::ask::run(message, computation, resource, thread).await?,
        Commands::Replay {
            file,
            channel,
            thread,
        } => commands::replay::run(&file, channel, thread).await?,
        Commands::Event {
            file,
            timestamp,
            signature,
        } => commands::event::run(&file, timestamp, signature).await?,
    }

    Ok(())
}
