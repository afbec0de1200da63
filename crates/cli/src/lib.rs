pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use homzhub_core::config::{AppConfig, LoadOptions};

#[derive(Debug, Parser)]
#[command(
    name = "homzhub",
    about = "Homzhub operator CLI",
    long_about = "Drive the Homzhub service-ticket quote workflow: inspect configuration, list quote categories, submit quotes from a manifest, and run ticket lifecycle actions.",
    after_help = "Examples:\n  homzhub doctor --json\n  homzhub config\n  homzhub categories --ticket T-1042 --quote-request QR-17\n  homzhub submit --ticket T-1042 --quote-request QR-17 --manifest quotes.toml\n  homzhub ticket close --ticket T-1042"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate configuration and API readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Fetch quote categories for a ticket and print the seeded groups")]
    Categories {
        #[arg(long)]
        ticket: String,
        #[arg(long)]
        quote_request: String,
    },
    #[command(about = "Run the full quote workflow from a manifest file and submit it")]
    Submit {
        #[arg(long)]
        ticket: String,
        #[arg(long)]
        quote_request: String,
        #[arg(long, help = "TOML manifest describing slot prices and document paths")]
        manifest: PathBuf,
    },
    #[command(subcommand, about = "Run a single-purpose ticket lifecycle action")]
    Ticket(TicketCommand),
}

#[derive(Debug, Subcommand)]
pub enum TicketCommand {
    #[command(about = "Close the ticket")]
    Close {
        #[arg(long)]
        ticket: String,
    },
    #[command(about = "Reassign the ticket to another operator")]
    Reassign {
        #[arg(long)]
        ticket: String,
        #[arg(long)]
        assigned_to: String,
    },
    #[command(about = "Request quotes for the ticket")]
    RequestQuote {
        #[arg(long)]
        ticket: String,
    },
    #[command(about = "Approve the submitted quote")]
    ApproveQuote {
        #[arg(long)]
        ticket: String,
    },
    #[command(about = "Ask for additional quotes")]
    RequestMoreQuotes {
        #[arg(long)]
        ticket: String,
    },
    #[command(about = "Rate the completed work and leave feedback")]
    Review {
        #[arg(long)]
        ticket: String,
        #[arg(long, help = "Rating from 1 to 5")]
        rating: u8,
        #[arg(long)]
        comment: Option<String>,
    },
}

fn init_logging(config: &AppConfig) {
    use homzhub_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    let _ = match config.logging.format {
        Compact => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .compact()
            .try_init(),
        Pretty => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .pretty()
            .try_init(),
        Json => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .json()
            .try_init(),
    };
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Logging is best-effort here: a broken config still gets reported by
    // the individual commands.
    if let Ok(config) = AppConfig::load(LoadOptions::default()) {
        init_logging(&config);
    }

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Categories { ticket, quote_request } => {
            commands::categories::run(&ticket, &quote_request)
        }
        Command::Submit { ticket, quote_request, manifest } => {
            commands::submit::run(&ticket, &quote_request, &manifest)
        }
        Command::Ticket(action) => commands::ticket::run(action),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
