pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::app::AdminApp;
use crate::error::{ApiError, NoticeError};

#[derive(Parser)]
#[command(name = "dutying-admin")]
#[command(about = "Dutying admin CLI - manage notices on the Dutying backend")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Admin token management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "List, create, edit and delete notices")]
    Notice {
        #[command(subcommand)]
        cmd: commands::notice::NoticeCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli, app: &AdminApp) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, app, output_format).await,
        Commands::Notice { cmd } => commands::notice::handle(cmd, app, output_format).await,
    }
}

/// Print a failed command the way the selected output format expects.
/// Known API failures get their operator-facing message.
pub fn report_error(output_format: &OutputFormat, err: &anyhow::Error, verbose: bool) {
    let (message, code) = match err.downcast_ref::<NoticeError>() {
        Some(NoticeError::Api(api)) => (api.user_message(), error_code(api)),
        Some(other) => (other.user_message(), Some("INVALID_INPUT")),
        None => (err.to_string(), None),
    };

    if verbose {
        eprintln!("Error: {err:?}");
    }
    if let Err(e) = utils::output_error(output_format, &message, code) {
        eprintln!("Error: {message} ({e})");
    }
}

fn error_code(err: &ApiError) -> Option<&'static str> {
    match err {
        ApiError::Transport(_) => Some("NETWORK_ERROR"),
        ApiError::NotFound(_) => Some("NOT_FOUND"),
        ApiError::Status { status, .. } if *status >= 500 => Some("SERVER_ERROR"),
        ApiError::Status { .. } => Some("REQUEST_REJECTED"),
        ApiError::Decode(_) => Some("BAD_RESPONSE"),
        ApiError::InvalidUrl(_) => None,
    }
}
