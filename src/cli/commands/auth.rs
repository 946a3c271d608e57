use clap::Subcommand;
use serde_json::json;

use crate::app::AdminApp;
use crate::cli::utils::{output_success, read_stdin};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Store the admin token (reads stdin when omitted)")]
    SetToken {
        #[arg(help = "Admin token")]
        token: Option<String>,
    },

    #[command(about = "Forget the stored admin token")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,
}

pub async fn handle(cmd: AuthCommands, app: &AdminApp, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::SetToken { token } => {
            let token = match token {
                Some(token) => token,
                None => read_stdin()?,
            };
            app.auth.set_token(&token)?;

            output_success(&output_format, "Admin token saved", Some(json!({ "authenticated": true })))
        }
        AuthCommands::Logout => {
            app.auth.logout()?;
            output_success(&output_format, "Logged out", Some(json!({ "authenticated": false })))
        }
        AuthCommands::Status => {
            let snapshot = app.auth.snapshot();
            let masked = snapshot.token.as_deref().map(mask_token);

            match output_format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({
                            "authenticated": snapshot.is_authenticated,
                            "token": masked,
                            "server": app.config.api_base_url,
                        }))?
                    );
                }
                OutputFormat::Text => match masked {
                    Some(masked) => println!("Authenticated ({}) against {}", masked, app.config.api_base_url),
                    None => println!("Not authenticated - run `dutying-admin auth set-token`"),
                },
            }
            Ok(())
        }
    }
}

/// Keep only the last four characters visible
fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}
