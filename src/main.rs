use clap::Parser;
use tracing_subscriber::EnvFilter;

use dutying_admin::app::AdminApp;
use dutying_admin::cli::{self, Cli, OutputFormat};
use dutying_admin::config::AppConfig;

#[tokio::main]
async fn main() {
    // Load .env if present so DUTYING_API_BASE_URL can live next to the binary
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_format = OutputFormat::from_cli(&cli);
    let verbose = matches!(std::env::var("CLI_VERBOSE").as_deref(), Ok("true") | Ok("1"));

    // Configuration and the stored token must be in place before any command runs
    let app = match AppConfig::from_env().map_err(Into::into).and_then(AdminApp::init) {
        Ok(app) => app,
        Err(e) => {
            tracing::debug!(error = ?e, "startup failed");
            cli::report_error(&output_format, &e.into(), verbose);
            std::process::exit(1);
        }
    };

    if let Err(e) = cli::run(cli, &app).await {
        cli::report_error(&output_format, &e, verbose);
        std::process::exit(1);
    }
}
