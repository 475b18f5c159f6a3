use std::sync::Arc;

use aion_api::app::{serve, AppState};
use aion_api::mail::SmtpMailer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up SUPABASE_URL, SENDGRID_*, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = aion_api::config::config();
    tracing::info!("Starting AION API in {:?} mode", config.environment);

    let mailer = SmtpMailer::from_config(&config.smtp)?;
    serve(AppState::new(config.clone(), Arc::new(mailer))).await
}
