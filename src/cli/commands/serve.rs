use std::sync::Arc;

use crate::app::{serve, AppState};
use crate::config::config;
use crate::mail::SmtpMailer;

pub async fn handle(port: Option<u16>) -> anyhow::Result<()> {
    let mut config = config().clone();
    if let Some(port) = port {
        config.server.port = port;
    }

    let mailer = SmtpMailer::from_config(&config.smtp)?;
    serve(AppState::new(config, Arc::new(mailer))).await
}
