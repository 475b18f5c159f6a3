use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::config::{config, AppConfig};

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Show the configuration loaded from the environment, secrets masked")]
    Show,
}

pub fn handle(cmd: ConfigCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let resolved = redacted(config());
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&resolved)?),
                OutputFormat::Text => {
                    println!("Environment: {:?}", config().environment);
                    println!("Supabase URL: {}", config().supabase.url);
                    println!("Service URL: {}", config().supabase.sb_url);
                    println!("SMTP: {}:{}", config().smtp.host, config().smtp.port);
                    println!("Sender: {}", config().smtp.from_header());
                    println!("Report timezone: {}", config().report.tz());
                    println!("Port: {}", config().server.port);
                }
            }
            Ok(())
        }
    }
}

fn mask(secret: &str) -> Value {
    if secret.is_empty() {
        Value::Null
    } else {
        let tail: String = secret.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
        json!(format!("***{}", tail))
    }
}

/// Configuration as JSON with keys and passwords reduced to their last four characters.
pub fn redacted(config: &AppConfig) -> Value {
    let mut value = json!(config);
    value["supabase"]["anon_key"] = mask(&config.supabase.anon_key);
    value["supabase"]["service_role_key"] = mask(&config.supabase.service_role_key);
    value["supabase"]["sb_key"] = mask(&config.supabase.sb_key);
    value["supabase"]["sb_service_role"] = mask(&config.supabase.sb_service_role);
    value["smtp"]["password"] = mask(&config.smtp.password);
    value["security"]["reset_secret"] = mask(&config.security.reset_secret);
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_are_masked() {
        let mut config = AppConfig::default();
        config.supabase.sb_service_role = "service-role-abcd".to_string();
        config.smtp.password = String::new();

        let value = redacted(&config);
        assert_eq!(value["supabase"]["sb_service_role"], "***abcd");
        assert!(value["smtp"]["password"].is_null());
    }
}
