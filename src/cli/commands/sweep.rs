use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::config;
use crate::mail::SmtpMailer;
use crate::services::{NotificationService, SweepKind, SweepSummary};
use crate::supabase::SupabaseClient;

#[derive(Subcommand)]
pub enum SweepCommands {
    #[command(about = "Run a single sweep (actividades, tramites, cajachica, factura, habilitantes)")]
    Run {
        #[arg(help = "Sweep name", value_parser = parse_kind)]
        kind: SweepKind,
    },

    #[command(about = "Run every sweep in order")]
    All,

    #[command(about = "List available sweeps")]
    List,
}

fn parse_kind(value: &str) -> Result<SweepKind, String> {
    value.parse()
}

pub async fn handle(cmd: SweepCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        SweepCommands::Run { kind } => {
            let summary = run_sweeps(&[kind]).await?;
            report(&output_format, &summary)
        }
        SweepCommands::All => {
            let summary = run_sweeps(&SweepKind::ALL).await?;
            report(&output_format, &summary)
        }
        SweepCommands::List => {
            let sweeps: Vec<_> = SweepKind::ALL
                .iter()
                .map(|kind| json!({ "name": kind.path(), "label": kind.label(), "email": kind.sends_email() }))
                .collect();
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json!({ "sweeps": sweeps }))?),
                OutputFormat::Text => {
                    for kind in SweepKind::ALL {
                        let channel = if kind.sends_email() { "push + email" } else { "push" };
                        println!("{:<14} {:<28} {}", kind.path(), kind.label(), channel);
                    }
                }
            }
            Ok(())
        }
    }
}

/// Scheduled runs act with the development-project service role, like the
/// scheduler calling the HTTP routes with `SB_SERVICE_ROLE`.
async fn run_sweeps(kinds: &[SweepKind]) -> anyhow::Result<Vec<SweepSummary>> {
    let config = config();
    if config.supabase.sb_url.is_empty() || config.supabase.sb_service_role.is_empty() {
        anyhow::bail!("SB_URL and SB_SERVICE_ROLE must be set to run sweeps");
    }

    let db = SupabaseClient::new(&config.supabase.sb_url, &config.supabase.sb_service_role);
    let mailer = SmtpMailer::from_config(&config.smtp)?;
    let service = NotificationService::new(&db, config, &mailer);

    let mut summaries = Vec::with_capacity(kinds.len());
    for kind in kinds {
        tracing::info!("Running {} sweep", kind.path());
        summaries.push(service.run(*kind, chrono::Utc::now()).await);
    }
    Ok(summaries)
}

fn report(output_format: &OutputFormat, summaries: &[SweepSummary]) -> anyhow::Result<()> {
    for summary in summaries {
        let counts = json!({
            "sweep": summary.kind.path(),
            "push": { "total": summary.push.total, "ok": summary.push.ok, "fail": summary.push.fail },
            "email": { "total": summary.email.total, "ok": summary.email.ok, "fail": summary.email.fail },
        });
        output_success(output_format, &summary.message(), Some(counts))?;
    }
    Ok(())
}
