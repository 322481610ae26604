#![forbid(unsafe_code)]

//! Skarbiec CLI
//!
//! Runs a drive permission audit across a workspace domain and writes
//! the results as CSV reports.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use skarbiec_audit::{AuditOptions, AuditRunner, report};

/// Audit a domain's drive permissions into CSV reports.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Service-account credentials: inline JSON or a path to a JSON key file
    #[arg(long, env = "SKARBIEC_CREDENTIALS")]
    credentials: String,

    /// Email address of the administrative delegate
    #[arg(long, env = "SKARBIEC_ADMIN")]
    admin: String,

    /// Output path for the user drive report (timestamped default)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Skip the per-user drive sweep
    #[arg(long)]
    skip_users: bool,

    /// Also audit shared drives under domain-admin access
    #[arg(long)]
    shared_drives: bool,

    /// Folder names to skip during walks
    #[arg(long = "exclude", value_delimiter = ',', default_value = ".git")]
    exclude: Vec<String>,

    /// Depth bound for per-user walks
    #[arg(long, default_value_t = 20)]
    max_depth: u32,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                if args.verbose { "debug".into() } else { "info".into() }
            }),
        )
        .init();

    let secret = load_credentials(&args.credentials)?;

    let runner = AuditRunner::new(secret, &args.admin).with_options(AuditOptions {
        audit_users: !args.skip_users,
        audit_shared_drives: args.shared_drives,
        exclude_folders: args.exclude.clone(),
        max_depth: args.max_depth,
        ..AuditOptions::default()
    });

    let audit = runner.run().await?;

    if !audit.user_files.is_empty() {
        let path = args.output.clone().unwrap_or_else(|| {
            PathBuf::from(report::default_report_filename("user", chrono::Utc::now()))
        });
        let out = std::fs::File::create(&path)
            .with_context(|| format!("creating {}", path.display()))?;
        report::write_user_report(&audit, out)?;
        tracing::info!(path = %path.display(), "user drive report written");
    }

    if !audit.shared_drive_files.is_empty() {
        let path =
            PathBuf::from(report::default_report_filename("team", chrono::Utc::now()));
        let out = std::fs::File::create(&path)
            .with_context(|| format!("creating {}", path.display()))?;
        report::write_shared_drive_report(&audit, out)?;
        tracing::info!(path = %path.display(), "shared drive report written");
    }

    Ok(())
}

/// Inline JSON is used as-is; anything else is treated as a file path.
fn load_credentials(value: &str) -> Result<String> {
    if serde_json::from_str::<serde_json::Value>(value).is_ok() {
        return Ok(value.to_owned());
    }
    std::fs::read_to_string(value)
        .with_context(|| format!("reading credentials file {value}"))
}
