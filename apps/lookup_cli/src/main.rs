use std::{fmt::Write as _, process::ExitCode};

use anyhow::Result;
use clap::Parser;
use client_core::{LookupClient, LookupService, DEFAULT_SERVER_URL};
use shared::protocol::LookupData;
use tracing_subscriber::EnvFilter;

/// Look up the Seattle council district and representatives for an address.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, env = "LOOKUP__SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,
    #[arg(long)]
    address: String,
    /// Print the lookup data as JSON instead of a summary.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let client = LookupClient::new(&args.server_url)?;
    match client.lookup(&args.address).await {
        Ok(data) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print!("{}", render_plain(&data));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            if let Some(detail) = err.diagnostic() {
                tracing::debug!("lookup failed: {detail}");
            }
            eprintln!("{err}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn render_plain(data: &LookupData) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} (Council District {})",
        data.district.name, data.district.number
    );
    if data.representatives.is_empty() {
        let _ = writeln!(out, "  No representatives are listed for this district yet.");
    }
    for rep in &data.representatives {
        let subtitle: Vec<&str> = [rep.title.as_deref(), rep.role.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect();
        if subtitle.is_empty() {
            let _ = writeln!(out, "  {}", rep.name);
        } else {
            let _ = writeln!(out, "  {} - {}", rep.name, subtitle.join(", "));
        }
        for contact in [rep.email.as_deref(), rep.profile_url.as_deref()]
            .into_iter()
            .flatten()
        {
            let _ = writeln!(out, "    {contact}");
        }
    }
    out
}
