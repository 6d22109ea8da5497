//! CLI entry point for the netedit tool.

use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use clap::Parser;
use netedit_client::config::HOST_ENV;
use netedit_client::{ClientConfig, EnvSource, ProcessEnv, RequestOptions, request_once};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (warn)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let Some(host) = args.host.clone().or_else(|| ProcessEnv.var(HOST_ENV)) else {
        bail!("no NetEdit host given; pass --host or set {HOST_ENV}");
    };

    let mut config = ClientConfig::new(host);
    config.username = args.username.clone();

    let mut options = RequestOptions::new().method(args.method.clone());
    for (name, value) in args.headers {
        options = options.header(name, value);
    }
    if let Some(data) = args.data {
        options = options.body(data);
    }

    info!(path = %args.path, "sending one-shot request");
    let response = request_once(config, &args.path, options)
        .await
        .with_context(|| format!("request to {} failed", args.path))?;

    let status = response.status();
    if !args.quiet {
        eprintln!("HTTP {status}");
    }

    let body = response
        .text()
        .await
        .context("failed to read response body")?;
    let rendered = if args.json {
        serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| serde_json::to_string_pretty(&value).ok())
            .unwrap_or(body)
    } else {
        body
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    if !rendered.ends_with('\n') && !rendered.is_empty() {
        stdout.write_all(b"\n")?;
    }

    if !status.is_success() {
        bail!("server answered HTTP {status}");
    }

    Ok(())
}
