//! Assay - Main Entry Point
//!
//! Loads suite files, registers them with the in-process harness and runs
//! every case against the live services they describe.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use assay_application::SuiteComposer;
use assay_infrastructure::{HarnessHost, ReqwestAssertionClient, RunnerSettings, SuiteFile};

/// Declarative HTTP test-suite runner.
#[derive(Debug, Parser)]
#[command(name = "assay", version, about)]
struct Cli {
    /// Settings file (TOML, YAML or JSON).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Per-case timeout in milliseconds.
    #[arg(long, value_name = "N")]
    timeout_ms: Option<u64>,

    /// Host merged under every suite fixture.
    #[arg(long, value_name = "URL")]
    host: Option<String>,

    /// Stop after the first failing case.
    #[arg(long)]
    bail: bool,

    /// Suite files to run, in order.
    #[arg(required = true, value_name = "SUITE")]
    suites: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let settings = RunnerSettings::load(cli.config.as_deref())
        .context("failed to load settings")?
        .with_overrides(cli.timeout_ms, cli.host, cli.bail);

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&settings.log_filter))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Assay v{}", env!("CARGO_PKG_VERSION"));

    let client = ReqwestAssertionClient::new(settings.request_timeout_ms)
        .context("failed to create HTTP client")?;
    let composer = SuiteComposer::new(client);
    let mut harness = HarnessHost::new(settings.case_timeout()).with_bail(settings.bail);
    let defaults = settings.fixture_defaults();

    for path in &cli.suites {
        let suite = SuiteFile::load(path)
            .await
            .with_context(|| format!("failed to load suite {}", path.display()))?;
        let fixture = suite.fixture.with_defaults(&defaults);
        composer
            .compose(&mut harness, &suite.suite, &suite.tests, &fixture)
            .with_context(|| format!("failed to register suite {}", path.display()))?;
    }

    let report = harness.run().await;
    println!("{report}");

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
