// src/bin/report.rs

//! One-shot run: fetch the feeds, print the stats, write the chart, exit.

use std::fmt::Write;
use std::path::Path;
use std::process::ExitCode;

use dotenvy::dotenv;
use quiz_insights::config::Config;
use quiz_insights::fetch::BasicClient;
use quiz_insights::logging;
use quiz_insights::snapshot::{PipelineError, Report, Sources};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    dotenv().ok();

    let config = Config::from_env()?;
    let _guard = logging::init(&config);

    if config.accept_invalid_certs {
        tracing::warn!("ACCEPT_INVALID_CERTS is set: upstream TLS certificates are NOT verified");
    }

    let client = BasicClient::new(config.accept_invalid_certs)?;

    match run(&client, &config).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            tracing::error!(error = %e, "Report failed");
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run(client: &BasicClient, config: &Config) -> Result<(), PipelineError> {
    let sources = Sources::fetch(client, config).await?;

    for table in sources.tables() {
        println!("\n{}", table.info());
    }

    let report = Report::build(&sources, &config.chart_path)?;
    print!("{}", stats_text(&report, &config.chart_path));

    Ok(())
}

fn stats_text(report: &Report, chart_path: &Path) -> String {
    let summary = &report.summary;
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "\nBasic Performance Stats:");
    let _ = writeln!(out, "Average Score: {}", summary.average_score);
    let _ = writeln!(out, "Average Accuracy: {}", summary.accuracy_label());

    let _ = writeln!(out, "\nComparing Current Quiz to Historical Data:");
    let _ = writeln!(out, "Current Quiz Score: {}", summary.current_avg_score);
    let _ = writeln!(out, "Average Historical Score: {}", summary.historical_avg_score);

    let _ = writeln!(
        out,
        "\nScore distribution ({} historical attempts) written to {}",
        report.historical.len(),
        chart_path.display()
    );

    out
}
