use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tvstat::{Override, RunOptions};
use tvstat_core::Config;

#[derive(Parser)]
#[command(name = "tvstat", version, about = "Summarise /usr/bin/time -v reports into CSV tables")]
struct Cli {
    /// Config file layered over the built-in defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory searched for logs when no FILES are given.
    #[arg(long, value_name = "DIR")]
    input: Option<PathBuf>,

    /// Directory the tables and report are written to.
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Treat every input as this category instead of inferring it.
    #[arg(long, value_name = "NAME", requires = "group")]
    category: Option<String>,

    /// Treat every input as this group instead of inferring it.
    #[arg(long, value_name = "LABEL", requires = "category")]
    group: Option<String>,

    /// Also write the plain-text report.
    #[arg(long)]
    report: bool,

    /// Print a JSON run summary on stdout.
    #[arg(long)]
    json: bool,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long)]
    debug: bool,

    /// Append logs to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log files to process; overrides discovery.
    files: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new(level));
    match &cli.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .with_env_filter(filter)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .init();
        }
    }

    let config = Config::load(cli.config.as_deref())?;
    let classification = match (cli.category, cli.group) {
        (Some(category), Some(group)) => Some(Override { category, group }),
        _ => None,
    };
    let opts = RunOptions {
        input: cli.input,
        output: cli.output,
        files: cli.files,
        classification,
        report: cli.report,
    };

    let summary = tvstat::run(&config, &opts)?;
    tracing::info!(
        files = summary.files.len(),
        skipped = summary.skipped.len(),
        outputs = summary.outputs.len(),
        "run complete"
    );
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}
