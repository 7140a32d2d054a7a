//! dq-scan: data-quality detection and scoring for tabular records
//!
//! Reads `{"data": [...], "tableName": "..."}` and reports detected issues
//! with per-dimension quality scores.

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use dq_scan::{
    cli::{self, ConfigView},
    config::AppConfig,
    detect::DetectorId,
    pipeline::exit_codes,
    reports::ReportFormat,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dq-scan")]
#[command(version)]
#[command(about = "Data-quality issue detection and scoring", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
#[command(after_help = "EXIT CODES:
    0  Scan completed
    1  Error occurred (the error is printed as {\"error\": ...} on stdout)
    2  Overall score below --min-score

EXAMPLES:
    # Scan a payload from stdin
    dq-scan < payload.json

    # Human-readable summary of a file
    dq-scan scan --input payload.json --format summary

    # CI gate
    dq-scan scan --input payload.json --min-score 80 --disable statistical-outliers")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "DQ_SCAN_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    scan: ScanArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Arguments for the `scan` subcommand
#[derive(Args, Clone, Default)]
struct ScanArgs {
    /// Payload file (reads stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (writes stdout when omitted)
    #[arg(short = 'O', long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<ReportFormat>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Exit with code 2 when the overall score is below this value
    #[arg(long, value_name = "SCORE")]
    min_score: Option<f64>,

    /// Skip a detector (repeatable)
    #[arg(long, value_enum, value_name = "DETECTOR")]
    disable: Vec<DetectorId>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a payload for data-quality issues (the default command)
    Scan(ScanArgs),

    /// Print configuration information
    Config {
        /// Print the JSON Schema of the config file format
        #[arg(long, conflicts_with = "example")]
        schema: bool,

        /// Print an example config file
        #[arg(long)]
        example: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl ScanArgs {
    /// CLI overrides layered over the file configuration.
    fn overrides(&self, cli: &Cli) -> AppConfig {
        let mut builder = AppConfig::builder()
            .output_file(self.output.clone())
            .pretty(self.pretty)
            .no_color(cli.no_color)
            .min_score(self.min_score)
            .quiet(cli.quiet);
        if let Some(format) = self.format {
            builder = builder.output_format(format);
        }
        for id in &self.disable {
            builder = builder.disable(*id);
        }
        builder.build()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the payload
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();

    match &cli.command {
        None => scan(&cli, &cli.scan),
        Some(Commands::Scan(args)) => scan(&cli, args),

        Some(Commands::Config { schema, example }) => {
            let view = if *schema {
                ConfigView::Schema
            } else if *example {
                ConfigView::Example
            } else {
                ConfigView::Effective
            };
            println!("{}", cli::run_config(view, cli.config.as_deref())?);
            Ok(())
        }

        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "dq-scan", &mut io::stdout());
            Ok(())
        }
    }
}

fn scan(cli: &Cli, args: &ScanArgs) -> Result<()> {
    let (config, loaded_from) =
        AppConfig::from_file_with_overrides(cli.config.as_deref(), &args.overrides(cli));
    if let Some(path) = loaded_from {
        tracing::debug!("Using config file {}", path.display());
    }

    let exit_code = cli::run_scan(&config, args.input.as_deref())?;
    if exit_code != exit_codes::SUCCESS {
        std::process::exit(exit_code);
    }
    Ok(())
}
