//! NeuroDx Control - command-line front-end for the diagnosis chatbot
//!
//! Runs the explanation service, mock predictions and report writer locally.

use anyhow::Result;
use clap::{Parser, Subcommand};
use neurodx_common::Config;
use neurodxctl::commands::{self, AnalyzeOptions};
use neurodxctl::errors::{exit_code_for, EXIT_SUCCESS};
use neurodxctl::logging::LogEntry;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// Version is embedded at build time
const VERSION: &str = env!("NEURODX_VERSION");

#[derive(Parser)]
#[command(name = "neurodxctl")]
#[command(about = "NeuroDx - MRI diagnosis explanation assistant", long_about = None)]
#[command(version = VERSION)]
struct Cli {
    /// Config file (defaults to $NEURODX_CONFIG, then /etc/neurodx/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a question about a diagnosis
    Ask {
        question: String,

        /// Condition code (AD, MCI, HC) or full label
        #[arg(long, short)]
        diagnosis: String,

        #[arg(long, short, default_value_t = 1.0)]
        confidence: f64,
    },

    /// Analyze a NIfTI/DICOM scan with the prediction provider
    Analyze {
        scan: PathBuf,

        /// Question to answer against the new diagnosis
        #[arg(long, short)]
        question: Option<String>,

        /// RNG seed for reproducible mock predictions
        #[arg(long)]
        seed: Option<u64>,

        /// Write a diagnosis report
        #[arg(long)]
        report: bool,

        /// Report path (overrides config)
        #[arg(long, requires = "report")]
        output: Option<PathBuf>,
    },

    /// Write a diagnosis report
    Report {
        #[arg(long, short)]
        diagnosis: String,

        #[arg(long, short)]
        confidence: f64,

        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// List the knowledge base
    Knowledge,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Ask { .. } => "ask",
            Commands::Analyze { .. } => "analyze",
            Commands::Report { .. } => "report",
            Commands::Knowledge => "knowledge",
        }
    }
}

fn run(cli: &Cli, color: bool) -> Result<String> {
    let config = Config::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Ask {
            question,
            diagnosis,
            confidence,
        } => commands::ask(&config, question, diagnosis, *confidence, color),
        Commands::Analyze {
            scan,
            question,
            seed,
            report,
            output,
        } => {
            let opts = AnalyzeOptions {
                question: question.as_deref(),
                seed: *seed,
                report: *report,
                report_path: output.as_deref(),
            };
            commands::analyze(&config, scan, &opts, color)
        }
        Commands::Report {
            diagnosis,
            confidence,
            output,
        } => commands::report(&config, diagnosis, *confidence, output.as_deref()),
        Commands::Knowledge => commands::knowledge(&config, color),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stdout().is_terminal();
    let started = Instant::now();

    let (exit_code, error) = match run(&cli, color) {
        Ok(text) => {
            println!("{}", text);
            (EXIT_SUCCESS, None)
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            (exit_code_for(&e), Some(e.to_string()))
        }
    };

    let entry = LogEntry::new(
        cli.command.name(),
        exit_code,
        started.elapsed().as_millis() as u64,
        error,
    );
    if let Err(e) = entry.write() {
        debug!("Could not write invocation log: {}", e);
    }

    std::process::exit(exit_code);
}
