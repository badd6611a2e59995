//! CLI argument definitions for the broadcast QC tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "broadcast-qc",
    version,
    about = "Broadcast QC - Validate broadcast schedule reports against rights contracts",
    long_about = "Validate a Broadcast Schedule Report workbook against its fixture list,\n\
                  the Rosco channel roster, and the cross-market macro rules.\n\n\
                  Writes an annotated copy of the report with one status and one remark\n\
                  column per check, plus a summary sheet."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the QC checks over a BSR workbook and write the annotated report.
    Run(RunArgs),

    /// List all checks in report order.
    Checks,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Path to the Broadcast Schedule Report workbook.
    #[arg(value_name = "BSR_WORKBOOK")]
    pub bsr: PathBuf,

    /// Rosco roster workbook (valid market/channel pairs and the monitoring
    /// period). Without it the pair check degrades to not-applicable and the
    /// period is read from the BSR itself.
    #[arg(long = "rosco", value_name = "PATH")]
    pub rosco: Option<PathBuf>,

    /// Macro workbook with the cross-market duplication rules.
    #[arg(long = "macro", value_name = "PATH")]
    pub macro_file: Option<PathBuf>,

    /// JSON configuration file; missing sections fall back to the defaults.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory for the annotated report (default: next to the input).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Run the checks and print the summary without writing the report.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
