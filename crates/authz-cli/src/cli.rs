//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use authz_cli::commands::ClassifyRequest;
use authz_cli::output::OutputFormat;
use authz_model::RunType;

#[derive(Parser)]
#[command(
    name = "authz",
    version,
    about = "Classify authorization notes as TRUE, FALSE or UNK",
    long_about = "Classify free-text authorization notes against inclusion and \
                  exclusion rule sets.\n\n\
                  Every decision records the rules that fired and the \
                  fingerprint of the rules file it was made with."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
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
    /// Classify every note in a CSV file.
    Classify(ClassifyArgs),

    /// Classify a single note and show which rules fired.
    Explain(ExplainArgs),

    /// Validate a rules file and list its rules.
    Check(RulesArgs),
}

#[derive(Args)]
pub struct RulesArgs {
    /// Rules file (TOML, or JSON by extension). Falls back to $AUTHZ_RULES,
    /// then ./authz-rules.toml.
    #[arg(long = "rules", value_name = "PATH")]
    pub rules: Option<PathBuf>,
}

#[derive(Args)]
pub struct ClassifyArgs {
    /// Notes CSV with a `text` column and optional `id` and `run_type`.
    #[arg(long = "notes", value_name = "CSV")]
    pub notes: PathBuf,

    #[command(flatten)]
    pub rules: RulesArgs,

    /// Run type for rows without a `run_type` value.
    #[arg(long = "run-type", value_enum, default_value = "production")]
    pub run_type: RunTypeArg,

    /// Write results here instead of stdout.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Result format.
    #[arg(long = "format", value_enum, default_value = "json")]
    pub format: OutputFormatArg,

    /// Also write per-note audit records (JSON).
    #[arg(long = "audit", value_name = "PATH")]
    pub audit: Option<PathBuf>,
}

impl ClassifyArgs {
    pub fn into_request(self) -> ClassifyRequest {
        ClassifyRequest {
            notes: self.notes,
            rules: self.rules.rules,
            run_type: self.run_type.into(),
            output: self.output,
            format: self.format.into(),
            audit: self.audit,
        }
    }
}

#[derive(Args)]
pub struct ExplainArgs {
    /// Note text to classify.
    #[arg(long = "text", value_name = "TEXT")]
    pub text: String,

    #[command(flatten)]
    pub rules: RulesArgs,

    #[arg(long = "run-type", value_enum, default_value = "production")]
    pub run_type: RunTypeArg,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RunTypeArg {
    Production,
    Test,
}

impl From<RunTypeArg> for RunType {
    fn from(value: RunTypeArg) -> Self {
        match value {
            RunTypeArg::Production => RunType::Production,
            RunTypeArg::Test => RunType::Test,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Json,
    Csv,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(value: OutputFormatArg) -> Self {
        match value {
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Csv => OutputFormat::Csv,
        }
    }
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
