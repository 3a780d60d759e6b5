//! Authorization note classifier CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use authz_cli::commands::{classify_exit_code, run_check, run_classify, run_explain};
use authz_cli::logging::{LogConfig, LogFormat, init_logging};
use authz_cli::summary::{explain_lines, write_check_summary, write_classify_summary};

mod cli;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Classify(args) => {
            let request = args.into_request();
            match run_classify(&request) {
                Ok(report) => {
                    // Results on stdout keep the summary off it.
                    let written = if report.output.is_some() {
                        write_classify_summary(io::stdout().lock(), &report)
                    } else {
                        write_classify_summary(io::stderr().lock(), &report)
                    };
                    if let Err(error) = &written {
                        eprintln!("error: {error}");
                    }
                    classify_exit_code(&report, written.is_ok())
                }
                Err(error) => {
                    eprintln!("error: {error:#}");
                    1
                }
            }
        }
        Command::Explain(args) => {
            match run_explain(&args.text, args.rules.rules.as_deref(), args.run_type.into()) {
                Ok(explanation) => {
                    for line in explain_lines(&explanation) {
                        println!("{line}");
                    }
                    0
                }
                Err(error) => {
                    eprintln!("error: {error:#}");
                    1
                }
            }
        }
        Command::Check(args) => match run_check(args.rules.as_deref()) {
            Ok(ruleset) => match write_check_summary(io::stdout().lock(), &ruleset) {
                Ok(()) => 0,
                Err(error) => {
                    eprintln!("error: {error}");
                    1
                }
            },
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
