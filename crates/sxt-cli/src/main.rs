//! Standard XML Transformer CLI.

use clap::{ColorChoice, Parser};
use std::io::{self, IsTerminal};
use sxt_cli::commands::{RunOptions, RunOutcome, list_transforms, run_transform};
use sxt_cli::logging::{LogConfig, LogFormat, init_logging};
use sxt_cli::summary::{print_not_found, print_run_summary};
use tracing::level_filters::LevelFilter;

mod cli;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};

const EXIT_NOT_FOUND: i32 = 2;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Run(args) => {
            let options = RunOptions {
                config: args.config,
                workspace_root: args.workspace_root,
                xsltproc: args.xsltproc,
                xmllint: args.xmllint,
            };
            match run_transform(&options) {
                Ok(RunOutcome::Completed(report)) => {
                    print_run_summary(&report);
                    if report.has_errors() { 1 } else { 0 }
                }
                Ok(RunOutcome::NotFound(error)) => {
                    print_not_found(&error);
                    EXIT_NOT_FOUND
                }
                Err(error) => {
                    eprintln!("error: {error:#}");
                    1
                }
            }
        }
        Command::Transforms(args) => match list_transforms(&args.registry, args.json) {
            Ok(output) => {
                println!("{output}");
                0
            }
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
