//! CLI argument definitions for the standard XML transformer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "sxt",
    version,
    about = "Standard XML Transformer - Convert between cube XML and standard XML",
    long_about = "Convert analysis cube XML to a data-exchange standard such as CDISC ODM \
                  or Define-XML, or import a standard document back into cube XML.\n\n\
                  Runs are described by a parameter file and record every step in an \
                  XML run log."
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

    /// Write diagnostics to a file instead of stderr.
    ///
    /// This is separate from the run log named in the parameter file.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run an import or export described by a parameter file.
    Run(RunArgs),

    /// List the transforms in a registry file.
    Transforms(TransformsArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Parameter file with `<Param name=".." value=".."/>` entries.
    #[arg(long = "config", value_name = "FILE")]
    pub config: PathBuf,

    /// Resolve relative paths in the parameter file against this folder.
    #[arg(long = "workspace-root", value_name = "DIR")]
    pub workspace_root: Option<PathBuf>,

    /// XSLT processor executable (default: xsltproc on PATH).
    #[arg(long = "xsltproc", value_name = "PATH")]
    pub xsltproc: Option<PathBuf>,

    /// Schema validator executable (default: xmllint on PATH).
    #[arg(long = "xmllint", value_name = "PATH")]
    pub xmllint: Option<PathBuf>,
}

#[derive(Parser)]
pub struct TransformsArgs {
    /// Registry file listing the available transforms.
    #[arg(long = "registry", value_name = "FILE")]
    pub registry: PathBuf,

    /// Print JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
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
