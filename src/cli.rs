use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "bddtool")]
#[command(version)]
#[command(about = "Pack and unpack BDD archives", long_about = None)]
#[command(arg_required_else_help = true)]
#[command(after_help = "Examples:\n  \
  bddtool unpack data.bdd out        extract every file of data.bdd into out/\n  \
  bddtool pack data.bdd a.txt b.png  build data.bdd from a.txt and b.png\n  \
  bddtool list -l data.bdd           show offsets, sizes and times")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log output (-v info, -vv debug)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only report errors
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Split an archive into individual files
    Unpack {
        /// Archive to read
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Directory to extract into (created if missing)
        #[arg(value_name = "OUT_DIR")]
        output_dir: PathBuf,
    },

    /// Combine files into an archive
    Pack {
        /// Archive to write
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Files to store, in directory order
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,
    },

    /// List the archive directory
    List {
        /// Archive to read
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Show offset, length and modification time
        #[arg(short = 'l', long)]
        long: bool,
    },
}

const COMMANDS: [&str; 3] = ["unpack", "pack", "list"];

impl Cli {
    /// Parse the process arguments, accepting command names in any case.
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_command(std::env::args_os()))
    }

    /// Default `tracing` filter directive for the chosen verbosity
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Lowercase the subcommand so `PACK` and `Unpack` are accepted.
///
/// Only the first non-flag argument after the program name is considered.
pub fn normalize_command<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().collect();

    let position = args
        .iter()
        .skip(1)
        .position(|arg| !arg.to_string_lossy().starts_with('-'))
        .map(|i| i + 1);

    if let Some(i) = position {
        if let Some(lower) = args[i].to_str().map(str::to_ascii_lowercase) {
            if COMMANDS.contains(&lower.as_str()) {
                args[i] = lower.into();
            }
        }
    }

    args
}
