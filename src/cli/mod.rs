//! Command-line interface

pub mod commands;
pub mod output;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, Subcommand};
use commands::{ConvertCommand, InspectCommand};
use std::ffi::OsString;

/// Path filtering and monorepo expansion for CI pipeline configs
#[derive(Debug, Parser, Clone)]
#[command(name = "monorepo-convert")]
#[command(author = "monorepo-convert Contributors")]
#[command(version)]
#[command(
    about = "Disable pipelines and steps whose path conditions match no changed file",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(
        short,
        long,
        global = true,
        env = "DRONE_DEBUG",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Convert a configuration for a commit range
    Convert(ConvertCommand),

    /// Show documents and their path conditions without converting
    Inspect(InspectCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
