//! CLI command definitions

use crate::provider::ProviderKind;
use clap::Args;
use std::path::PathBuf;

/// Convert a configuration for a commit range
#[derive(Debug, Args, Clone)]
pub struct ConvertCommand {
    /// Path to the configuration file (`-` reads stdin)
    #[arg(short, long)]
    pub file: String,

    /// Repository slug (namespace/name)
    #[arg(long)]
    pub repo: String,

    /// Commit before the push; empty or all zeros lists every file of --after
    #[arg(long, default_value = "")]
    pub before: String,

    /// Commit under test
    #[arg(long)]
    pub after: String,

    /// Where changed files and project configs come from
    #[arg(long, value_enum, env = "PROVIDER", default_value_t = ProviderKindArg::Git)]
    pub provider: ProviderKindArg,

    /// Repository checkout used by the git and static providers
    #[arg(long, env = "REPO_DIR", default_value = ".")]
    pub repo_dir: PathBuf,

    /// Path to the git executable
    #[arg(long, env = "GIT_PATH")]
    pub git_path: Option<String>,

    /// Timeout for each provider call in seconds
    #[arg(long, env = "GIT_TIMEOUT", default_value_t = 60)]
    pub timeout: u64,

    /// Changed file for the static provider (repeatable)
    #[arg(long)]
    pub changed_file: Vec<String>,

    /// Write the converted configuration here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the conversion report as JSON instead of the configuration
    #[arg(long)]
    pub json: bool,
}

/// Show documents and their path conditions
#[derive(Debug, Args, Clone)]
pub struct InspectCommand {
    /// Path to the configuration file (`-` reads stdin)
    #[arg(short, long)]
    pub file: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Provider argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProviderKindArg {
    Git,
    Static,
    #[value(name = "github")]
    GitHub,
    Gogs,
}

impl From<ProviderKindArg> for ProviderKind {
    fn from(arg: ProviderKindArg) -> Self {
        match arg {
            ProviderKindArg::Git => ProviderKind::Git,
            ProviderKindArg::Static => ProviderKind::Static,
            ProviderKindArg::GitHub => ProviderKind::GitHub,
            ProviderKindArg::Gogs => ProviderKind::Gogs,
        }
    }
}
