use anyhow::{anyhow, Context, Result};
use monorepo_convert::cli::commands::{ConvertCommand, InspectCommand};
use monorepo_convert::cli::output::*;
use monorepo_convert::cli::{Cli, Command};
use monorepo_convert::convert::{ConvertRequest, Converter};
use monorepo_convert::core::{decode, BuildRef, Document, RepoRef};
use monorepo_convert::provider::{self, ProviderConfig, ProviderKind};
use std::io::Read;
use std::path::Path;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging; RUST_LOG wins over --verbose
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    match &cli.command {
        Command::Convert(cmd) => run_convert(cmd).await?,
        Command::Inspect(cmd) => inspect_config(cmd)?,
    }

    Ok(())
}

/// Read a configuration from a path, or stdin for `-`
fn read_config(file: &str) -> Result<String> {
    if file == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read configuration from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file))
}

/// Load every monorepo project file that exists under `repo_dir`
fn preload_projects(config: ProviderConfig, text: &str, repo_dir: &Path) -> ProviderConfig {
    let Ok(documents) = decode(text) else {
        // the converter reports the parse error
        return config;
    };

    let mut config = config;
    for monorepo in documents.iter().filter_map(Document::as_monorepo) {
        for path in monorepo.project_paths() {
            match std::fs::read_to_string(repo_dir.join(path)) {
                Ok(contents) => config = config.with_file(path, contents),
                Err(e) => warn!(project = path, "Project file not readable: {}", e),
            }
        }
    }
    config
}

async fn run_convert(cmd: &ConvertCommand) -> Result<()> {
    let text = read_config(&cmd.file)?;
    let repo = RepoRef::from_slug(&cmd.repo)
        .ok_or_else(|| anyhow!("Invalid repository slug '{}', expected namespace/name", cmd.repo))?;
    let build = BuildRef::new(cmd.before.clone(), cmd.after.clone());

    let kind = ProviderKind::from(cmd.provider);
    if !kind.lists_changed_files() {
        eprintln!(
            "{} Provider {} cannot list changed files; path-gated configs will fail",
            WARN,
            style(kind.as_str()).yellow()
        );
    }

    let mut config = ProviderConfig::new(kind)
        .with_repo_dir(&cmd.repo_dir)
        .with_timeout(cmd.timeout)
        .with_changed_files(cmd.changed_file.clone());
    if let Some(git_path) = &cmd.git_path {
        config = config.with_git_path(git_path.clone());
    }
    if kind == ProviderKind::Static {
        config = preload_projects(config, &text, &cmd.repo_dir);
    }

    let converter = Converter::new(provider::from_config(&config));
    let request = ConvertRequest::new(text, repo, build);

    let conversion = match converter.convert(&request).await {
        Ok(conversion) => conversion,
        Err(e) => {
            eprintln!("{} Conversion failed:", CROSS);
            eprintln!("  {}", style(&e).red());
            error!("{:?}", e);
            std::process::exit(1);
        }
    };

    if let Some(path) = &cmd.output {
        std::fs::write(path, &conversion.config)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("{} Wrote {}", CHECK, style(path.display()).bold());
    }

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&conversion.report)?);
    } else {
        eprintln!("{}", format_report(&conversion.report));
        if cmd.output.is_none() {
            print!("{}", conversion.config);
        }
    }

    Ok(())
}

fn inspect_config(cmd: &InspectCommand) -> Result<()> {
    let text = read_config(&cmd.file)?;

    let documents = match decode(&text) {
        Ok(documents) => documents,
        Err(e) => {
            println!("{} Invalid configuration:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    };

    let summaries: Vec<DocumentSummary> = documents
        .iter()
        .enumerate()
        .map(|(index, document)| DocumentSummary::from_document(index, document))
        .collect();

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    let gated = summaries.iter().filter(|s| s.is_gated()).count();
    println!(
        "{} {} documents, {} with path conditions",
        INFO,
        style(summaries.len()).cyan(),
        style(gated).cyan()
    );
    for summary in &summaries {
        println!("{}", format_document_summary(summary));
    }

    Ok(())
}
