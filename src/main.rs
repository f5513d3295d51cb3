use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use githead::{cargo_directives, GitHead, HeadConfig, Properties};

#[derive(Debug, Parser)]
#[command(
    name = "githead",
    about = "Print the current git branch and commit without running git",
    version
)]
struct Cli {
    /// Directory to start searching from (default: current directory)
    path: Option<PathBuf>,

    /// Read settings from a TOML file; flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only look in PATH itself, not its parent directories
    #[arg(long)]
    no_search_parents: bool,

    /// Branch reported when it cannot be resolved or HEAD is detached
    #[arg(long)]
    default_branch: Option<String>,

    /// Commit reported when it cannot be resolved
    #[arg(long)]
    default_commit: Option<String>,

    /// Fail instead of falling back to defaults
    #[arg(long)]
    strict: bool,

    /// Prefix for property names and environment variables
    #[arg(long)]
    prefix: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Cargo,
}

impl Cli {
    fn head_config(&self) -> Result<HeadConfig> {
        let mut config = match &self.config {
            Some(path) => HeadConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => HeadConfig::default(),
        };

        if let Some(path) = &self.path {
            config.repo_location = path.clone();
        }
        if self.no_search_parents {
            config.search_parent_directories = false;
        }
        if let Some(branch) = &self.default_branch {
            config.default_branch = branch.clone();
        }
        if let Some(commit) = &self.default_commit {
            config.default_commit = commit.clone();
        }
        if self.strict {
            config.fail_on_failure = true;
        }
        if let Some(prefix) = &self.prefix {
            config.property_prefix = prefix.clone();
        }

        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "githead=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolves according to `cli` and renders the output for stdout.
fn run(cli: &Cli) -> Result<String> {
    let config = cli.head_config()?;
    let head = GitHead::resolve(&config).context("failed to resolve branch and commit")?;

    let output = match cli.format {
        OutputFormat::Text => Properties::new(&head, &config.property_prefix).to_text(),
        OutputFormat::Json => {
            let json = Properties::new(&head, &config.property_prefix).to_json()?;
            format!("{}\n", json)
        }
        OutputFormat::Cargo => cargo_directives(&head, &config.property_prefix)
            .iter()
            .map(|directive| format!("{}\n", directive))
            .collect(),
    };

    Ok(output)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    print!("{}", run(&cli)?);
    Ok(())
}
