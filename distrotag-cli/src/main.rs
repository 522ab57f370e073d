//! distrotag - release catalog and distribution naming for packagers

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use distrotag_core::{CatalogConfig, Distribution, ReleaseCatalog};

mod catalog_cli;
mod names_cli;

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "distrotag",
    about = "Active Fedora/EPEL releases and the names packaging tools use for them",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Set log level
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Configuration file (default: per-user config.yaml)
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Cache directory for the release feed
    #[clap(long, global = true)]
    cache_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
enum Command {
    /// List active releases from the catalog
    Releases {
        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Show the development, latest stable and latest EPEL releases
    Latest {
        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Show every derived name of a distribution (f40, epel9, rhel-9.2)
    Show {
        /// Distribution to describe
        distribution: Distribution,

        /// Architecture for the mock config name
        #[clap(long, default_value = "x86_64")]
        arch: String,

        /// Latest stable Fedora to resolve against (skips the catalog)
        #[clap(long)]
        latest: Option<Distribution>,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Download the release feed now, ignoring the cache age
    Refresh,

    /// Show the cache file and its freshness
    Cache,
}

fn initialize_tracing(log_level: &LogLevel) {
    // RUST_LOG wins over --log-level when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_filter_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // Logs go to stderr, output to stdout
        .init();
}

fn load_config(cli: &Cli) -> Result<CatalogConfig> {
    let mut config = match &cli.config {
        Some(path) => CatalogConfig::load_from_path(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => CatalogConfig::load()?,
    };

    if let Some(dir) = &cli.cache_dir {
        config.cache_dir = Some(dir.clone());
    }

    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level);

    let config = load_config(&cli)?;
    tracing::debug!("Using feed {}", config.feed_url);
    let catalog = ReleaseCatalog::new(config);

    match cli.command {
        Command::Releases { json } => catalog_cli::execute_releases(&catalog, json),
        Command::Latest { json } => catalog_cli::execute_latest(&catalog, json),
        Command::Show {
            distribution,
            arch,
            latest,
            json,
        } => names_cli::execute_show(&catalog, &distribution, &arch, latest, json),
        Command::Refresh => catalog_cli::execute_refresh(&catalog),
        Command::Cache => catalog_cli::execute_cache(&catalog),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_parses_distributions() {
        let cli = Cli::try_parse_from(["distrotag", "show", "epel9", "--latest", "f40"]).unwrap();
        match cli.command {
            Command::Show {
                distribution,
                arch,
                latest,
                json,
            } => {
                assert_eq!(distribution, Distribution::Epel(9));
                assert_eq!(arch, "x86_64");
                assert_eq!(latest, Some(Distribution::Fedora(40)));
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_show_rejects_unknown_distribution() {
        assert!(Cli::try_parse_from(["distrotag", "show", "fc40"]).is_err());
    }

    #[test]
    fn test_global_overrides() {
        let cli = Cli::try_parse_from([
            "distrotag",
            "latest",
            "--cache-dir",
            "/tmp/distrotag",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.cache_dir, Some(PathBuf::from("/tmp/distrotag")));
        assert!(matches!(cli.log_level, LogLevel::Debug));
        assert!(matches!(cli.command, Command::Latest { json: false }));
    }
}
