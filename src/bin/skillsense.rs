//! Command-line candidate search.
//!
//! Results are printed to stdout as pretty JSON. All tracing output goes to
//! stderr so that stdout can be piped straight into other tools.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use skillsense::{ProfileCatalog, SkillSenseConfig};
use tracing::Instrument;
use tracing_subscriber::EnvFilter;

/// SkillSense: hybrid AI-assisted candidate search.
#[derive(Parser)]
#[command(name = "skillsense", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Search the catalog for candidates matching a free-text query.
    Search {
        /// Recruiter query, e.g. "Senior Python developer with Django".
        query: String,

        /// Number of ranked candidates to skip.
        #[arg(long, default_value_t = 0)]
        skip: usize,

        /// Page size (1-50).
        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// JSON profile catalog; overrides `catalog.path` from the config.
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Print the default configuration file path.
    ConfigPath,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("skillsense=info,skillsense_search=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::ConfigPath => {
            println!("{}", SkillSenseConfig::default_config_path().display());
            Ok(())
        }
        Command::Search {
            query,
            skip,
            limit,
            catalog,
        } => run_search(cli.config, &query, skip, limit, catalog).await,
    }
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<SkillSenseConfig> {
    if let Some(path) = path {
        return SkillSenseConfig::from_file(&path)
            .with_context(|| format!("failed to load config from {}", path.display()));
    }
    let default_path = SkillSenseConfig::default_config_path();
    if default_path.exists() {
        SkillSenseConfig::from_file(&default_path)
            .with_context(|| format!("failed to load config from {}", default_path.display()))
    } else {
        Ok(SkillSenseConfig::default())
    }
}

async fn run_search(
    config_path: Option<PathBuf>,
    query: &str,
    skip: usize,
    limit: usize,
    catalog_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    skillsense::validate_query(query)?;

    let config = load_config(config_path)?;
    let catalog_path = catalog_path
        .or_else(|| config.catalog.path.clone())
        .context("no catalog given: pass --catalog or set catalog.path in the config")?;
    let catalog = Arc::new(
        ProfileCatalog::from_file(&catalog_path)
            .with_context(|| format!("failed to load catalog {}", catalog_path.display()))?,
    );

    let orchestrator = skillsense::build_orchestrator(&config, catalog)?;

    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("search", %request_id);

    let result = tokio::select! {
        result = orchestrator.search(query, skip, limit).instrument(span) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!(%request_id, "search cancelled");
            anyhow::bail!("search cancelled");
        }
    };

    tracing::info!(
        %request_id,
        total = result.total,
        page = result.page,
        returned = result.items.len(),
        "search complete"
    );
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
