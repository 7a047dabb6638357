//! Feature client CLI application.
//!
//! Drives the five features operations against a remote API, and can run the
//! in-memory dev server.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use feature_client::server::FeatureServer;
use feature_client::utils::{logging::init_logging, read_json_arg};
use feature_client::{Config, FeatureClient, ListParams, DEFAULT_LIMIT, DEFAULT_OFFSET};

/// Feature client CLI
#[derive(Parser)]
#[command(name = "feature-client")]
#[command(about = "Client for the Geospatial API features resource")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// API base URL (overrides the config file)
    #[arg(long, env = "FEATURE_CLIENT_BASE_URL", value_name = "URL")]
    base_url: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Log level (overrides the config file)
    #[arg(long)]
    log_level: Option<String>,

    /// Subcommands
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List features
    List {
        /// Page size
        #[arg(long, default_value_t = DEFAULT_LIMIT, allow_negative_numbers = true)]
        limit: i64,

        /// Page offset
        #[arg(long, default_value_t = DEFAULT_OFFSET, allow_negative_numbers = true)]
        offset: i64,
    },

    /// Fetch one feature
    Get {
        /// Feature id
        id: String,
    },

    /// Create a feature
    Create {
        /// Feature JSON, inline or as @FILE
        data: String,
    },

    /// Replace a feature
    Update {
        /// Feature id
        id: String,

        /// Feature JSON, inline or as @FILE
        data: String,
    },

    /// Delete a feature
    Delete {
        /// Feature id
        id: String,
    },

    /// Run the in-memory dev server
    Serve {
        /// Bind address
        #[arg(long)]
        bind: Option<String>,

        /// Port
        #[arg(long)]
        port: Option<u16>,

        /// Path prefix in front of /features, e.g. /api
        #[arg(long)]
        prefix: Option<String>,

        /// GeoJSON file loaded into the store at startup
        #[arg(long, value_name = "FILE")]
        seed: Option<PathBuf>,
    },

    /// Generate a default configuration file
    Config {
        /// Output file path
        #[arg(short, long, default_value = "feature-client.toml")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Configuration file to validate
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Show client information
    Info,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    apply_global_overrides(&mut config, &cli);
    init_logging(&config.logging)?;

    match cli.command {
        Commands::List { limit, offset } => {
            let client = build_client(&config)?;
            let page: Value = client.list_features(ListParams::new(limit, offset)).await?;
            print_json(&page)?;
        }
        Commands::Get { id } => {
            let client = build_client(&config)?;
            let feature: Value = client.get_feature(&id).await?;
            print_json(&feature)?;
        }
        Commands::Create { data } => {
            let body = read_json_arg(&data).context("Invalid feature JSON")?;
            let client = build_client(&config)?;
            let created: Value = client.create_feature(&body).await?;
            print_json(&created)?;
        }
        Commands::Update { id, data } => {
            let body = read_json_arg(&data).context("Invalid feature JSON")?;
            let client = build_client(&config)?;
            let updated: Value = client.update_feature(&id, &body).await?;
            print_json(&updated)?;
        }
        Commands::Delete { id } => {
            let client = build_client(&config)?;
            let deleted: Value = client.delete_feature(&id).await?;
            print_json(&deleted)?;
        }
        Commands::Serve {
            bind,
            port,
            prefix,
            seed,
        } => {
            if let Some(bind) = bind {
                config.server.bind_address = bind;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(prefix) = prefix {
                config.server.path_prefix = prefix;
            }
            if seed.is_some() {
                config.server.seed_file = seed;
            }
            config.validate()?;

            info!("Starting features dev server...");
            FeatureServer::new(config.server).run().await?;
        }
        Commands::Config { output, force } => {
            generate_config(&output, force)?;
        }
        Commands::Validate { file } => {
            validate_config(&file)?;
        }
        Commands::Info => {
            show_info(&config, &mut std::io::stdout().lock())?;
        }
    }

    Ok(())
}

/// Load the config file, or defaults when none is given
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Loading configuration from {}", path.display())),
        None => Ok(Config::default()),
    }
}

/// Apply CLI flags that apply to every subcommand
fn apply_global_overrides(config: &mut Config, cli: &Cli) {
    if let Some(ref base_url) = cli.base_url {
        config.client.base_url = base_url.clone();
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
}

fn build_client(config: &Config) -> anyhow::Result<FeatureClient> {
    FeatureClient::from_config(&config.client)
        .with_context(|| format!("Creating client for {}", config.client.base_url))
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Generate a default configuration file
fn generate_config(output: &Path, force: bool) -> anyhow::Result<()> {
    if output.exists() && !force {
        bail!(
            "Configuration file already exists: {} (use --force to overwrite)",
            output.display()
        );
    }

    Config::default().to_file(output)?;

    info!("Generated configuration file: {}", output.display());
    Ok(())
}

/// Validate a configuration file
fn validate_config(file: &Path) -> anyhow::Result<()> {
    info!("Validating configuration file: {}", file.display());

    let config = Config::from_file(file)?;
    config.validate()?;

    info!("Configuration file is valid");
    Ok(())
}

/// Write client information to `out`
fn show_info(config: &Config, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "Feature Client")?;
    writeln!(out, "Version: {}", feature_client::CLIENT_VERSION)?;
    writeln!(out, "Description: {}", env!("CARGO_PKG_DESCRIPTION"))?;
    writeln!(out, "Base URL: {}", config.client.base_url)?;
    writeln!(out, "--------------------------------")?;
    writeln!(out, "Operations:")?;
    writeln!(out, "  - list    GET    /features?limit=&offset=")?;
    writeln!(out, "  - get     GET    /features/{{id}}")?;
    writeln!(out, "  - create  POST   /features")?;
    writeln!(out, "  - update  PUT    /features/{{id}}")?;
    writeln!(out, "  - delete  DELETE /features/{{id}}")?;
    writeln!(out, "--------------------------------")?;
    writeln!(out, "Repository: {}", env!("CARGO_PKG_REPOSITORY"))
}
