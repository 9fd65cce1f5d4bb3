use crate::config::{resolve_config, GeneratorConfig, TOKEN_ENV};
use crate::fetch::AdminClient;
use crate::generator::{generate_object_block, generate_product_block, Outcome, RunOptions, SkipReason};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Command-line interface for the metablock generator
///
/// Generates Liquid theme blocks from the metafield and metaobject
/// definitions of a Shopify store.
#[derive(Parser)]
#[command(name = "metablock-gen", version)]
#[command(about = "Generate Shopify theme blocks from metafield definitions", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate the product metafields block
    Generate {
        #[command(flatten)]
        run: RunArgs,
    },
    /// Generate a standalone block for one metaobject type
    ObjectBlock {
        /// Metaobject type, also the key of the referencing product metafield
        #[arg(long = "type", default_value = "fin_characteristics")]
        object_type: String,

        #[command(flatten)]
        run: RunArgs,
    },
    /// Print the effective configuration as TOML
    PrintConfig {
        /// Path to the configuration file (default: ./metablock.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Connection and output options shared by the generating commands
#[derive(Args, Clone, Default)]
pub struct RunArgs {
    /// Admin API access token
    #[arg(long, env = TOKEN_ENV, hide_env_values = true)]
    pub token: Option<String>,

    /// Shop domain, e.g. example.myshopify.com
    #[arg(long)]
    pub shop: Option<String>,

    /// Admin API version, e.g. 2024-01
    #[arg(long)]
    pub api_version: Option<String>,

    /// Full GraphQL endpoint URL; overrides --shop and --api-version
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Block file to write
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to the configuration file (default: ./metablock.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the block to stdout instead of writing it
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

impl RunArgs {
    /// Load the configuration and apply flag overrides
    fn load_config(&self) -> anyhow::Result<GeneratorConfig> {
        let mut config = load_config(self.config.as_ref())?;
        if let Some(shop) = &self.shop {
            config.shop = shop.clone();
        }
        if let Some(api_version) = &self.api_version {
            config.api_version = api_version.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = Some(endpoint.clone());
        }
        Ok(config)
    }

    /// Non-blank token, if any
    fn token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    fn options(&self, default_output: PathBuf) -> RunOptions {
        let mut options = RunOptions::new(self.output.clone().unwrap_or(default_output));
        options.dry_run = self.dry_run;
        options
    }

    fn client(&self, config: &GeneratorConfig, token: &str) -> anyhow::Result<AdminClient> {
        let endpoint = config.endpoint_url()?;
        info!(endpoint = %endpoint, "querying admin api");
        let client = AdminClient::new(endpoint, token, Duration::from_secs(config.timeout_secs))
            .context("Failed to create HTTP client")?;
        Ok(client)
    }
}

fn load_config(explicit: Option<&PathBuf>) -> anyhow::Result<GeneratorConfig> {
    let dir = std::env::current_dir().context("Failed to read working directory")?;
    resolve_config(explicit.map(PathBuf::as_path), &dir)
}

/// Run a parsed command line
///
/// A missing token is not an error: the run is skipped before the
/// configuration is read or any request is made, so build environments
/// without credentials keep working.
///
/// # Errors
///
/// Returns an error if configuration loading, fetching, rendering or writing fails.
pub fn run_cli(cli: &Cli) -> anyhow::Result<Outcome> {
    match &cli.command {
        Commands::Generate { run } => {
            let Some(token) = run.token() else {
                return Ok(Outcome::Skipped(SkipReason::MissingCredential));
            };
            let config = run.load_config()?;
            let client = run.client(&config, token)?;
            let options = run.options(config.output.clone());
            generate_product_block(&client, &config, &options)
        }
        Commands::ObjectBlock { object_type, run } => {
            let Some(token) = run.token() else {
                return Ok(Outcome::Skipped(SkipReason::MissingCredential));
            };
            let config = run.load_config()?;
            let client = run.client(&config, token)?;
            let options = run.options(GeneratorConfig::object_block_output(object_type));
            generate_object_block(&client, &config, object_type, &options)
        }
        Commands::PrintConfig { config } => {
            let config = load_config(config.as_ref())?;
            let rendered =
                toml::to_string_pretty(&config).context("Failed to serialize configuration")?;
            print!("{rendered}");
            Ok(Outcome::Printed)
        }
    }
}
