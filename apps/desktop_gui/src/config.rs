//! Startup configuration: defaults, then `lookup.toml` (or `--config`), then
//! `LOOKUP__*` environment variables, then command-line flags.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use config::{Config, Environment, File, Map};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "lookup.toml";
pub const DEFAULT_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const DEFAULT_TILE_ATTRIBUTION: &str = "© OpenStreetMap contributors";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "desktop_gui", about = "Find your Seattle council member")]
pub struct CliArgs {
    /// Base URL of the representative lookup service.
    #[arg(long)]
    pub server_url: Option<String>,

    /// Basemap tile URL template with `{z}`, `{x}` and `{y}` placeholders.
    #[arg(long = "tile-url")]
    pub tile_url_template: Option<String>,

    /// Configuration file to use instead of `./lookup.toml`.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Tracing filter directive, e.g. `desktop_gui=debug`.
    #[arg(long)]
    pub log_filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StartupConfig {
    pub server_url: String,
    pub tile_url_template: String,
    pub tile_attribution: String,
    pub log_filter: String,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            server_url: client_core::DEFAULT_SERVER_URL.to_string(),
            tile_url_template: DEFAULT_TILE_URL.to_string(),
            tile_attribution: DEFAULT_TILE_ATTRIBUTION.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl StartupConfig {
    fn apply_cli_overrides(&mut self, cli: &CliArgs) {
        if let Some(server_url) = &cli.server_url {
            self.server_url = server_url.clone();
        }
        if let Some(template) = &cli.tile_url_template {
            self.tile_url_template = template.clone();
        }
        if let Some(filter) = &cli.log_filter {
            self.log_filter = filter.clone();
        }
    }

    fn validate(&self) -> Result<()> {
        client_core::resolve_endpoint(&self.server_url)?;
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !self.tile_url_template.contains(placeholder) {
                return Err(anyhow!(
                    "tile url template '{}' is missing the {placeholder} placeholder",
                    self.tile_url_template
                ));
            }
        }
        Ok(())
    }
}

pub fn load_startup_config(cli: &CliArgs) -> Result<StartupConfig> {
    load_with_env(cli, None)
}

fn load_with_env(cli: &CliArgs, env: Option<Map<String, String>>) -> Result<StartupConfig> {
    let mut startup: StartupConfig = build_config(cli, env)?
        .try_deserialize()
        .context("failed to deserialize configuration")?;
    startup.apply_cli_overrides(cli);
    startup.validate()?;
    Ok(startup)
}

fn build_config(cli: &CliArgs, env: Option<Map<String, String>>) -> Result<Config> {
    let defaults = StartupConfig::default();
    let mut builder = Config::builder()
        .set_default("server_url", defaults.server_url)?
        .set_default("tile_url_template", defaults.tile_url_template)?
        .set_default("tile_attribution", defaults.tile_attribution)?
        .set_default("log_filter", defaults.log_filter)?;

    builder = match &cli.config {
        Some(path) => builder.add_source(File::from(path.clone()).required(true)),
        None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
    };

    builder = builder.add_source(
        Environment::with_prefix("LOOKUP")
            .prefix_separator("__")
            .separator("__")
            .source(env),
    );

    builder
        .build()
        .context("failed to load startup configuration")
}
