//! Command-line arguments and configuration resolution.

use clap::Parser;
use config::{Config, ConfigOverrides, load_from_env, load_from_file, merge_configs, validate};
use errors::ConfigurationError;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "mindnote")]
#[command(about = "Emotion analysis, task suggestions and insight summaries over HTTP")]
#[command(version)]
pub struct Args {
    /// Configuration file (TOML or YAML)
    #[arg(short, long, env = "MN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "MN_HOST")]
    pub host: Option<String>,

    /// Port to bind
    #[arg(short, long, env = "MN_PORT")]
    pub port: Option<u16>,
}

impl Args {
    fn overrides(&self) -> Option<ConfigOverrides> {
        if self.host.is_none() && self.port.is_none() {
            return None;
        }
        let mut overrides = ConfigOverrides::default();
        overrides.server.host = self.host.clone();
        overrides.server.port = self.port;
        Some(overrides)
    }
}

/// Defaults, then the config file, then the environment, then flags.
/// The merged result must pass validation.
pub fn resolve_config(args: &Args) -> Result<Config, ConfigurationError> {
    let file_config = match &args.config {
        Some(path) => load_from_file(path).map_err(|e| e.into_configuration_error(path))?,
        None => Config::default(),
    };
    let env_overrides = load_from_env()?;

    let config = merge_configs(
        file_config,
        "file",
        env_overrides,
        "env",
        args.overrides(),
        "cli",
    );
    validate(&config)?;
    Ok(config)
}
