//! Application configuration.
//!
//! Values are layered: built-in defaults, then the TOML file under the user's
//! config directory, then `TCPLINK_*` environment variables
//! (`TCPLINK_ENDPOINT__HOST`, `TCPLINK_ENDPOINT__PORT`,
//! `TCPLINK_POLL_INTERVAL_MS`).

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::{models::Endpoint, session::DEFAULT_POLL_INTERVAL};

/// Directory under the platform config dir holding `config.toml`.
pub const CONFIG_DIR: &str = "tcplink";

const CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "TCPLINK";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 9000;

const DEFAULT_CONFIG: &str = r#"# tcplink configuration

# Remote endpoint supervised by the session.
[endpoint]
host = "127.0.0.1"
port = 9000

# Cadence of the background receive loop, in milliseconds.
poll_interval_ms = 100
"#;

/// Runtime settings for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Endpoint of the one connection this process supervises.
    pub endpoint: Endpoint,
    /// Background receive cadence in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::new(DEFAULT_HOST, DEFAULT_PORT),
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
        }
    }
}

impl AppConfig {
    /// Load from the default config file and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load from `path` (optional on disk) and the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with(path.as_ref(), environment())
    }

    fn load_with(path: &Path, env: Environment) -> Result<Self> {
        let defaults = Self::default();
        let settings = Config::builder()
            .set_default("endpoint.host", defaults.endpoint.host)?
            .set_default("endpoint.port", i64::from(defaults.endpoint.port))?
            .set_default("poll_interval_ms", defaults.poll_interval_ms as i64)?
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(env)
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;

        let config: Self = settings
            .try_deserialize()
            .with_context(|| format!("invalid config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Poll cadence as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.endpoint.host.trim().is_empty() {
            bail!("endpoint.host must not be empty");
        }
        if self.poll_interval_ms == 0 {
            bail!("poll_interval_ms must be greater than zero");
        }
        Ok(())
    }
}

/// Location of the user's config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

/// Write the commented default config file if none exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    write_default_config(&path)?;
    Ok(path)
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write default config {}", path.display()))
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use tempfile::tempdir;

    fn env_from(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        environment().source(Some(source))
    }

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_with(&dir.path().join("absent.toml"), env_from(&[]))?;
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
        Ok(())
    }

    #[test]
    fn default_file_matches_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_DIR).join(CONFIG_FILE);
        write_default_config(&path)?;
        assert!(path.exists());

        let config = AppConfig::load_with(&path, env_from(&[]))?;
        assert_eq!(config, AppConfig::default());
        Ok(())
    }

    #[test]
    fn existing_file_is_not_overwritten() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "poll_interval_ms = 250\n")?;

        write_default_config(&path)?;
        assert_eq!(fs::read_to_string(&path)?, "poll_interval_ms = 250\n");
        Ok(())
    }

    #[test]
    fn file_overrides_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            "poll_interval_ms = 250\n[endpoint]\nhost = \"10.0.0.2\"\nport = 7000\n",
        )?;

        let config = AppConfig::load_with(&path, env_from(&[]))?;
        assert_eq!(config.endpoint, Endpoint::new("10.0.0.2", 7000));
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        Ok(())
    }

    #[test]
    fn environment_overrides_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[endpoint]\nhost = \"10.0.0.2\"\nport = 7000\n")?;

        let config = AppConfig::load_with(
            &path,
            env_from(&[
                ("TCPLINK_ENDPOINT__PORT", "7100"),
                ("TCPLINK_POLL_INTERVAL_MS", "20"),
            ]),
        )?;
        assert_eq!(config.endpoint, Endpoint::new("10.0.0.2", 7100));
        assert_eq!(config.poll_interval_ms, 20);
        Ok(())
    }

    #[test]
    fn zero_interval_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "poll_interval_ms = 0\n")?;

        assert!(AppConfig::load_with(&path, env_from(&[])).is_err());
        Ok(())
    }
}
