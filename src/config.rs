use crate::error::Error;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub instance_url: String,
    pub api_key: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("journal-tasks").join("config.toml"))
}

impl Config {
    /// Environment variables win; otherwise fall back to
    /// ~/.config/journal-tasks/config.toml.
    pub fn load() -> Result<Config, Error> {
        dotenv::dotenv().ok();

        if let (Ok(instance_url), Ok(api_key)) = (env::var("INSTANCE_URL"), env::var("API_KEY")) {
            return Ok(Config {
                instance_url,
                api_key,
                timezone: env::var("CLIENT_TIMEZONE").unwrap_or_else(|_| default_timezone()),
            });
        }

        let path = config_path()
            .ok_or_else(|| Error::Config("could not locate a config directory".to_string()))?;
        let raw = fs::read_to_string(&path).map_err(|e| {
            Error::Config(format!(
                "set INSTANCE_URL and API_KEY or create {}: {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&raw).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }
}
