use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{DeadlineError, Result};

/// Environment variable that overrides the API base URL from the config file.
pub const URL_ENV: &str = "DEADLINES_URL";

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiConfig {
    /// Base URL the `api/deadline/...` paths are appended to.
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct LogConfig {
    /// Filter directive such as `info` or `deadlines=debug`.
    pub level: Option<String>,
}

impl Config {
    /// Loads the config from `path`, or from the default location when
    /// `path` is `None`.
    ///
    /// A missing file yields the defaults. A file that cannot be read or
    /// parsed is an error naming the path; callers fall back to the defaults
    /// and report it once logging is up.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path.map(Path::to_path_buf).or_else(default_path) else {
            return Ok(Config::default());
        };
        if !path.exists() {
            return Ok(Config::default());
        }
        Self::from_file(&path)
            .map_err(|e| DeadlineError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| DeadlineError::Config(e.to_string()))
    }

    /// Picks the base URL: explicit flag, then `DEADLINES_URL`, then the file.
    pub fn resolve_base_url(&self, flag: Option<&str>) -> Result<String> {
        let from_env = std::env::var(URL_ENV).ok();
        self.resolve_base_url_with(flag, from_env.as_deref())
    }

    pub fn resolve_base_url_with(&self, flag: Option<&str>, env: Option<&str>) -> Result<String> {
        flag.or(env)
            .or(self.api.base_url.as_deref())
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                DeadlineError::Config(format!(
                    "no API base URL configured; pass --url, set {URL_ENV}, or add [api] base_url to the config file"
                ))
            })
    }
}

/// `<config dir>/deadlines/config.toml`, e.g. `~/.config/deadlines/config.toml` on Linux.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("deadlines").join("config.toml"))
}
