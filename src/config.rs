// Client configuration. The base URL of the semantic container is injected
// here rather than hardcoded, so the tools can be pointed at any instance
// (including a mock server in tests).
//
// Sources, lowest priority first: built-in default, TOML config file,
// `SEMCON_URL` / `--url` (both handled by clap in `cli`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

pub const DEFAULT_URL: &str = "http://localhost:3000/api/data";

/// Path of the OAuth token endpoint, resolved against the base URL's origin.
pub const TOKEN_PATH: &str = "/oauth/token";

/// On-disk representation of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Data endpoint. GET lists records, POST creates one.
    pub base_url: Url,
    /// Request deadline. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: Url::parse(DEFAULT_URL).expect("default URL is valid"),
            timeout: None,
        }
    }
}

impl Config {
    /// Config for a given base URL with no timeout.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Config {
            base_url: parse_base_url(base_url)?,
            timeout: None,
        })
    }

    /// Load the config file and apply a URL override on top.
    ///
    /// An explicit `path` must exist. Without one, `~/.semcon/config.toml`
    /// is read when present and silently skipped otherwise.
    pub fn load(path: Option<&Path>, url_override: Option<&str>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => read_config_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => read_config_file(&path)?,
                _ => ConfigFile::default(),
            },
        };

        let url = url_override
            .map(str::to_owned)
            .or(file.url)
            .unwrap_or_else(|| DEFAULT_URL.to_owned());

        Ok(Config {
            base_url: parse_base_url(&url)?,
            timeout: file.timeout_secs.map(Duration::from_secs),
        })
    }

    /// The OAuth endpoint: same scheme and authority as the base URL, with
    /// the path replaced by `/oauth/token`.
    pub fn token_url(&self) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(TOKEN_PATH);
        url.set_query(None);
        url.set_fragment(None);
        url
    }
}

/// `~/.semcon/config.toml`, if a home directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".semcon").join("config.toml"))
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    debug!("Loading config from {:?}", path);
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl {
            url: raw.to_owned(),
            reason: format!("unsupported scheme {other:?}"),
        }),
    }
}
