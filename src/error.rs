// Error types shared by the library. Every network call and file read
// returns one of these so the binaries can pick exit codes and messages
// themselves instead of leaking transport details.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Reasons the Reader rejects a response body. The `Display` text is what
/// the user sees on stdout before the process exits with status 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("No data key in response")]
    MissingData,
    #[error("data in response is not a list")]
    MalformedData,
    #[error("Empty data in response")]
    EmptyData,
    #[error("no content key in data")]
    MissingContent,
}

/// Problems loading or validating the client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[derive(Debug, Error)]
pub enum SemconError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} {url} returned {status}{}", body_suffix(.body))]
    Status {
        method: &'static str,
        url: String,
        status: StatusCode,
        /// Response body text, so rejections can explain themselves.
        body: String,
    },
    #[error("response from {url} is not valid JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    InvalidRequest(String),
}

impl SemconError {
    /// Process exit status for this failure: 1 for a rejected response body,
    /// 2 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            SemconError::Content(_) => 1,
            _ => 2,
        }
    }
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(" - {body}")
    }
}

pub type Result<T, E = SemconError> = std::result::Result<T, E>;
