// Writer: load an executable and its two input files from disk and upload
// them to the semantic container as a single record.

use std::path::Path;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::SemconClient;
use crate::auth::{Credentials, Scope};
use crate::error::{Result, SemconError};

/// Record layout expected by the container's upload endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UploadRecord {
    pub executable: String,
    pub input_file0: String,
    pub input_file1: String,
}

impl UploadRecord {
    /// Read the three files fully into memory. The first unreadable file
    /// aborts the whole upload.
    pub fn from_files(executable: &Path, input1: &Path, input2: &Path) -> Result<Self> {
        Ok(UploadRecord {
            executable: read_text(executable)?,
            input_file0: read_text(input1)?,
            input_file1: read_text(input2)?,
        })
    }
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| SemconError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Upload `record` with a write-scoped token (when credentials are given).
pub fn write_record(
    client: &SemconClient,
    record: &UploadRecord,
    credentials: Option<&Credentials>,
) -> Result<StatusCode> {
    let token = client.acquire_token(credentials, Scope::Write)?;
    let status = client.upload(record, token.as_ref())?;
    info!(%status, "record uploaded");
    Ok(status)
}
