// Reader: fetch the record listing and pull out the content of the most
// recent record.
//
// The container returns records oldest first and carries no timestamp we
// could sort on, so "most recent" means "last element". That policy lives
// in `select_latest` and nowhere else.

use serde_json::Value;
use tracing::debug;

use crate::api::SemconClient;
use crate::auth::{Credentials, Scope};
use crate::error::{ContentError, Result};

/// Pick the most recent record from a listing.
pub fn select_latest(records: &[Value]) -> Option<&Value> {
    records.last()
}

/// Validate a listing body and return the latest record's `content`.
///
/// Checks run in order and the first failure wins: `data` present, `data`
/// non-empty, `data` a list, `content` present in the latest record. A JSON
/// `null` counts as absent, and an empty object or string counts as empty.
pub fn extract_content(body: &Value) -> Result<&Value, ContentError> {
    let records = match body.get("data") {
        None | Some(Value::Null) => return Err(ContentError::MissingData),
        Some(Value::Array(records)) => records.as_slice(),
        Some(Value::Object(map)) if map.is_empty() => return Err(ContentError::EmptyData),
        Some(Value::String(text)) if text.is_empty() => return Err(ContentError::EmptyData),
        Some(_) => return Err(ContentError::MalformedData),
    };

    let latest = select_latest(records).ok_or(ContentError::EmptyData)?;
    match latest.get("content") {
        None | Some(Value::Null) => Err(ContentError::MissingContent),
        Some(content) => Ok(content),
    }
}

/// Fetch the listing with a read-scoped token (when credentials are given)
/// and return the latest record's content.
pub fn read_latest(client: &SemconClient, credentials: Option<&Credentials>) -> Result<Value> {
    let token = client.acquire_token(credentials, Scope::Read)?;
    let body = client.fetch_records(token.as_ref())?;
    let content = extract_content(&body)?;
    debug!("latest record content extracted");
    Ok(content.clone())
}
