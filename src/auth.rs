// OAuth2 client-credentials types: the optional credential pair, the
// requested scope, the request/response payloads of the token endpoint and
// the bearer header built from the resulting token.

use std::fmt;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SemconError};

/// Client identifier and secret. Callers hold an `Option<Credentials>`, so a
/// half-specified pair can never reach the token exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Credentials {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Combine two independently optional CLI values. Only a complete pair
    /// yields credentials; one value on its own counts as anonymous access.
    pub fn from_parts(client_id: Option<String>, client_secret: Option<String>) -> Option<Self> {
        match (client_id, client_secret) {
            (Some(id), Some(secret)) => Some(Credentials::new(id, secret)),
            _ => None,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// What the requested token is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Read,
    Write,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Read => "read",
            Scope::Write => "write",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque bearer token, fetched fresh for every invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        AccessToken(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// JSON body POSTed to the token endpoint.
#[derive(Serialize, Debug)]
pub struct TokenRequest<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub grant_type: &'static str,
    pub scope: Scope,
}

impl<'a> TokenRequest<'a> {
    pub fn client_credentials(credentials: &'a Credentials, scope: Scope) -> Self {
        TokenRequest {
            client_id: &credentials.client_id,
            client_secret: &credentials.client_secret,
            grant_type: "client_credentials",
            scope,
        }
    }
}

/// The only field we care about in the token endpoint's reply. A missing or
/// `null` value deserializes to `None`.
#[derive(Deserialize, Debug, Default)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Build the `Authorization: Bearer <token>` header map. Without a token the
/// map is empty and the request goes out unauthenticated.
pub fn bearer_headers(token: Option<&AccessToken>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
            .map_err(|_| {
                SemconError::InvalidRequest("access token contains invalid header characters".into())
            })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}
