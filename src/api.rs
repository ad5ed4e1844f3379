// API client module: a small blocking HTTP client that talks to a
// semantic container. It knows three calls: the OAuth token exchange, the
// record listing (GET on the base URL) and the record upload (POST on the
// base URL). Each call is made once, with no retry.

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::auth::{bearer_headers, AccessToken, Credentials, Scope, TokenRequest, TokenResponse};
use crate::config::Config;
use crate::error::{Result, SemconError};

/// Holds a reqwest blocking client plus the resolved endpoints of one
/// semantic container.
#[derive(Clone, Debug)]
pub struct SemconClient {
    client: Client,
    base_url: Url,
    token_url: Url,
}

impl SemconClient {
    /// Build a client for the container described by `config`.
    pub fn new(config: &Config) -> Result<Self> {
        // The blocking client defaults to a 30s deadline; only set one when
        // the config asks for it.
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| SemconError::Transport {
                url: config.base_url.to_string(),
                source,
            })?;
        Ok(SemconClient {
            client,
            base_url: config.base_url.clone(),
            token_url: config.token_url(),
        })
    }

    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    /// Exchange client credentials for a token of the given scope.
    ///
    /// Without credentials no request is made and `None` is returned. A
    /// reply that lacks `access_token` also yields `None`: the caller then
    /// proceeds anonymously.
    pub fn acquire_token(
        &self,
        credentials: Option<&Credentials>,
        scope: Scope,
    ) -> Result<Option<AccessToken>> {
        let Some(credentials) = credentials else {
            debug!("no credentials given, skipping token exchange");
            return Ok(None);
        };

        info!(client_id = %credentials.client_id, %scope, "requesting access token");
        let body = TokenRequest::client_credentials(credentials, scope);
        let res = send("POST", &self.token_url, self.client.post(self.token_url.clone()).json(&body))?;
        let reply: TokenResponse = decode(&self.token_url, res)?;

        match reply.access_token {
            Some(token) => Ok(Some(AccessToken::new(token))),
            None => {
                warn!(
                    url = %self.token_url,
                    "token response has no access_token, continuing without authorization"
                );
                Ok(None)
            }
        }
    }

    /// GET the record listing and return the raw JSON body.
    pub fn fetch_records(&self, token: Option<&AccessToken>) -> Result<Value> {
        let req = self
            .client
            .get(self.base_url.clone())
            .headers(bearer_headers(token)?);
        let res = send("GET", &self.base_url, req)?;
        decode(&self.base_url, res)
    }

    /// POST `record` as JSON to the data endpoint and return the status.
    pub fn upload<T: Serialize + ?Sized>(
        &self,
        record: &T,
        token: Option<&AccessToken>,
    ) -> Result<StatusCode> {
        let req = self
            .client
            .post(self.base_url.clone())
            .headers(bearer_headers(token)?)
            .json(record);
        let res = send("POST", &self.base_url, req)?;
        Ok(res.status())
    }
}

/// Send a request and turn transport failures and non-2xx statuses into
/// errors. Client and server errors are treated alike.
pub(crate) fn send(method: &'static str, url: &Url, req: RequestBuilder) -> Result<Response> {
    let res = req.send().map_err(|source| SemconError::Transport {
        url: url.to_string(),
        source,
    })?;
    let status = res.status();
    debug!(method, %url, %status, "response received");
    if !status.is_success() {
        let body = res.text().unwrap_or_default();
        return Err(SemconError::Status {
            method,
            url: url.to_string(),
            status,
            body: truncate_body(body.trim()),
        });
    }
    Ok(res)
}

/// Error bodies can be whole HTML pages; keep the start of them.
fn truncate_body(body: &str) -> String {
    const MAX_CHARS: usize = 512;
    match body.char_indices().nth(MAX_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_owned(),
    }
}

pub(crate) fn decode<T: serde::de::DeserializeOwned>(url: &Url, res: Response) -> Result<T> {
    res.json().map_err(|source| SemconError::Decode {
        url: url.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> SemconClient {
        let config = Config::new(&server.url("/api/data")).unwrap();
        SemconClient::new(&config).unwrap()
    }

    #[test]
    fn anonymous_access_skips_token_exchange() {
        let server = MockServer::start();
        let token_mock = server.mock(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(200).json_body(json!({"access_token": "never"}));
        });

        let client = client_for(&server);
        let creds = Credentials::from_parts(Some("app".into()), None);
        let token = client.acquire_token(creds.as_ref(), Scope::Read).unwrap();

        assert_eq!(token, None);
        token_mock.assert_calls(0);
    }

    #[test]
    fn token_exchange_sends_client_credentials_grant() {
        let server = MockServer::start();
        let token_mock = server.mock(|when, then| {
            when.method(POST).path("/oauth/token").json_body(json!({
                "client_id": "app",
                "client_secret": "secret",
                "grant_type": "client_credentials",
                "scope": "read",
            }));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"access_token": "tok-123", "token_type": "Bearer"}));
        });

        let client = client_for(&server);
        let creds = Credentials::new("app", "secret");
        let token = client.acquire_token(Some(&creds), Scope::Read).unwrap();

        assert_eq!(token, Some(AccessToken::new("tok-123")));
        token_mock.assert_calls(1);
    }

    #[test]
    fn missing_access_token_degrades_to_anonymous() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(200).json_body(json!({"token_type": "Bearer"}));
        });

        let client = client_for(&server);
        let creds = Credentials::new("app", "secret");
        assert_eq!(client.acquire_token(Some(&creds), Scope::Write).unwrap(), None);
    }

    #[test]
    fn rejected_token_exchange_is_fatal() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(401).body("invalid_client");
        });

        let client = client_for(&server);
        let creds = Credentials::new("app", "wrong");
        let err = client.acquire_token(Some(&creds), Scope::Read).unwrap_err();
        assert!(matches!(
            &err,
            SemconError::Status { status, body, .. }
                if *status == StatusCode::UNAUTHORIZED && body == "invalid_client"
        ));
        assert!(err.to_string().contains("invalid_client"));
    }

    #[test]
    fn fetch_records_forwards_bearer_token() {
        let server = MockServer::start();
        let data_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/data")
                .header("authorization", "Bearer tok-9");
            then.status(200).json_body(json!({"data": [{"content": 1}]}));
        });

        let client = client_for(&server);
        let body = client.fetch_records(Some(&AccessToken::new("tok-9"))).unwrap();

        assert_eq!(body, json!({"data": [{"content": 1}]}));
        data_mock.assert_calls(1);
    }

    #[test]
    fn fetch_records_reports_server_errors() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/data");
            then.status(503);
        });

        let client = client_for(&server);
        assert!(matches!(
            client.fetch_records(None).unwrap_err(),
            SemconError::Status { method: "GET", status, .. } if status == StatusCode::SERVICE_UNAVAILABLE
        ));
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let long = "x".repeat(2000);
        let cut = truncate_body(&long);
        assert_eq!(cut.len(), 512 + 3);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn fetch_records_rejects_non_json_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/data");
            then.status(200).body("<html>not json</html>");
        });

        let client = client_for(&server);
        assert!(matches!(
            client.fetch_records(None).unwrap_err(),
            SemconError::Decode { .. }
        ));
    }

    #[test]
    fn upload_returns_status() {
        let server = MockServer::start();
        let upload_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/data")
                .json_body(json!({"executable": "x"}));
            then.status(201);
        });

        let client = client_for(&server);
        let status = client.upload(&json!({"executable": "x"}), None).unwrap();

        assert_eq!(status, StatusCode::CREATED);
        upload_mock.assert_calls(1);
    }

    #[test]
    fn unreachable_server_is_a_transport_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let config = Config::new(&format!("http://127.0.0.1:{port}/api/data")).unwrap();
        let client = SemconClient::new(&config).unwrap();
        assert!(matches!(
            client.fetch_records(None).unwrap_err(),
            SemconError::Transport { .. }
        ));
    }
}
