// Library root
// -----------
// Shared code behind the `read-semcon`, `write-semcon` and `create-red`
// binaries. Each binary is a thin wrapper: parse arguments, build a
// `SemconClient`, call one function from here, print the result.
//
// Module responsibilities:
// - `api`: the blocking HTTP client (token exchange, record listing,
//   record upload).
// - `auth`: credentials, scopes, access tokens and the bearer header.
// - `config`: base URL and timeout resolution.
// - `reader` / `writer`: the read and upload flows.
// - `red`: RED experiment documents for a CC-Agency.
// - `cli`: clap argument groups, logging setup, exit codes.
// - `ui`: spinner and content rendering.
pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod reader;
pub mod red;
pub mod ui;
pub mod writer;

pub use api::SemconClient;
pub use auth::{AccessToken, Credentials, Scope};
pub use config::Config;
pub use error::{ContentError, SemconError};
