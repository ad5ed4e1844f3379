// Pieces shared by the binaries: clap argument groups, logging setup and
// the mapping from errors to process exit codes.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use tracing_subscriber::EnvFilter;

use crate::api::SemconClient;
use crate::auth::Credentials;
use crate::config::Config;
use crate::error::SemconError;

/// `--username` / `--password`. Only meaningful together.
#[derive(Args, Debug, Clone, Default)]
pub struct AuthArgs {
    /// OAuth client id
    #[arg(long)]
    pub username: Option<String>,

    /// OAuth client secret
    #[arg(long)]
    pub password: Option<String>,
}

impl AuthArgs {
    pub fn credentials(&self) -> Option<Credentials> {
        Credentials::from_parts(self.username.clone(), self.password.clone())
    }
}

/// Where the semantic container lives and how chatty to be about it.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Data endpoint of the semantic container
    #[arg(long, env = "SEMCON_URL")]
    pub url: Option<String>,

    /// Config file (default: ~/.semcon/config.toml)
    #[arg(long, env = "SEMCON_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ConnectionArgs {
    pub fn load_config(&self) -> Result<Config, SemconError> {
        Ok(Config::load(self.config.as_deref(), self.url.as_deref())?)
    }

    pub fn client(&self) -> Result<SemconClient, SemconError> {
        SemconClient::new(&self.load_config()?)
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Exit status for a failure: 1 for a rejected response body, 2 otherwise.
pub fn exit_status(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<SemconError>()
        .map_or(2, SemconError::exit_code)
}

/// Print a failure and pick the exit code.
///
/// Rejected response bodies go to stdout, the same way the successful
/// output would. Everything else is reported on stderr with the full cause
/// chain.
pub fn report(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<SemconError>() {
        Some(SemconError::Content(content)) => println!("{content}"),
        _ => eprintln!("error: {err:#}"),
    }
    ExitCode::from(exit_status(err))
}
