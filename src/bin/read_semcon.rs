// Entrypoint for `read-semcon`: print the content of the most recent record
// stored in a semantic container.
//
// Exit status: 0 on success, 1 when the response has no usable record,
// 2 for network, HTTP and configuration failures.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use semcon_usage::cli::{self, AuthArgs, ConnectionArgs};
use semcon_usage::{reader, ui};

/// Print the content of the latest record in a semantic container
#[derive(Parser)]
#[command(name = "read-semcon", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    auth: AuthArgs,

    #[command(flatten)]
    connection: ConnectionArgs,
}

fn main() -> ExitCode {
    let args = Cli::parse();
    cli::init_tracing(args.connection.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => cli::report(&err),
    }
}

fn run(args: &Cli) -> Result<()> {
    let client = args.connection.client()?;
    let credentials = args.auth.credentials();

    let content = ui::with_spinner("Fetching latest record...", || {
        reader::read_latest(&client, credentials.as_ref())
    })?;
    println!("{}", ui::render_content(&content));
    Ok(())
}
