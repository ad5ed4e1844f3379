// Entrypoint for `write-semcon`: upload an executable and two input files
// to a semantic container as one record, then print the HTTP status code.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use semcon_usage::cli::{self, AuthArgs, ConnectionArgs};
use semcon_usage::ui;
use semcon_usage::writer::{self, UploadRecord};

/// Upload an executable and its two input files to a semantic container
#[derive(Parser)]
#[command(name = "write-semcon", version, about, long_about = None)]
struct Cli {
    /// Program to store
    executable: PathBuf,

    /// First input file
    input1: PathBuf,

    /// Second input file
    input2: PathBuf,

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

    let record = UploadRecord::from_files(&args.executable, &args.input1, &args.input2)?;
    let status = ui::with_spinner("Uploading record...", || {
        writer::write_record(&client, &record, credentials.as_ref())
    })?;
    println!("{}", status.as_u16());
    Ok(())
}
