// Entrypoint for `create-red`: build a RED experiment document whose
// executable, inputs and outputs live in a semantic container, and either
// print it (`--dry-run`) or submit it to a CC-Agency.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use reqwest::blocking::Client;
use semcon_usage::auth::Credentials;
use semcon_usage::cli::{self, ConnectionArgs};
use semcon_usage::red::{self, Agency, OutputSpec, ProgramType};
use semcon_usage::ui;

/// Create a RED experiment for a CC-Agency from semantic container data
#[derive(Parser)]
#[command(name = "create-red", version, about, long_about = None)]
struct Cli {
    /// Interpreter for the executable: python or bash
    #[arg(long, default_value = "python")]
    program_type: ProgramType,

    /// Where the executable is stored (default: the container URL, with a
    /// loopback host replaced by this machine's address)
    #[arg(long)]
    executable_url: Option<String>,

    /// Where an input file is stored; repeat for several inputs
    /// (default: two inputs at the container URL)
    #[arg(long = "input-url", value_name = "URL")]
    input_urls: Vec<String>,

    /// Output to collect, as GLOB=URL; repeat for several outputs
    /// (default: output.txt stored at the container URL)
    #[arg(long = "output", value_name = "GLOB=URL")]
    outputs: Vec<OutputSpec>,

    /// CC-Agency base URL
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    agency_url: String,

    /// CC-Agency user the experiment is submitted as
    #[arg(long, env = "AGENCY_USER", default_value = "agency_user")]
    agency_user: String,

    /// Password of the CC-Agency user
    #[arg(
        long,
        env = "AGENCY_PASSWORD",
        hide_env_values = true,
        default_value = "agency_password"
    )]
    agency_password: String,

    /// Semantic container client id handed to the connectors
    #[arg(long, env = "APP_KEY")]
    username: Option<String>,

    /// Semantic container client secret handed to the connectors
    #[arg(long, env = "APP_SECRET", hide_env_values = true)]
    password: Option<String>,

    /// Print the document instead of submitting it
    #[arg(long)]
    dry_run: bool,

    #[command(flatten)]
    connection: ConnectionArgs,
}

fn main() -> ExitCode {
    let args = Cli::parse();
    cli::init_tracing(args.connection.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => cli::report(&err),
    }
}

fn run(args: Cli) -> Result<()> {
    let config = args.connection.load_config()?;

    // Only defaulted URLs are rewritten for the agency's containers;
    // explicit ones are used as given.
    let needs_default =
        args.executable_url.is_none() || args.input_urls.is_empty() || args.outputs.is_empty();
    let data_url = if needs_default {
        red::container_reachable_url(&config.base_url)?.to_string()
    } else {
        String::new()
    };

    let executable_url = args.executable_url.unwrap_or_else(|| data_url.clone());
    let input_urls = if args.input_urls.is_empty() {
        vec![data_url.clone(), data_url.clone()]
    } else {
        args.input_urls
    };
    let outputs = if args.outputs.is_empty() {
        vec![OutputSpec {
            glob: "output.txt".into(),
            url: data_url,
        }]
    } else {
        args.outputs
    };
    let agency = Agency {
        url: args.agency_url,
        username: args.agency_user,
        password: args.agency_password,
    };
    let semcon = Credentials::from_parts(args.username, args.password);

    let document = red::create_red(
        args.program_type,
        &executable_url,
        &input_urls,
        &outputs,
        &agency,
        semcon.as_ref(),
    );

    if args.dry_run {
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    let client = Client::builder()
        .timeout(config.timeout)
        .build()
        .context("Failed to build HTTP client")?;
    let reply = ui::with_spinner("Submitting experiment...", || red::submit(&client, &document))?;
    println!("{}", ui::render_content(&reply));
    Ok(())
}
