use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;
pub mod exit_codes;

use commands::{dispatch, Command};

#[derive(Parser, Debug)]
#[command(
    name = "message-signing",
    version,
    about = "Sign and verify message payloads"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    std::process::exit(dispatch(cli.command));
}
