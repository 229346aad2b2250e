//! Subcommands.

pub mod keygen;
pub mod sign;
pub mod verify;

use clap::Subcommand;
use message_signing::SignerError;

use crate::exit_codes;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a key pair
    Keygen(keygen::KeygenArgs),

    /// Sign a payload file
    Sign(sign::SignArgs),

    /// Verify a payload file against a signature
    Verify(verify::VerifyArgs),
}

pub fn dispatch(command: Command) -> i32 {
    match command {
        Command::Keygen(args) => keygen::cmd_keygen(args),
        Command::Sign(args) => sign::cmd_sign(args),
        Command::Verify(args) => verify::cmd_verify(args),
    }
}

/// Exit code for a failed command.
fn error_exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<SignerError>()
        .map_or(exit_codes::ERROR, SignerError::exit_code)
}
