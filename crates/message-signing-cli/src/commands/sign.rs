//! `message-signing sign` - Sign a payload file.

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;

use message_signing::{MessageSigner, SigningConfig};

use super::error_exit_code;
use crate::exit_codes;

#[derive(Args, Debug)]
pub struct SignArgs {
    /// Payload file (raw envelope bytes)
    pub input: PathBuf,

    /// Signing configuration (YAML)
    #[arg(long, short)]
    pub config: PathBuf,

    /// Private key file (PEM), overrides the configured key
    #[arg(long, short)]
    pub key: Option<PathBuf>,

    /// Write the base64 signature here instead of stdout
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

pub fn cmd_sign(args: SignArgs) -> i32 {
    match run_sign(args) {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            error_exit_code(&e)
        }
    }
}

fn run_sign(args: SignArgs) -> Result<()> {
    // Load config; --key overrides the configured signing key
    let mut config = SigningConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config: {}", args.config.display()))?;
    if let Some(key) = args.key {
        config = config.with_private_key(key);
    }

    let signer = MessageSigner::from_config(&config)?;

    // Load payload
    let payload = fs::read(&args.input)
        .with_context(|| format!("failed to read payload: {}", args.input.display()))?;
    tracing::debug!(input = %args.input.display(), len = payload.len(), "signing payload");

    let Some(signature) = signer.sign(&payload)? else {
        eprintln!(
            "message signing is disabled in {}; nothing signed",
            args.config.display()
        );
        return Ok(());
    };

    // Emit base64 signature
    let encoded = signature.to_base64();
    match args.out {
        Some(out) => {
            fs::write(&out, format!("{encoded}\n"))
                .with_context(|| format!("failed to write signature: {}", out.display()))?;
            eprintln!("Signed {} -> {}", args.input.display(), out.display());
        }
        None => println!("{encoded}"),
    }

    Ok(())
}
