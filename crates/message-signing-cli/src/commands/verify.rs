//! `message-signing verify` - Verify a payload file against a signature.

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;

use message_signing::{MessageSigner, Signature, SigningConfig};

use super::error_exit_code;
use crate::exit_codes;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Payload file (raw envelope bytes)
    pub input: PathBuf,

    /// Signing configuration (YAML)
    #[arg(long, short)]
    pub config: PathBuf,

    /// Public key file (PEM), overrides the configured key
    #[arg(long)]
    pub pubkey: Option<PathBuf>,

    /// Base64 signature
    #[arg(
        long,
        conflicts_with = "signature_file",
        required_unless_present = "signature_file"
    )]
    pub signature: Option<String>,

    /// File holding the base64 signature
    #[arg(long)]
    pub signature_file: Option<PathBuf>,

    /// Quiet mode - only exit code, no output
    #[arg(long, short)]
    pub quiet: bool,
}

pub fn cmd_verify(args: VerifyArgs) -> i32 {
    match run_verify(&args) {
        Ok(true) => exit_codes::SUCCESS,
        Ok(false) => {
            if !args.quiet {
                eprintln!("FAILED: signature does not match {}", args.input.display());
            }
            exit_codes::SIGNATURE_MISMATCH
        }
        Err(e) => {
            if !args.quiet {
                eprintln!("error: {e:#}");
            }
            error_exit_code(&e)
        }
    }
}

fn run_verify(args: &VerifyArgs) -> Result<bool> {
    // Load config; --pubkey overrides the configured verification key
    let mut config = SigningConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config: {}", args.config.display()))?;
    if let Some(pubkey) = &args.pubkey {
        config = config.with_public_key(pubkey);
    }

    let signer = MessageSigner::from_config(&config)?;

    // Get the signature from the argument or the file
    let encoded = match (&args.signature, &args.signature_file) {
        (Some(signature), _) => signature.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("failed to read signature file: {}", path.display()))?,
        (None, None) => anyhow::bail!("must specify --signature or --signature-file"),
    };
    let signature =
        Signature::from_base64(encoded.trim()).context("signature is not valid base64")?;

    // Load payload
    let payload = fs::read(&args.input)
        .with_context(|| format!("failed to read payload: {}", args.input.display()))?;
    tracing::debug!(input = %args.input.display(), len = payload.len(), "verifying payload");

    // Verify (disabled signers accept everything)
    let valid = signer.verify(&payload, signature.as_bytes())?;

    if valid && !args.quiet {
        if signer.is_enabled() {
            println!("OK: signature valid for {}", args.input.display());
        } else {
            println!(
                "message signing is disabled in {}; accepted without verification",
                args.config.display()
            );
        }
    }

    Ok(valid)
}
