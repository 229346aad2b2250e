//! `message-signing keygen` - Generate a key pair.

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;

use message_signing::{
    generate_key_pair, KeyAlgorithm, KeyMaterial, KeyRole, DEFAULT_RSA_KEY_SIZE,
};

use super::error_exit_code;
use crate::exit_codes;

#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Key-pair algorithm (rsa, ec, ed25519)
    #[arg(long, default_value = "rsa")]
    pub algorithm: KeyAlgorithm,

    /// Key size in bits (RSA only; defaults to 2048)
    #[arg(long)]
    pub bits: Option<u32>,

    /// Output directory for keypair files
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    /// Force overwrite existing files
    #[arg(long, short)]
    pub force: bool,
}

pub fn cmd_keygen(args: KeygenArgs) -> i32 {
    match run_keygen(args) {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            error_exit_code(&e)
        }
    }
}

fn run_keygen(args: KeygenArgs) -> Result<()> {
    // Ensure output directory exists
    if !args.out.exists() {
        fs::create_dir_all(&args.out)
            .with_context(|| format!("failed to create directory: {}", args.out.display()))?;
    }

    let private_path = args.out.join("private_key.pem");
    let public_path = args.out.join("public_key.pem");

    // Check for existing files
    if !args.force {
        for path in [&private_path, &public_path] {
            if path.exists() {
                anyhow::bail!(
                    "key file already exists: {} (use --force to overwrite)",
                    path.display()
                );
            }
        }
    }

    // Generate keypair; fixed-size families ignore the RSA default
    let bits = args
        .bits
        .or(args.algorithm.fixed_key_size())
        .unwrap_or(DEFAULT_RSA_KEY_SIZE);
    let pair = generate_key_pair(args.algorithm, bits)
        .with_context(|| format!("failed to generate {} key pair", args.algorithm))?;

    // Write private key with restricted permissions
    fs::write(&private_path, pair.private_pem.as_bytes())
        .with_context(|| format!("failed to write private key: {}", private_path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o600);
        fs::set_permissions(&private_path, perms)
            .with_context(|| format!("failed to set permissions on: {}", private_path.display()))?;
    }

    // Write public key
    fs::write(&public_path, pair.public_pem.as_bytes())
        .with_context(|| format!("failed to write public key: {}", public_path.display()))?;

    // Compute and display key_id
    let public = KeyMaterial::from_pem(&pair.public_pem, KeyRole::Verification, args.algorithm)
        .context("failed to read back generated public key")?;

    println!("Generated {} keypair ({bits} bits):", args.algorithm);
    println!(
        "  Private key: {} (PKCS#8 PEM, mode 0600)",
        private_path.display()
    );
    println!("  Public key:  {} (SPKI PEM)", public_path.display());
    println!();
    println!("key_id: {}", public.key_id());

    Ok(())
}
