//! Key material loaded from PEM.
//!
//! Key resources are read as ISO-8859-1 text: every byte maps to exactly one
//! character, so the armor reaches the PEM decoder verbatim whatever the
//! platform locale is.
//!
//! Accepted PEM labels:
//!
//! | Label | Families |
//! |-------|----------|
//! | `PRIVATE KEY` (PKCS#8) | RSA, EC, Ed25519 |
//! | `RSA PRIVATE KEY` (PKCS#1) | RSA |
//! | `EC PRIVATE KEY` (SEC1) | EC |
//! | `PUBLIC KEY` (SPKI) | RSA, EC, Ed25519 |
//! | `RSA PUBLIC KEY` (PKCS#1) | RSA |

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

use crate::algorithm::KeyAlgorithm;
use crate::error::{SignerError, SignerResult};

/// Default RSA modulus size for generated keys.
pub const DEFAULT_RSA_KEY_SIZE: u32 = 2048;

/// What a key is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyRole {
    /// Private key, used by producers.
    Signing,
    /// Public key, used by consumers.
    Verification,
}

impl KeyRole {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Signing => "signing",
            Self::Verification => "verification",
        }
    }
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone)]
pub(crate) enum PrivateKey {
    Rsa(RsaPrivateKey),
    Ec(p256::ecdsa::SigningKey),
    Ed25519(ed25519_dalek::SigningKey),
}

impl PrivateKey {
    fn from_pem(pem: &str, label: &str, algorithm: KeyAlgorithm) -> Result<Self, String> {
        match (algorithm, label) {
            (KeyAlgorithm::Rsa, "PRIVATE KEY") => RsaPrivateKey::from_pkcs8_pem(pem)
                .map(Self::Rsa)
                .map_err(|e| format!("invalid PKCS#8 RSA private key: {e}")),
            (KeyAlgorithm::Rsa, "RSA PRIVATE KEY") => RsaPrivateKey::from_pkcs1_pem(pem)
                .map(Self::Rsa)
                .map_err(|e| format!("invalid PKCS#1 RSA private key: {e}")),
            (KeyAlgorithm::Ec, "PRIVATE KEY") => p256::ecdsa::SigningKey::from_pkcs8_pem(pem)
                .map(Self::Ec)
                .map_err(|e| format!("invalid PKCS#8 P-256 private key: {e}")),
            (KeyAlgorithm::Ec, "EC PRIVATE KEY") => p256::SecretKey::from_sec1_pem(pem)
                .map(|secret| Self::Ec(secret.into()))
                .map_err(|e| format!("invalid SEC1 P-256 private key: {e}")),
            (KeyAlgorithm::Ed25519, "PRIVATE KEY") => {
                ed25519_dalek::SigningKey::from_pkcs8_pem(pem)
                    .map(Self::Ed25519)
                    .map_err(|e| format!("invalid PKCS#8 Ed25519 private key: {e}"))
            }
            (algorithm, label) => Err(format!(
                "PEM block '{label}' does not hold a {algorithm} private key"
            )),
        }
    }

    fn public_key(&self) -> PublicKey {
        match self {
            Self::Rsa(key) => PublicKey::Rsa(key.to_public_key()),
            Self::Ec(key) => PublicKey::Ec(p256::ecdsa::VerifyingKey::from(key)),
            Self::Ed25519(key) => PublicKey::Ed25519(key.verifying_key()),
        }
    }
}

#[derive(Clone)]
pub(crate) enum PublicKey {
    Rsa(RsaPublicKey),
    Ec(p256::ecdsa::VerifyingKey),
    Ed25519(ed25519_dalek::VerifyingKey),
}

impl PublicKey {
    fn from_pem(pem: &str, label: &str, algorithm: KeyAlgorithm) -> Result<Self, String> {
        match (algorithm, label) {
            (KeyAlgorithm::Rsa, "PUBLIC KEY") => RsaPublicKey::from_public_key_pem(pem)
                .map(Self::Rsa)
                .map_err(|e| format!("invalid SPKI RSA public key: {e}")),
            (KeyAlgorithm::Rsa, "RSA PUBLIC KEY") => RsaPublicKey::from_pkcs1_pem(pem)
                .map(Self::Rsa)
                .map_err(|e| format!("invalid PKCS#1 RSA public key: {e}")),
            (KeyAlgorithm::Ec, "PUBLIC KEY") => {
                p256::ecdsa::VerifyingKey::from_public_key_pem(pem)
                    .map(Self::Ec)
                    .map_err(|e| format!("invalid SPKI P-256 public key: {e}"))
            }
            (KeyAlgorithm::Ed25519, "PUBLIC KEY") => {
                ed25519_dalek::VerifyingKey::from_public_key_pem(pem)
                    .map(Self::Ed25519)
                    .map_err(|e| format!("invalid SPKI Ed25519 public key: {e}"))
            }
            (algorithm, label) => Err(format!(
                "PEM block '{label}' does not hold a {algorithm} public key"
            )),
        }
    }

    fn to_spki_der(&self) -> Result<Vec<u8>, String> {
        let doc = match self {
            Self::Rsa(key) => key.to_public_key_der(),
            Self::Ec(key) => key.to_public_key_der(),
            Self::Ed25519(key) => key.to_public_key_der(),
        };
        doc.map(|doc| doc.as_bytes().to_vec())
            .map_err(|e| format!("failed to encode public key as SPKI DER: {e}"))
    }

    fn size_bits(&self) -> u32 {
        match self {
            Self::Rsa(key) => (key.size() * 8) as u32,
            Self::Ec(_) | Self::Ed25519(_) => 256,
        }
    }
}

/// A parsed asymmetric key, tagged with the role it was loaded for.
///
/// Signing material holds the private key and the public half derived from
/// it; verification material holds only a public key. Immutable once
/// loaded, so one instance can be read from any number of threads.
#[derive(Clone)]
pub struct KeyMaterial {
    role: KeyRole,
    algorithm: KeyAlgorithm,
    private: Option<PrivateKey>,
    public: PublicKey,
    key_id: String,
}

impl KeyMaterial {
    /// Parse PEM text into key material for `role`.
    pub fn from_pem(pem: &str, role: KeyRole, algorithm: KeyAlgorithm) -> SignerResult<Self> {
        let pem = format!("{}\n", pem.trim());
        let label = pkcs8::der::pem::decode_label(pem.as_bytes())
            .map_err(|e| SignerError::key_load(role, format!("not a PEM document: {e}")))?;

        let (private, public) = match role {
            KeyRole::Signing => {
                let private = PrivateKey::from_pem(&pem, label, algorithm)
                    .map_err(|reason| SignerError::key_load(role, reason))?;
                let public = private.public_key();
                (Some(private), public)
            }
            KeyRole::Verification => {
                let public = PublicKey::from_pem(&pem, label, algorithm)
                    .map_err(|reason| SignerError::key_load(role, reason))?;
                (None, public)
            }
        };

        let spki = public
            .to_spki_der()
            .map_err(|reason| SignerError::key_load(role, reason))?;
        let key_id = compute_key_id(&spki);

        tracing::info!(
            role = %role,
            algorithm = %algorithm,
            key_id = %key_id,
            "loaded key"
        );

        Ok(Self {
            role,
            algorithm,
            private,
            public,
            key_id,
        })
    }

    /// Load key material from an optional resource.
    ///
    /// No resource means no key for this role, which is not an error here;
    /// whether the role is needed is decided when the signer is built.
    pub fn load(
        resource: Option<&Path>,
        role: KeyRole,
        algorithm: KeyAlgorithm,
    ) -> SignerResult<Option<Self>> {
        let Some(path) = resource else {
            return Ok(None);
        };

        let pem = read_latin1(path).map_err(|e| {
            SignerError::key_load(
                role,
                format!("unable to read {} as ISO-8859-1 PEM text: {e}", path.display()),
            )
        })?;

        Self::from_pem(&pem, role, algorithm).map(Some)
    }

    pub fn role(&self) -> KeyRole {
        self.role
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    /// `sha256:<hex>` of the SPKI encoding of the public half.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn key_size_bits(&self) -> u32 {
        self.public.size_bits()
    }

    pub fn has_private_key(&self) -> bool {
        self.private.is_some()
    }

    pub(crate) fn private_key(&self) -> Option<&PrivateKey> {
        self.private.as_ref()
    }

    pub(crate) fn public_key(&self) -> &PublicKey {
        &self.public
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("role", &self.role)
            .field("algorithm", &self.algorithm)
            .field("key_id", &self.key_id)
            .field("has_private_key", &self.private.is_some())
            .finish()
    }
}

/// Read a file as ISO-8859-1 text.
pub fn read_latin1(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(bytes.into_iter().map(char::from).collect())
}

/// Compute key ID from public key bytes (SPKI DER).
pub fn compute_key_id(spki_bytes: &[u8]) -> String {
    format!("sha256:{}", hex::encode(Sha256::digest(spki_bytes)))
}

/// A freshly generated key pair, PEM encoded.
pub struct GeneratedKeyPair {
    /// PKCS#8 `PRIVATE KEY`.
    pub private_pem: String,
    /// SPKI `PUBLIC KEY`.
    pub public_pem: String,
}

impl fmt::Debug for GeneratedKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedKeyPair")
            .field("public_pem", &self.public_pem)
            .finish_non_exhaustive()
    }
}

/// Generate a key pair for `algorithm`.
///
/// `bits` only matters for RSA; the other families have a fixed size and
/// reject any other value.
pub fn generate_key_pair(algorithm: KeyAlgorithm, bits: u32) -> SignerResult<GeneratedKeyPair> {
    if let Some(fixed) = algorithm.fixed_key_size() {
        if bits != fixed {
            return Err(SignerError::config(format!(
                "{algorithm} keys are {fixed} bits, {bits} requested"
            )));
        }
    }

    let mut rng = rand::thread_rng();
    let encoded = match algorithm {
        KeyAlgorithm::Rsa => {
            let key = RsaPrivateKey::new(&mut rng, bits as usize)
                .map_err(|e| SignerError::config(format!("failed to generate RSA key: {e}")))?;
            let public = key.to_public_key();
            (
                key.to_pkcs8_pem(LineEnding::LF),
                public.to_public_key_pem(LineEnding::LF),
            )
        }
        KeyAlgorithm::Ec => {
            let key = p256::ecdsa::SigningKey::random(&mut rng);
            let public = p256::ecdsa::VerifyingKey::from(&key);
            (
                key.to_pkcs8_pem(LineEnding::LF),
                public.to_public_key_pem(LineEnding::LF),
            )
        }
        KeyAlgorithm::Ed25519 => {
            let key = ed25519_dalek::SigningKey::generate(&mut rng);
            let public = key.verifying_key();
            (
                key.to_pkcs8_pem(LineEnding::LF),
                public.to_public_key_pem(LineEnding::LF),
            )
        }
    };

    let (private_pem, public_pem) = encoded;
    let private_pem = private_pem
        .map_err(|e| SignerError::config(format!("failed to encode private key as PEM: {e}")))?;
    let public_pem = public_pem
        .map_err(|e| SignerError::config(format!("failed to encode public key as PEM: {e}")))?;

    Ok(GeneratedKeyPair {
        private_pem: private_pem.as_str().to_owned(),
        public_pem,
    })
}
