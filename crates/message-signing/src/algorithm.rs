//! Algorithm and provider names.
//!
//! Names follow the JCA spelling used by existing producers and consumers
//! (`SHA256withRSA`, `SunRsaSign`, ...) so configuration can be shared across
//! implementations. Matching is case-insensitive.

use std::fmt;
use std::str::FromStr;

use crate::error::SignerError;

/// Key-pair algorithm family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAlgorithm {
    Rsa,
    /// NIST P-256.
    Ec,
    Ed25519,
}

impl KeyAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rsa => "RSA",
            Self::Ec => "EC",
            Self::Ed25519 => "Ed25519",
        }
    }

    /// Key size in bits when the family has exactly one.
    pub fn fixed_key_size(&self) -> Option<u32> {
        match self {
            Self::Rsa => None,
            Self::Ec | Self::Ed25519 => Some(256),
        }
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeyAlgorithm {
    type Err = SignerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rsa" => Ok(Self::Rsa),
            "ec" | "ecdsa" => Ok(Self::Ec),
            "ed25519" | "eddsa" => Ok(Self::Ed25519),
            other => Err(SignerError::config(format!(
                "unsupported key algorithm: {other}"
            ))),
        }
    }
}

/// Signature algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    /// RSASSA-PKCS1-v1_5 with SHA-256.
    Sha256WithRsa,
    /// RSASSA-PKCS1-v1_5 with SHA-384.
    Sha384WithRsa,
    /// RSASSA-PKCS1-v1_5 with SHA-512.
    Sha512WithRsa,
    /// ECDSA over P-256 with SHA-256, ASN.1 DER encoded.
    Sha256WithEcdsa,
    Ed25519,
}

impl SignatureAlgorithm {
    pub const ALL: [SignatureAlgorithm; 5] = [
        Self::Sha256WithRsa,
        Self::Sha384WithRsa,
        Self::Sha512WithRsa,
        Self::Sha256WithEcdsa,
        Self::Ed25519,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha256WithRsa => "SHA256withRSA",
            Self::Sha384WithRsa => "SHA384withRSA",
            Self::Sha512WithRsa => "SHA512withRSA",
            Self::Sha256WithEcdsa => "SHA256withECDSA",
            Self::Ed25519 => "Ed25519",
        }
    }

    /// The key-pair family this algorithm signs with.
    pub fn key_algorithm(&self) -> KeyAlgorithm {
        match self {
            Self::Sha256WithRsa | Self::Sha384WithRsa | Self::Sha512WithRsa => KeyAlgorithm::Rsa,
            Self::Sha256WithEcdsa => KeyAlgorithm::Ec,
            Self::Ed25519 => KeyAlgorithm::Ed25519,
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = SignerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.eq_ignore_ascii_case("eddsa") {
            return Ok(Self::Ed25519);
        }
        Self::ALL
            .into_iter()
            .find(|alg| alg.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                SignerError::config(format!("unsupported signature algorithm: {wanted}"))
            })
    }
}

/// Named cryptographic provider.
///
/// A provider only resolves the algorithms it serves; asking `SunRsaSign`
/// for `SHA256withECDSA` is a configuration error, as it is on the JVM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// RSA family.
    SunRsaSign,
    /// ECDSA and Ed25519.
    SunEc,
    /// Every supported algorithm.
    RustCrypto,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Self::SunRsaSign, Self::SunEc, Self::RustCrypto];

    pub fn name(&self) -> &'static str {
        match self {
            Self::SunRsaSign => "SunRsaSign",
            Self::SunEc => "SunEC",
            Self::RustCrypto => "RustCrypto",
        }
    }

    pub fn serves(&self, algorithm: SignatureAlgorithm) -> bool {
        match self {
            Self::SunRsaSign => algorithm.key_algorithm() == KeyAlgorithm::Rsa,
            Self::SunEc => matches!(
                algorithm.key_algorithm(),
                KeyAlgorithm::Ec | KeyAlgorithm::Ed25519
            ),
            Self::RustCrypto => true,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = SignerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|provider| provider.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SignerError::config(format!("unknown signature provider: {wanted}")))
    }
}
