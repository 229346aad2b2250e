//! Signing configuration.
//!
//! # Example
//!
//! ```yaml
//! enabled: true
//! strip_headers: true
//! header_framing: confluent
//! signature:
//!   algorithm: SHA256withRSA
//!   provider: SunRsaSign
//!   key_algorithm: RSA
//!   key_size: 2048
//! keys:
//!   private: /etc/signing/rsa-private.pem
//!   public: /etc/signing/rsa-public.pem
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{SignerError, SignerResult};
use crate::framing::HeaderFraming;

/// Parameters selecting the signature algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureConfig {
    /// Signature algorithm name, e.g. `SHA256withRSA`.
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Provider name, e.g. `SunRsaSign`.
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Key-pair algorithm name, e.g. `RSA`.
    #[serde(default = "default_key_algorithm")]
    pub key_algorithm: String,

    /// Key size in bits. Keys are loaded, never generated from this; it is
    /// checked against what was loaded.
    #[serde(default = "default_key_size")]
    pub key_size: u32,
}

fn default_algorithm() -> String {
    "SHA256withRSA".to_string()
}

fn default_provider() -> String {
    "SunRsaSign".to_string()
}

fn default_key_algorithm() -> String {
    "RSA".to_string()
}

fn default_key_size() -> u32 {
    2048
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            provider: default_provider(),
            key_algorithm: default_key_algorithm(),
            key_size: default_key_size(),
        }
    }
}

impl SignatureConfig {
    pub fn new(
        algorithm: impl Into<String>,
        provider: impl Into<String>,
        key_algorithm: impl Into<String>,
        key_size: u32,
    ) -> Self {
        Self {
            algorithm: algorithm.into(),
            provider: provider.into(),
            key_algorithm: key_algorithm.into(),
            key_size,
        }
    }
}

/// Locations of the PEM key resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPaths {
    /// Signing (private) key.
    #[serde(default)]
    pub private: Option<PathBuf>,

    /// Verification (public) key.
    #[serde(default)]
    pub public: Option<PathBuf>,
}

/// Complete configuration surface of a message signer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningConfig {
    /// Whether messages are signed and verified at all.
    #[serde(default)]
    pub enabled: bool,

    /// Strip the framing header before hashing.
    #[serde(default)]
    pub strip_headers: bool,

    /// Framing of the envelopes when `strip_headers` is set.
    #[serde(default)]
    pub header_framing: HeaderFraming,

    #[serde(default)]
    pub signature: SignatureConfig,

    #[serde(default)]
    pub keys: KeyPaths,
}

impl SigningConfig {
    /// Parse a YAML document.
    pub fn from_yaml_str(yaml: &str) -> SignerResult<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| SignerError::config(format!("invalid signing config: {e}")))
    }

    /// Read a YAML file.
    ///
    /// Relative key paths are resolved against the file's directory.
    pub fn from_file(path: &Path) -> SignerResult<Self> {
        let yaml = fs::read_to_string(path).map_err(|e| {
            SignerError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        let mut config = Self::from_yaml_str(&yaml)?;

        if let Some(base) = path.parent() {
            config.keys.private = config.keys.private.map(|p| resolve_relative(base, p));
            config.keys.public = config.keys.public.map(|p| resolve_relative(base, p));
        }

        Ok(config)
    }

    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `MESSAGE_SIGNING_ENABLED` | Sign and verify messages |
    /// | `MESSAGE_SIGNING_STRIP_HEADERS` | Strip the framing header |
    /// | `MESSAGE_SIGNING_HEADER_FRAMING` | `confluent` or `avro-single-object` |
    /// | `MESSAGE_SIGNING_ALGORITHM` | Signature algorithm |
    /// | `MESSAGE_SIGNING_PROVIDER` | Provider |
    /// | `MESSAGE_SIGNING_KEY_ALGORITHM` | Key-pair algorithm |
    /// | `MESSAGE_SIGNING_KEY_SIZE` | Key size in bits |
    /// | `MESSAGE_SIGNING_PRIVATE_KEY` | Signing key PEM path |
    /// | `MESSAGE_SIGNING_PUBLIC_KEY` | Verification key PEM path |
    pub fn from_env() -> SignerResult<Self> {
        let header_framing = match std::env::var("MESSAGE_SIGNING_HEADER_FRAMING") {
            Ok(v) => serde_yaml::from_str(&v).map_err(|_| {
                SignerError::config(format!("unknown header framing: {v}"))
            })?,
            Err(_) => HeaderFraming::default(),
        };

        let key_size = match std::env::var("MESSAGE_SIGNING_KEY_SIZE") {
            Ok(v) => v
                .parse()
                .map_err(|_| SignerError::config(format!("invalid key size: {v}")))?,
            Err(_) => default_key_size(),
        };

        Ok(Self {
            enabled: env_flag("MESSAGE_SIGNING_ENABLED"),
            strip_headers: env_flag("MESSAGE_SIGNING_STRIP_HEADERS"),
            header_framing,
            signature: SignatureConfig {
                algorithm: std::env::var("MESSAGE_SIGNING_ALGORITHM")
                    .unwrap_or_else(|_| default_algorithm()),
                provider: std::env::var("MESSAGE_SIGNING_PROVIDER")
                    .unwrap_or_else(|_| default_provider()),
                key_algorithm: std::env::var("MESSAGE_SIGNING_KEY_ALGORITHM")
                    .unwrap_or_else(|_| default_key_algorithm()),
                key_size,
            },
            keys: KeyPaths {
                private: std::env::var_os("MESSAGE_SIGNING_PRIVATE_KEY").map(PathBuf::from),
                public: std::env::var_os("MESSAGE_SIGNING_PUBLIC_KEY").map(PathBuf::from),
            },
        })
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_strip_headers(mut self, framing: HeaderFraming) -> Self {
        self.strip_headers = true;
        self.header_framing = framing;
        self
    }

    pub fn with_signature(mut self, signature: SignatureConfig) -> Self {
        self.signature = signature;
        self
    }

    pub fn with_private_key(mut self, path: impl Into<PathBuf>) -> Self {
        self.keys.private = Some(path.into());
        self
    }

    pub fn with_public_key(mut self, path: impl Into<PathBuf>) -> Self {
        self.keys.public = Some(path.into());
        self
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn resolve_relative(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() {
        base.join(path)
    } else {
        path
    }
}
