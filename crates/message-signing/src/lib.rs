//! Message authenticity for event-streaming pipelines.
//!
//! Producers sign outgoing message envelopes with a private key; consumers
//! verify them with the matching public key. This crate provides:
//!
//! - RSA (PKCS#1 v1.5), ECDSA P-256 and Ed25519 signatures
//! - PEM key loading, with a stable `sha256:` key id per key
//! - Optional stripping of the schema-registry framing header, so signatures
//!   survive schema re-registration
//! - A disabled mode that lets signing be switched off per deployment; a
//!   disabled consumer accepts every message, signed or not
//! - Adapters for signatures carried in the message or in a record header
//!
//! # Quick Start
//!
//! ```no_run
//! use message_signing::{MessageSigner, SigningConfig};
//!
//! # fn example() -> message_signing::SignerResult<()> {
//! let config = SigningConfig::from_file("signing.yaml".as_ref())?;
//! let signer = MessageSigner::from_config(&config)?;
//!
//! if let Some(signature) = signer.sign(b"envelope bytes")? {
//!     assert!(signer.verify(b"envelope bytes", signature.as_bytes())?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `MESSAGE_SIGNING_ENABLED` | Sign and verify messages (default: off) |
//! | `MESSAGE_SIGNING_STRIP_HEADERS` | Strip the framing header before hashing |
//! | `MESSAGE_SIGNING_HEADER_FRAMING` | `confluent` (default) or `avro-single-object` |
//! | `MESSAGE_SIGNING_ALGORITHM` | Signature algorithm (default: `SHA256withRSA`) |
//! | `MESSAGE_SIGNING_PROVIDER` | Provider (default: `SunRsaSign`) |
//! | `MESSAGE_SIGNING_KEY_ALGORITHM` | Key-pair algorithm (default: `RSA`) |
//! | `MESSAGE_SIGNING_KEY_SIZE` | Key size in bits (default: 2048) |
//! | `MESSAGE_SIGNING_PRIVATE_KEY` | Signing key PEM path |
//! | `MESSAGE_SIGNING_PUBLIC_KEY` | Verification key PEM path |

pub mod algorithm;
pub mod config;
pub mod engine;
pub mod error;
pub mod framing;
pub mod keys;
pub mod message;
pub mod signer;

// Re-export main types
pub use algorithm::{KeyAlgorithm, Provider, SignatureAlgorithm};
pub use config::{KeyPaths, SignatureConfig, SigningConfig};
pub use engine::{Signature, SignatureEngine};
pub use error::{SignerError, SignerResult};
pub use framing::{HeaderFraming, HeaderStripper};
pub use keys::{
    compute_key_id, generate_key_pair, read_latin1, GeneratedKeyPair, KeyMaterial, KeyRole,
    DEFAULT_RSA_KEY_SIZE,
};
pub use message::{RecordHeaders, SignableMessage, RECORD_HEADER_KEY_SIGNATURE};
pub use signer::{MessageSigner, MessageSignerBuilder};
