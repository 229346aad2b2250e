//! Error types for message signing.

use crate::keys::KeyRole;

/// Message signing errors.
///
/// A signature that does not match its payload is not an error: verification
/// reports it as `Ok(false)`.
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    /// Key resource unreadable, or not a key of the expected algorithm.
    #[error("failed to load {role} key: {reason}")]
    KeyLoad { role: KeyRole, reason: String },

    /// Inconsistent configuration, or no usable key for the requested role.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Envelope does not carry the framing header the stripper expects.
    #[error("malformed envelope: expected {expected}, got {actual}")]
    MalformedEnvelope { expected: String, actual: String },

    /// Record or message carries no signature to verify.
    #[error("missing signature: {message}")]
    MissingSignature { message: String },

    /// The engine could not produce a signature.
    #[error("signing failed: {reason}")]
    Signing { reason: String },

    /// The engine could not evaluate a signature.
    #[error("verification failed: {reason}")]
    Verification { reason: String },
}

impl SignerError {
    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::KeyLoad { .. } | Self::Configuration { .. } => 1,
            Self::MalformedEnvelope { .. } | Self::MissingSignature { .. } => 2,
            Self::Signing { .. } | Self::Verification { .. } => 3,
        }
    }

    /// Whether the error belongs to the startup-fatal class.
    ///
    /// Key and configuration problems abort startup of the owning service
    /// when raised while building a signer. A built signer raises
    /// `Configuration` per call when the role's key was never loaded, which
    /// is still a deployment mistake rather than a bad message. Everything
    /// else concerns a single sign/verify.
    pub fn is_construction_error(&self) -> bool {
        matches!(self, Self::KeyLoad { .. } | Self::Configuration { .. })
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn key_load(role: KeyRole, reason: impl Into<String>) -> Self {
        Self::KeyLoad {
            role,
            reason: reason.into(),
        }
    }

    pub(crate) fn signing(reason: impl Into<String>) -> Self {
        Self::Signing {
            reason: reason.into(),
        }
    }

    pub(crate) fn verification(reason: impl Into<String>) -> Self {
        Self::Verification {
            reason: reason.into(),
        }
    }
}

/// Result type for signing operations.
pub type SignerResult<T> = Result<T, SignerError>;
