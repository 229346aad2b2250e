//! Message signer facade.
//!
//! A signer is built once, in one of two fixed modes:
//!
//! - **Disabled**: no cryptographic work. `sign` returns `None` and
//!   `verify` returns `true` for every input, signed, unsigned or tampered.
//!   This lets producers and consumers toggle signing per deployment without
//!   breaking each other, and it means a disabled consumer trusts all
//!   traffic. Treat disabling verification as a trust decision.
//! - **Enabled**: every call strips the framing header (when configured) and
//!   delegates to the signature engine.
//!
//! There is no transition between modes; re-enabling means building a new
//! signer.

use crate::config::{SignatureConfig, SigningConfig};
use crate::engine::{Signature, SignatureEngine};
use crate::error::{SignerError, SignerResult};
use crate::framing::{HeaderFraming, HeaderStripper};
use crate::keys::{KeyMaterial, KeyRole};

/// Signs and verifies message envelopes.
///
/// `Send + Sync`: share one instance across all producer and consumer
/// threads.
#[derive(Debug)]
pub struct MessageSigner {
    mode: Mode,
}

#[derive(Debug)]
enum Mode {
    Disabled,
    Enabled(Box<EnabledSigner>),
}

#[derive(Debug)]
struct EnabledSigner {
    engine: SignatureEngine,
    stripper: HeaderStripper,
    signing_key: Option<KeyMaterial>,
    verification_key: Option<KeyMaterial>,
}

impl MessageSigner {
    /// A signer that never signs and accepts everything.
    pub fn disabled() -> Self {
        tracing::info!(mode = "disabled", "message signer built");
        Self {
            mode: Mode::Disabled,
        }
    }

    /// Start building an enabled signer.
    pub fn builder(config: SignatureConfig) -> MessageSignerBuilder {
        MessageSignerBuilder {
            config,
            stripper: HeaderStripper::disabled(),
            signing_key: None,
            verification_key: None,
        }
    }

    /// Build a signer from the full configuration surface.
    ///
    /// A disabled configuration never touches key resources. An enabled one
    /// loads every configured key and fails fast on the first problem.
    pub fn from_config(config: &SigningConfig) -> SignerResult<Self> {
        if !config.enabled {
            return Ok(Self::disabled());
        }

        let key_algorithm = config.signature.key_algorithm.parse()?;
        let signing_key = KeyMaterial::load(
            config.keys.private.as_deref(),
            KeyRole::Signing,
            key_algorithm,
        )?;
        let verification_key = KeyMaterial::load(
            config.keys.public.as_deref(),
            KeyRole::Verification,
            key_algorithm,
        )?;

        Self::builder(config.signature.clone())
            .strip_headers(config.strip_headers)
            .header_framing(config.header_framing)
            .signing_key(signing_key)
            .verification_key(verification_key)
            .build()
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.mode, Mode::Enabled(_))
    }

    /// Whether `sign` produces signatures.
    pub fn can_sign_messages(&self) -> bool {
        match &self.mode {
            Mode::Disabled => false,
            Mode::Enabled(signer) => signer.signing_key.is_some(),
        }
    }

    /// Whether `verify` actually checks signatures.
    pub fn can_verify_message_signatures(&self) -> bool {
        match &self.mode {
            Mode::Disabled => false,
            Mode::Enabled(signer) => signer.verification_key.is_some(),
        }
    }

    /// Sign an envelope.
    ///
    /// Returns `None` when disabled.
    pub fn sign(&self, envelope: &[u8]) -> SignerResult<Option<Signature>> {
        let signer = match &self.mode {
            Mode::Disabled => return Ok(None),
            Mode::Enabled(signer) => signer,
        };

        let key = signer.signing_key.as_ref().ok_or_else(|| {
            SignerError::config("signing is enabled but no signing key was loaded")
        })?;
        let payload = signer.stripper.strip(envelope)?;

        signer.engine.sign(key, payload).map(Some)
    }

    /// Verify `signature` over an envelope.
    ///
    /// Returns `true` when disabled, whatever the input. A signature that
    /// does not match is `Ok(false)`, not an error.
    pub fn verify(&self, envelope: &[u8], signature: &[u8]) -> SignerResult<bool> {
        let signer = match &self.mode {
            Mode::Disabled => return Ok(true),
            Mode::Enabled(signer) => signer,
        };

        let key = signer.verification_key.as_ref().ok_or_else(|| {
            SignerError::config("signing is enabled but no verification key was loaded")
        })?;
        let payload = signer.stripper.strip(envelope)?;

        let valid = signer.engine.verify(key, payload, signature)?;
        if !valid {
            tracing::debug!(
                key_id = %key.key_id(),
                envelope_len = envelope.len(),
                "signature does not match envelope"
            );
        }
        Ok(valid)
    }
}

/// Builder for an enabled [`MessageSigner`].
#[derive(Debug)]
pub struct MessageSignerBuilder {
    config: SignatureConfig,
    stripper: HeaderStripper,
    signing_key: Option<KeyMaterial>,
    verification_key: Option<KeyMaterial>,
}

impl MessageSignerBuilder {
    pub fn strip_headers(mut self, enabled: bool) -> Self {
        self.stripper = HeaderStripper::new(self.stripper.framing(), enabled);
        self
    }

    pub fn header_framing(mut self, framing: HeaderFraming) -> Self {
        self.stripper = HeaderStripper::new(framing, self.stripper.is_enabled());
        self
    }

    pub fn signing_key(mut self, key: impl Into<Option<KeyMaterial>>) -> Self {
        self.signing_key = key.into();
        self
    }

    pub fn verification_key(mut self, key: impl Into<Option<KeyMaterial>>) -> Self {
        self.verification_key = key.into();
        self
    }

    /// Validate and build.
    ///
    /// # Checks
    ///
    /// 1. The algorithm configuration resolves
    /// 2. At least one key is present
    /// 3. Each key was loaded for its role, in the configured family and size
    pub fn build(self) -> SignerResult<MessageSigner> {
        let engine = SignatureEngine::resolve(&self.config)?;

        if self.signing_key.is_none() && self.verification_key.is_none() {
            return Err(SignerError::config(
                "signing is enabled but neither a signing key nor a verification key is configured",
            ));
        }

        for (expected_role, key) in [
            (KeyRole::Signing, &self.signing_key),
            (KeyRole::Verification, &self.verification_key),
        ] {
            if let Some(key) = key {
                check_key(&engine, &self.config, expected_role, key)?;
            }
        }

        tracing::info!(
            mode = "enabled",
            algorithm = %engine.algorithm(),
            provider = %engine.provider(),
            strip_headers = self.stripper.is_enabled(),
            framing = %self.stripper.framing(),
            can_sign = self.signing_key.is_some(),
            can_verify = self.verification_key.is_some(),
            "message signer built"
        );

        Ok(MessageSigner {
            mode: Mode::Enabled(Box::new(EnabledSigner {
                engine,
                stripper: self.stripper,
                signing_key: self.signing_key,
                verification_key: self.verification_key,
            })),
        })
    }
}

fn check_key(
    engine: &SignatureEngine,
    config: &SignatureConfig,
    expected_role: KeyRole,
    key: &KeyMaterial,
) -> SignerResult<()> {
    if key.role() != expected_role {
        return Err(SignerError::config(format!(
            "{} key {} was supplied as the {expected_role} key",
            key.role(),
            key.key_id()
        )));
    }

    if key.algorithm() != engine.key_algorithm() {
        return Err(SignerError::config(format!(
            "{expected_role} key is {}, {} needs {}",
            key.algorithm(),
            engine.algorithm(),
            engine.key_algorithm()
        )));
    }

    if key.key_size_bits() != config.key_size {
        return Err(SignerError::config(format!(
            "{expected_role} key is {} bits, configured key size is {}",
            key.key_size_bits(),
            config.key_size
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::KeyAlgorithm;

    const ED25519_PRIVATE: &str = include_str!("../tests/fixtures/ed25519-private.pem");
    const ED25519_PUBLIC: &str = include_str!("../tests/fixtures/ed25519-public.pem");

    fn ed25519_config() -> SignatureConfig {
        SignatureConfig::new("Ed25519", "SunEC", "Ed25519", 256)
    }

    fn signing_key() -> KeyMaterial {
        KeyMaterial::from_pem(ED25519_PRIVATE, KeyRole::Signing, KeyAlgorithm::Ed25519).unwrap()
    }

    fn verification_key() -> KeyMaterial {
        KeyMaterial::from_pem(ED25519_PUBLIC, KeyRole::Verification, KeyAlgorithm::Ed25519)
            .unwrap()
    }

    fn enabled_signer() -> MessageSigner {
        MessageSigner::builder(ed25519_config())
            .signing_key(signing_key())
            .verification_key(verification_key())
            .build()
            .unwrap()
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_signer_is_shareable() {
        assert_send_sync::<MessageSigner>();
    }

    #[test]
    fn test_disabled_signs_nothing_and_accepts_everything() {
        let signer = MessageSigner::disabled();
        assert!(!signer.is_enabled());
        assert!(!signer.can_sign_messages());
        assert!(!signer.can_verify_message_signatures());
        assert_eq!(signer.sign(b"payload").unwrap(), None);
        assert!(signer.verify(b"payload", b"").unwrap());
        assert!(signer.verify(b"", b"not a signature").unwrap());
    }

    #[test]
    fn test_enabled_roundtrip() {
        let signer = enabled_signer();
        assert!(signer.is_enabled());
        assert!(signer.can_sign_messages());
        assert!(signer.can_verify_message_signatures());

        let signature = signer.sign(b"payload").unwrap().expect("signature");
        assert!(signer.verify(b"payload", signature.as_bytes()).unwrap());
        assert!(!signer.verify(b"payload!", signature.as_bytes()).unwrap());
    }

    #[test]
    fn test_build_without_keys_is_configuration_error() {
        let err = MessageSigner::builder(ed25519_config()).build().unwrap_err();
        assert!(matches!(err, SignerError::Configuration { .. }));
        assert!(err.is_construction_error());
    }

    #[test]
    fn test_build_with_unresolvable_algorithm_fails() {
        let err = MessageSigner::builder(SignatureConfig::new("Ed25519", "SunRsaSign", "Ed25519", 256))
            .verification_key(verification_key())
            .build()
            .unwrap_err();
        assert!(matches!(err, SignerError::Configuration { .. }));
    }

    #[test]
    fn test_build_rejects_key_in_wrong_slot() {
        let err = MessageSigner::builder(ed25519_config())
            .signing_key(verification_key())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("supplied as the signing key"), "{err}");
    }

    #[test]
    fn test_build_rejects_key_of_other_family() {
        let rsa = KeyMaterial::from_pem(
            include_str!("../tests/fixtures/rsa-public.pem"),
            KeyRole::Verification,
            KeyAlgorithm::Rsa,
        )
        .unwrap();
        let err = MessageSigner::builder(ed25519_config())
            .verification_key(rsa)
            .build()
            .unwrap_err();
        assert!(matches!(err, SignerError::Configuration { .. }));
    }

    #[test]
    fn test_build_rejects_key_size_mismatch() {
        let rsa = KeyMaterial::from_pem(
            include_str!("../tests/fixtures/rsa-public.pem"),
            KeyRole::Verification,
            KeyAlgorithm::Rsa,
        )
        .unwrap();
        let config = SignatureConfig {
            key_size: 4096,
            ..SignatureConfig::default()
        };
        let err = MessageSigner::builder(config)
            .verification_key(rsa)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("2048 bits"), "{err}");
    }

    #[test]
    fn test_verify_only_signer_cannot_sign() {
        let signer = MessageSigner::builder(ed25519_config())
            .verification_key(verification_key())
            .build()
            .unwrap();
        assert!(!signer.can_sign_messages());
        assert!(signer.can_verify_message_signatures());

        let err = signer.sign(b"payload").unwrap_err();
        assert!(matches!(err, SignerError::Configuration { .. }));
        assert!(err.is_construction_error());
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_sign_only_signer_cannot_verify() {
        let signer = MessageSigner::builder(ed25519_config())
            .signing_key(signing_key())
            .build()
            .unwrap();
        let signature = signer.sign(b"payload").unwrap().unwrap();

        let err = signer.verify(b"payload", signature.as_bytes()).unwrap_err();
        assert!(matches!(err, SignerError::Configuration { .. }));
    }

    #[test]
    fn test_stripping_signs_only_the_record_body() {
        let signer = MessageSigner::builder(ed25519_config())
            .strip_headers(true)
            .header_framing(HeaderFraming::Confluent)
            .signing_key(signing_key())
            .verification_key(verification_key())
            .build()
            .unwrap();

        let a = [&[0x00, 0, 0, 0, 1][..], b"record"].concat();
        let b = [&[0x00, 0, 0, 0, 99][..], b"record"].concat();
        let sig_a = signer.sign(&a).unwrap().unwrap();
        let sig_b = signer.sign(&b).unwrap().unwrap();

        assert_eq!(sig_a, sig_b);
        assert!(signer.verify(&b, sig_a.as_bytes()).unwrap());
    }

    #[test]
    fn test_malformed_envelope_is_per_call_error() {
        let signer = MessageSigner::builder(ed25519_config())
            .strip_headers(true)
            .signing_key(signing_key())
            .verification_key(verification_key())
            .build()
            .unwrap();

        let err = signer.sign(&[0x00, 1]).unwrap_err();
        assert!(matches!(err, SignerError::MalformedEnvelope { .. }));
        assert!(!err.is_construction_error());

        let err = signer.verify(&[0x00], &[0; 64]).unwrap_err();
        assert!(matches!(err, SignerError::MalformedEnvelope { .. }));

        // still usable afterwards
        let envelope = [0x00, 0, 0, 0, 1, 42];
        let signature = signer.sign(&envelope).unwrap().unwrap();
        assert!(signer.verify(&envelope, signature.as_bytes()).unwrap());
    }

    #[test]
    fn test_from_config_disabled_ignores_key_paths() {
        let config = SigningConfig::default().with_private_key("/does/not/exist.pem");
        let signer = MessageSigner::from_config(&config).unwrap();
        assert!(!signer.is_enabled());
    }

    #[test]
    fn test_from_config_enabled_without_keys_fails() {
        let config = SigningConfig::default().with_enabled(true);
        let err = MessageSigner::from_config(&config).unwrap_err();
        assert!(matches!(err, SignerError::Configuration { .. }));
    }

    #[test]
    fn test_from_config_enabled_with_missing_key_file_fails() {
        let config = SigningConfig::default()
            .with_enabled(true)
            .with_public_key("/does/not/exist.pem");
        let err = MessageSigner::from_config(&config).unwrap_err();
        assert!(matches!(
            err,
            SignerError::KeyLoad {
                role: KeyRole::Verification,
                ..
            }
        ));
    }
}
