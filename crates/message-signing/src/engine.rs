//! Signature engine: algorithm-parameterized sign and verify.
//!
//! Every call builds its own signer/verifier state from the shared, immutable
//! key; nothing mutable is kept between calls, so one engine can serve any
//! number of threads.

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rsa::sha2::{Sha256, Sha384, Sha512};
use rsa::signature::{RandomizedSigner, SignatureEncoding, Signer, Verifier};

use crate::algorithm::{KeyAlgorithm, Provider, SignatureAlgorithm};
use crate::config::SignatureConfig;
use crate::error::{SignerError, SignerResult};
use crate::keys::{KeyMaterial, PrivateKey, PublicKey};

/// Signature bytes exactly as produced by the algorithm implementation.
///
/// Only meaningful together with the payload, key pair and algorithm that
/// produced it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.0)
    }

    pub fn from_base64(encoded: &str) -> Result<Self, base64::DecodeError> {
        BASE64.decode(encoded.trim()).map(Self)
    }
}

impl From<Vec<u8>> for Signature {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_base64())
    }
}

/// Algorithm/provider pair that performs the cryptographic work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureEngine {
    algorithm: SignatureAlgorithm,
    provider: Provider,
}

impl SignatureEngine {
    /// Engine for an explicit pair. Availability is checked on every call.
    pub fn new(algorithm: SignatureAlgorithm, provider: Provider) -> Self {
        Self {
            algorithm,
            provider,
        }
    }

    /// Resolve configured names into an engine.
    ///
    /// # Checks
    ///
    /// 1. Algorithm, provider and key-pair algorithm names are known
    /// 2. The provider implements the algorithm
    /// 3. The key-pair algorithm is the algorithm's family
    /// 4. Fixed-size families are configured with their size
    pub fn resolve(config: &SignatureConfig) -> SignerResult<Self> {
        let algorithm: SignatureAlgorithm = config.algorithm.parse()?;
        let provider: Provider = config.provider.parse()?;
        let key_algorithm: KeyAlgorithm = config.key_algorithm.parse()?;

        if !provider.serves(algorithm) {
            return Err(SignerError::config(format!(
                "provider {provider} does not implement {algorithm}"
            )));
        }

        if algorithm.key_algorithm() != key_algorithm {
            return Err(SignerError::config(format!(
                "{algorithm} requires {} keys, configured key algorithm is {key_algorithm}",
                algorithm.key_algorithm()
            )));
        }

        if let Some(fixed) = key_algorithm.fixed_key_size() {
            if config.key_size != fixed {
                return Err(SignerError::config(format!(
                    "{key_algorithm} keys are {fixed} bits, configured key size is {}",
                    config.key_size
                )));
            }
        }

        Ok(Self::new(algorithm, provider))
    }

    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn key_algorithm(&self) -> KeyAlgorithm {
        self.algorithm.key_algorithm()
    }

    fn unavailable(&self) -> Option<String> {
        (!self.provider.serves(self.algorithm)).then(|| {
            format!(
                "{} is not available from provider {}",
                self.algorithm, self.provider
            )
        })
    }

    /// Sign `payload` with the private key in `key`.
    pub fn sign(&self, key: &KeyMaterial, payload: &[u8]) -> SignerResult<Signature> {
        if let Some(reason) = self.unavailable() {
            return Err(SignerError::signing(reason));
        }

        let private = key.private_key().ok_or_else(|| {
            SignerError::signing(format!(
                "{} key material {} has no private key",
                key.role(),
                key.key_id()
            ))
        })?;

        let bytes = match (self.algorithm, private) {
            (SignatureAlgorithm::Sha256WithRsa, PrivateKey::Rsa(k)) => {
                sign_pkcs1v15(rsa::pkcs1v15::SigningKey::<Sha256>::new(k.clone()), payload)?
            }
            (SignatureAlgorithm::Sha384WithRsa, PrivateKey::Rsa(k)) => {
                sign_pkcs1v15(rsa::pkcs1v15::SigningKey::<Sha384>::new(k.clone()), payload)?
            }
            (SignatureAlgorithm::Sha512WithRsa, PrivateKey::Rsa(k)) => {
                sign_pkcs1v15(rsa::pkcs1v15::SigningKey::<Sha512>::new(k.clone()), payload)?
            }
            (SignatureAlgorithm::Sha256WithEcdsa, PrivateKey::Ec(k)) => {
                let signature: p256::ecdsa::Signature = k
                    .try_sign(payload)
                    .map_err(|e| SignerError::signing(format!("ECDSA signing failed: {e}")))?;
                signature.to_der().as_bytes().to_vec()
            }
            (SignatureAlgorithm::Ed25519, PrivateKey::Ed25519(k)) => {
                let signature: ed25519_dalek::Signature = k
                    .try_sign(payload)
                    .map_err(|e| SignerError::signing(format!("Ed25519 signing failed: {e}")))?;
                signature.to_bytes().to_vec()
            }
            (algorithm, _) => {
                return Err(SignerError::signing(format!(
                    "{algorithm} cannot sign with a {} key",
                    key.algorithm()
                )))
            }
        };

        tracing::debug!(
            algorithm = %self.algorithm,
            payload_len = payload.len(),
            signature_len = bytes.len(),
            "signed payload"
        );

        Ok(Signature(bytes))
    }

    /// Check `signature` over `payload` against the public key in `key`.
    ///
    /// A signature that does not match, including one that does not even
    /// decode for this algorithm, is `Ok(false)`.
    pub fn verify(&self, key: &KeyMaterial, payload: &[u8], signature: &[u8]) -> SignerResult<bool> {
        if let Some(reason) = self.unavailable() {
            return Err(SignerError::verification(reason));
        }

        let valid = match (self.algorithm, key.public_key()) {
            (SignatureAlgorithm::Sha256WithRsa, PublicKey::Rsa(k)) => verify_pkcs1v15(
                rsa::pkcs1v15::VerifyingKey::<Sha256>::new(k.clone()),
                payload,
                signature,
            ),
            (SignatureAlgorithm::Sha384WithRsa, PublicKey::Rsa(k)) => verify_pkcs1v15(
                rsa::pkcs1v15::VerifyingKey::<Sha384>::new(k.clone()),
                payload,
                signature,
            ),
            (SignatureAlgorithm::Sha512WithRsa, PublicKey::Rsa(k)) => verify_pkcs1v15(
                rsa::pkcs1v15::VerifyingKey::<Sha512>::new(k.clone()),
                payload,
                signature,
            ),
            (SignatureAlgorithm::Sha256WithEcdsa, PublicKey::Ec(k)) => {
                match p256::ecdsa::Signature::from_der(signature) {
                    Ok(sig) => k.verify(payload, &sig).is_ok(),
                    Err(e) => {
                        tracing::warn!(error = %e, "signature is not a DER encoded ECDSA signature");
                        false
                    }
                }
            }
            (SignatureAlgorithm::Ed25519, PublicKey::Ed25519(k)) => {
                match ed25519_dalek::Signature::from_slice(signature) {
                    Ok(sig) => k.verify(payload, &sig).is_ok(),
                    Err(e) => {
                        tracing::warn!(error = %e, "signature is not an Ed25519 signature");
                        false
                    }
                }
            }
            (algorithm, _) => {
                return Err(SignerError::verification(format!(
                    "{algorithm} cannot verify with a {} key",
                    key.algorithm()
                )))
            }
        };

        tracing::debug!(
            algorithm = %self.algorithm,
            payload_len = payload.len(),
            valid,
            "verified payload"
        );

        Ok(valid)
    }
}

fn sign_pkcs1v15<S>(signer: S, payload: &[u8]) -> SignerResult<Vec<u8>>
where
    S: RandomizedSigner<rsa::pkcs1v15::Signature>,
{
    // The RNG only blinds the private-key operation; output stays deterministic.
    signer
        .try_sign_with_rng(&mut rand::thread_rng(), payload)
        .map(|signature| signature.to_vec())
        .map_err(|e| SignerError::signing(format!("RSA signing failed: {e}")))
}

fn verify_pkcs1v15<V>(verifier: V, payload: &[u8], signature: &[u8]) -> bool
where
    V: Verifier<rsa::pkcs1v15::Signature>,
{
    match rsa::pkcs1v15::Signature::try_from(signature) {
        Ok(sig) => verifier.verify(payload, &sig).is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "signature is not an RSA signature");
            false
        }
    }
}
