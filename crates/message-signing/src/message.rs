//! Attaching signatures to messages and records.
//!
//! Two carriers are supported:
//!
//! - a signature field inside the message itself ([`SignableMessage`]); the
//!   field is cleared while the payload bytes are computed, so the signature
//!   never covers itself
//! - a record header named [`RECORD_HEADER_KEY_SIGNATURE`] next to the
//!   payload ([`RecordHeaders`])

use crate::error::{SignerError, SignerResult};
use crate::signer::MessageSigner;

/// Record header that carries the signature.
pub const RECORD_HEADER_KEY_SIGNATURE: &str = "signature";

/// A message with a slot for its own signature.
pub trait SignableMessage {
    /// Encoded message bytes, including the current signature field.
    fn payload_bytes(&self) -> Vec<u8>;

    fn signature(&self) -> Option<&[u8]>;

    fn set_signature(&mut self, signature: Option<Vec<u8>>);
}

/// Mutable view of a record's headers.
pub trait RecordHeaders {
    /// Value of the last header named `key`.
    fn last_header(&self, key: &str) -> Option<&[u8]>;

    fn add_header(&mut self, key: &str, value: Vec<u8>);

    fn remove_headers(&mut self, key: &str);
}

impl RecordHeaders for Vec<(String, Vec<u8>)> {
    fn last_header(&self, key: &str) -> Option<&[u8]> {
        self.iter()
            .rev()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_slice())
    }

    fn add_header(&mut self, key: &str, value: Vec<u8>) {
        self.push((key.to_string(), value));
    }

    fn remove_headers(&mut self, key: &str) {
        self.retain(|(name, _)| name != key);
    }
}

impl MessageSigner {
    /// Sign `message` in place, replacing any signature it carries.
    ///
    /// No-op when disabled.
    pub fn sign_message<M: SignableMessage + ?Sized>(&self, message: &mut M) -> SignerResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        message.set_signature(None);
        let bytes = message.payload_bytes();
        let signature = self.sign(&bytes)?;
        message.set_signature(signature.map(|s| s.into_bytes()));
        Ok(())
    }

    /// Verify the signature carried by `message`.
    ///
    /// An unsigned message does not verify. The message is left with exactly
    /// the signature it had on entry.
    pub fn verify_message<M: SignableMessage + ?Sized>(
        &self,
        message: &mut M,
    ) -> SignerResult<bool> {
        if !self.is_enabled() {
            return Ok(true);
        }

        let Some(signature) = message.signature().map(<[u8]>::to_vec) else {
            tracing::debug!("message carries no signature");
            return Ok(false);
        };

        message.set_signature(None);
        let bytes = message.payload_bytes();
        message.set_signature(Some(signature.clone()));

        self.verify(&bytes, &signature)
    }

    /// Sign `payload` into the signature header of `headers`, replacing any
    /// earlier signature header.
    ///
    /// No-op when disabled.
    pub fn sign_record<H: RecordHeaders + ?Sized>(
        &self,
        headers: &mut H,
        payload: &[u8],
    ) -> SignerResult<()> {
        if let Some(signature) = self.sign(payload)? {
            headers.remove_headers(RECORD_HEADER_KEY_SIGNATURE);
            headers.add_header(RECORD_HEADER_KEY_SIGNATURE, signature.into_bytes());
        }
        Ok(())
    }

    /// Verify `payload` against the signature header in `headers`.
    ///
    /// A record without the header is an error when enabled: the producer
    /// did not sign it at all, which is different from a bad signature.
    pub fn verify_record<H: RecordHeaders + ?Sized>(
        &self,
        headers: &H,
        payload: &[u8],
    ) -> SignerResult<bool> {
        if !self.is_enabled() {
            return Ok(true);
        }

        let signature = headers
            .last_header(RECORD_HEADER_KEY_SIGNATURE)
            .ok_or_else(|| SignerError::MissingSignature {
                message: format!("record does not contain a '{RECORD_HEADER_KEY_SIGNATURE}' header"),
            })?;

        self.verify(payload, signature)
    }
}
