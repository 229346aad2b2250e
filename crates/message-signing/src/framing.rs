//! Framing header stripping.
//!
//! Binary record encodings prepend a marker and a schema identifier to the
//! record body. The identifier is transport metadata: the same record can be
//! re-registered under another schema id without changing meaning. Signing
//! the bytes after the header keeps signatures stable across registries.
//!
//! Producer and consumer must strip identically; a mismatch shows up as
//! verification failures, never as corrupted payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SignerError, SignerResult};

/// Wire framing of the envelopes handed to the signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderFraming {
    /// Schema-registry wire format: `0x00` followed by a 4-byte schema id.
    #[default]
    Confluent,
    /// Avro single-object encoding: `0xC3 0x01` followed by an 8-byte
    /// schema fingerprint.
    AvroSingleObject,
}

impl HeaderFraming {
    pub fn marker(&self) -> &'static [u8] {
        match self {
            Self::Confluent => &[0x00],
            Self::AvroSingleObject => &[0xC3, 0x01],
        }
    }

    /// Total header length: marker plus identifier.
    pub fn header_len(&self) -> usize {
        match self {
            Self::Confluent => 1 + 4,
            Self::AvroSingleObject => 2 + 8,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Confluent => "confluent",
            Self::AvroSingleObject => "avro-single-object",
        }
    }
}

impl fmt::Display for HeaderFraming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Removes the framing header from envelopes before they are hashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderStripper {
    framing: HeaderFraming,
    enabled: bool,
}

impl HeaderStripper {
    pub fn new(framing: HeaderFraming, enabled: bool) -> Self {
        Self { framing, enabled }
    }

    /// Identity transform.
    pub fn disabled() -> Self {
        Self::new(HeaderFraming::default(), false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn framing(&self) -> HeaderFraming {
        self.framing
    }

    /// Return the semantic payload of `envelope`.
    ///
    /// Fails when stripping is enabled and the envelope is shorter than the
    /// header or does not start with the framing marker. Identifier bytes
    /// are never inspected.
    pub fn strip<'a>(&self, envelope: &'a [u8]) -> SignerResult<&'a [u8]> {
        if !self.enabled {
            return Ok(envelope);
        }

        let header_len = self.framing.header_len();
        if envelope.len() < header_len {
            return Err(SignerError::MalformedEnvelope {
                expected: format!("at least {header_len} bytes of {} framing", self.framing),
                actual: format!("{} bytes", envelope.len()),
            });
        }

        let marker = self.framing.marker();
        if !envelope.starts_with(marker) {
            return Err(SignerError::MalformedEnvelope {
                expected: format!("{} marker {}", self.framing, hex::encode(marker)),
                actual: hex::encode(&envelope[..marker.len()]),
            });
        }

        Ok(&envelope[header_len..])
    }
}

impl Default for HeaderStripper {
    fn default() -> Self {
        Self::disabled()
    }
}
