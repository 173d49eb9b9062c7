//! # Value Objects
//!
//! Evidence attached to provenance events. An event carries either a digest
//! of externally held evidence, the evidence itself, or nothing.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::errors::ProvenanceError;

/// SHA-256 digest of an off-chain payload.
///
/// Lowercase hex on the wire. Parsing accepts either case.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    pub const LEN: usize = 32;

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Digest of `data`.
    pub fn of(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for ContentHash {
    type Err = ProvenanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| {
            ProvenanceError::InvalidArgument(format!("content hash {:?} is not hex: {}", s, e))
        })?;
        let digest: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
            ProvenanceError::InvalidArgument(format!(
                "content hash must be {} bytes, got {}",
                Self::LEN,
                b.len()
            ))
        })?;
        Ok(Self(digest))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.to_hex())
    }
}

impl Serialize for ContentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Evidence embedded directly in the on-chain record. Base64 on the wire.
#[derive(Clone, PartialEq, Eq)]
pub struct OnChainPayload(Vec<u8>);

impl OnChainPayload {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self(data.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
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

    pub fn from_base64(s: &str) -> Result<Self, ProvenanceError> {
        BASE64
            .decode(s)
            .map(Self)
            .map_err(|e| ProvenanceError::InvalidArgument(format!("payload is not base64: {}", e)))
    }

    /// Digest of the embedded payload.
    pub fn content_hash(&self) -> ContentHash {
        ContentHash::of(&self.0)
    }
}

impl fmt::Debug for OnChainPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OnChainPayload({} bytes)", self.0.len())
    }
}

/// Evidence backing a provenance event.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "EvidenceWire", into = "EvidenceWire")]
pub enum Evidence {
    /// Lightweight model: digest of externally held evidence.
    OffChain(ContentHash),
    /// Naive model: the evidence itself.
    OnChain(OnChainPayload),
    #[default]
    None,
}

impl Evidence {
    pub fn content_hash(&self) -> Option<ContentHash> {
        match self {
            Evidence::OffChain(hash) => Some(*hash),
            Evidence::OnChain(payload) => Some(payload.content_hash()),
            Evidence::None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Evidence::None)
    }
}

/// Wire form: at most one of the two fields, empty strings mean absent.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct EvidenceWire {
    #[serde(
        rename = "offChainDataHash",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    off_chain_data_hash: Option<String>,
    #[serde(
        rename = "onChainDataPayload",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    on_chain_data_payload: Option<String>,
}

impl TryFrom<EvidenceWire> for Evidence {
    type Error = ProvenanceError;

    fn try_from(wire: EvidenceWire) -> Result<Self, Self::Error> {
        let hash = wire.off_chain_data_hash.filter(|s| !s.is_empty());
        let payload = wire.on_chain_data_payload.filter(|s| !s.is_empty());
        match (hash, payload) {
            (Some(_), Some(_)) => Err(ProvenanceError::InvalidArgument(
                "event carries both offChainDataHash and onChainDataPayload".to_string(),
            )),
            (Some(hash), None) => Ok(Evidence::OffChain(hash.parse()?)),
            (None, Some(payload)) => Ok(Evidence::OnChain(OnChainPayload::from_base64(&payload)?)),
            (None, None) => Ok(Evidence::None),
        }
    }
}

impl From<Evidence> for EvidenceWire {
    fn from(evidence: Evidence) -> Self {
        match evidence {
            Evidence::OffChain(hash) => EvidenceWire {
                off_chain_data_hash: Some(hash.to_hex()),
                on_chain_data_payload: None,
            },
            Evidence::OnChain(payload) => EvidenceWire {
                off_chain_data_hash: None,
                on_chain_data_payload: Some(payload.to_base64()),
            },
            Evidence::None => EvidenceWire::default(),
        }
    }
}
