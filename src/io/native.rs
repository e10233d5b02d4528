//! Native container format for tree ensembles.
//!
//! # Format Structure
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Header (16 bytes)                        │
//! ├────────────────────────────────────────────────────────────┤
//! │              Postcard payload (variable)                    │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use boosters_lite::io::ModelCodec;
//! use boosters_lite::{DecisionNode, TreeEnsemble};
//!
//! let model = TreeEnsemble::new(
//!     vec![DecisionNode::new(0, 10, -1, -2)],
//!     vec![0],
//!     vec![0, 1],
//!     0,
//!     1,
//!     2,
//! )
//! .unwrap();
//!
//! let codec = ModelCodec::new();
//! let bytes = codec.serialize(&model).unwrap();
//! let loaded = codec.deserialize(&bytes).unwrap();
//! assert_eq!(loaded, model);
//! ```

use std::io::{Read, Write};

use thiserror::Error;
use tracing::debug;

use crate::error::ModelError;
use crate::repr::TreeEnsemble;

use super::payload::EnsemblePayload;

// ============================================================================
// Constants
// ============================================================================

/// Magic bytes identifying a model container.
pub const MAGIC: &[u8; 4] = b"BLTE";

/// Size of the header in bytes.
pub const HEADER_SIZE: usize = 16;

// ============================================================================
// Format Header
// ============================================================================

/// 16-byte container header.
///
/// # Layout
///
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0       4     Magic ("BLTE")
/// 4       1     leaf_bits of the payload model
/// 5       3     Reserved
/// 8       4     Payload size (bytes, little-endian)
/// 12      4     CRC32 checksum of payload (little-endian)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatHeader {
    /// Leaf encoding of the stored model.
    pub leaf_bits: u8,
    /// Size of the payload in bytes.
    pub payload_size: u32,
    /// CRC32 checksum of the payload.
    pub checksum: u32,
}

impl FormatHeader {
    /// Header for `payload` describing a model with `leaf_bits`.
    pub fn for_payload(leaf_bits: u8, payload: &[u8]) -> Self {
        Self {
            leaf_bits,
            payload_size: payload.len() as u32,
            checksum: compute_checksum(payload),
        }
    }

    /// Serialize header to 16 bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(MAGIC);
        buf[4] = self.leaf_bits;
        buf[8..12].copy_from_slice(&self.payload_size.to_le_bytes());
        buf[12..16].copy_from_slice(&self.checksum.to_le_bytes());
        buf
    }

    /// Parse header from 16 bytes.
    pub fn from_bytes(buf: &[u8; HEADER_SIZE]) -> Result<Self, DeserializeError> {
        if &buf[0..4] != MAGIC {
            return Err(DeserializeError::NotAModel);
        }

        Ok(Self {
            leaf_bits: buf[4],
            payload_size: u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]),
            checksum: u32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]),
        })
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during serialization.
#[derive(Debug, Error)]
pub enum SerializeError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Postcard encoding error.
    #[error("encoding error: {0}")]
    Encoding(#[from] postcard::Error),
}

/// Errors that can occur during deserialization.
#[derive(Debug, Error)]
pub enum DeserializeError {
    /// Blob does not start with the container magic.
    #[error("not a model container")]
    NotAModel,

    /// Blob was truncated or incomplete.
    #[error("container truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// Payload checksum doesn't match.
    #[error("checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// Header and payload disagree on the leaf encoding.
    #[error("header says leaf_bits={header}, payload says {payload}")]
    LeafBitsMismatch { header: u8, payload: i8 },

    /// I/O error during reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Postcard decoding error.
    #[error("decoding error: {0}")]
    Decoding(#[from] postcard::Error),

    /// Payload decoded but the model is structurally invalid.
    #[error("invalid model: {0}")]
    Model(#[from] ModelError),
}

// ============================================================================
// CRC32 Helper
// ============================================================================

/// Compute CRC32 checksum of data.
pub fn compute_checksum(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

// ============================================================================
// Model Codec
// ============================================================================

/// Codec for reading and writing model containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelCodec;

impl ModelCodec {
    /// Create a codec.
    pub fn new() -> Self {
        Self
    }

    /// Write a model container to `writer`.
    pub fn write_to<W: Write>(
        &self,
        writer: &mut W,
        ensemble: &TreeEnsemble,
    ) -> Result<(), SerializeError> {
        let payload = postcard::to_allocvec(&EnsemblePayload::from(ensemble))?;
        let header = FormatHeader::for_payload(ensemble.leaf_bits(), &payload);

        writer.write_all(&header.to_bytes())?;
        writer.write_all(&payload)?;
        Ok(())
    }

    /// Read and validate a model container from `reader`.
    pub fn read_from<R: Read>(&self, reader: &mut R) -> Result<TreeEnsemble, DeserializeError> {
        let mut header_buf = [0u8; HEADER_SIZE];
        reader.read_exact(&mut header_buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                DeserializeError::Truncated {
                    expected: HEADER_SIZE,
                    actual: 0,
                }
            } else {
                DeserializeError::Io(e)
            }
        })?;
        let header = FormatHeader::from_bytes(&header_buf)?;

        let expected = header.payload_size as usize;
        // grows with the bytes actually read; the header size is untrusted
        let mut payload = Vec::new();
        reader.take(expected as u64).read_to_end(&mut payload)?;
        if payload.len() != expected {
            return Err(DeserializeError::Truncated {
                expected,
                actual: payload.len(),
            });
        }

        let actual = compute_checksum(&payload);
        if actual != header.checksum {
            return Err(DeserializeError::ChecksumMismatch {
                expected: header.checksum,
                actual,
            });
        }

        let decoded: EnsemblePayload = postcard::from_bytes(&payload)?;
        if decoded.leaf_bits as u8 != header.leaf_bits {
            return Err(DeserializeError::LeafBitsMismatch {
                header: header.leaf_bits,
                payload: decoded.leaf_bits,
            });
        }

        let ensemble = TreeEnsemble::try_from(decoded)?;
        debug!(
            nodes = ensemble.n_nodes(),
            trees = ensemble.n_trees(),
            leaves = ensemble.n_leaves(),
            leaf_bits = ensemble.leaf_bits(),
            "model loaded"
        );
        Ok(ensemble)
    }

    /// Serialize a model into a new container.
    pub fn serialize(&self, ensemble: &TreeEnsemble) -> Result<Vec<u8>, SerializeError> {
        let mut output = Vec::new();
        self.write_to(&mut output, ensemble)?;
        Ok(output)
    }

    /// Deserialize and validate a model from a container blob.
    pub fn deserialize(&self, bytes: &[u8]) -> Result<TreeEnsemble, DeserializeError> {
        let mut cursor = bytes;
        self.read_from(&mut cursor)
    }
}

// ============================================================================
// Tests
// ============================================================================
