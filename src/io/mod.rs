//! Model container I/O.
//!
//! The export pipeline hands over a model as an opaque blob. This module
//! defines that blob: a 16-byte header followed by a Postcard-encoded
//! [`EnsemblePayload`].
//!
//! # Feature Flags
//!
//! - `storage`: enables this module (on by default)

pub mod native;
pub mod payload;

pub use native::{
    compute_checksum, DeserializeError, FormatHeader, ModelCodec, SerializeError, HEADER_SIZE, MAGIC,
};
pub use payload::EnsemblePayload;
