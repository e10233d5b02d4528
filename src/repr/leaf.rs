//! Leaf encodings and their decoders.
//!
//! The leaf store is a flat byte buffer. How a leaf index maps to bytes, and
//! how those bytes are read, depends on the model's [`LeafEncoding`]:
//!
//! | `leaf_bits` | Encoding            | Leaf region                        |
//! |-------------|---------------------|------------------------------------|
//! | 0           | [`Majority`]        | 1 byte: the class number           |
//! | 8           | [`SoftVote`]        | `n_classes` bytes, each `0..=255`  |
//! | 32          | [`Regression`]      | 4 bytes: little-endian `f32`       |
//!
//! The decoders below are pure functions over byte slices. Callers slice the
//! leaf region with [`LeafEncoding::region`] first; the decoders never index
//! outside what they are given.
//!
//! [`Majority`]: LeafEncoding::Majority
//! [`SoftVote`]: LeafEncoding::SoftVote
//! [`Regression`]: LeafEncoding::Regression

use std::ops::Range;

/// Byte width of a regression leaf.
pub const REGRESSION_LEAF_SIZE: usize = 4;

/// Scale of a soft-vote proportion byte.
pub const PROPORTION_SCALE: f32 = 255.0;

/// Validated leaf encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafEncoding {
    /// Each leaf is one byte holding a class number.
    Majority,
    /// Each leaf is `n_classes` proportion bytes.
    SoftVote,
    /// Each leaf is one packed `f32`.
    Regression,
}

impl LeafEncoding {
    /// Decode the serialized `leaf_bits` discriminant.
    pub const fn from_bits(leaf_bits: i8) -> Option<Self> {
        match leaf_bits {
            0 => Some(Self::Majority),
            8 => Some(Self::SoftVote),
            32 => Some(Self::Regression),
            _ => None,
        }
    }

    /// The serialized `leaf_bits` discriminant.
    pub const fn bits(self) -> u8 {
        match self {
            Self::Majority => 0,
            Self::SoftVote => 8,
            Self::Regression => 32,
        }
    }

    /// Whether leaves carry class information.
    pub const fn is_classification(self) -> bool {
        matches!(self, Self::Majority | Self::SoftVote)
    }

    /// Bytes per leaf.
    #[inline]
    pub const fn leaf_size(self, n_classes: usize) -> usize {
        match self {
            Self::Majority => 1,
            Self::SoftVote => n_classes,
            Self::Regression => REGRESSION_LEAF_SIZE,
        }
    }

    /// Byte range of `leaf` in the leaf buffer.
    #[inline]
    pub const fn region(self, leaf: usize, n_classes: usize) -> Range<usize> {
        let size = self.leaf_size(n_classes);
        let start = leaf * size;
        start..start + size
    }
}

/// Class number stored in a majority-vote leaf.
#[inline]
pub fn majority_class(leaf: &[u8]) -> Option<usize> {
    leaf.first().map(|&class| class as usize)
}

/// Proportion in `[0, 1]` for one soft-vote byte.
///
/// Computed as a true float division; integer division would collapse every
/// proportion below 255 to zero.
#[inline]
pub fn proportion(byte: u8) -> f32 {
    f32::from(byte) / PROPORTION_SCALE
}

/// Add each class proportion of a soft-vote leaf to `scores`.
#[inline]
pub fn accumulate_proportions(leaf: &[u8], scores: &mut [f32]) {
    debug_assert_eq!(leaf.len(), scores.len());
    for (score, &byte) in scores.iter_mut().zip(leaf) {
        *score += proportion(byte);
    }
}

/// Value of a regression leaf.
#[inline]
pub fn regression_value(leaf: &[u8]) -> Option<f32> {
    let bytes: [u8; REGRESSION_LEAF_SIZE] = leaf.get(..REGRESSION_LEAF_SIZE)?.try_into().ok()?;
    Some(f32::from_le_bytes(bytes))
}
