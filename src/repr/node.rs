//! Decision node types.

/// Where a child reference leads.
///
/// Decoded from the raw `i16` stored in [`DecisionNode::left`] and
/// [`DecisionNode::right`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Child {
    /// Continue at `current + offset` in the node store.
    Offset(u16),
    /// Stop; the tree terminates at this leaf index.
    Leaf(u16),
}

impl Child {
    /// Decode a raw child reference.
    ///
    /// Non-negative values are relative offsets; a negative value `c`
    /// terminates at leaf `-(c + 1)`.
    #[inline]
    pub const fn decode(raw: i16) -> Self {
        if raw >= 0 {
            Child::Offset(raw as u16)
        } else {
            // -(raw + 1) is in [0, i16::MAX] for every negative i16
            Child::Leaf((-(raw as i32) - 1) as u16)
        }
    }

    /// Largest offset or leaf index a raw `i16` reference can hold.
    pub const MAX_INDEX: u16 = i16::MAX as u16;

    /// Encode back into the raw stored form.
    ///
    /// Returns `None` if the offset or leaf index exceeds [`Self::MAX_INDEX`].
    #[inline]
    pub const fn encode(self) -> Option<i16> {
        match self {
            Child::Offset(offset) if offset <= Self::MAX_INDEX => Some(offset as i16),
            Child::Leaf(leaf) if leaf <= Self::MAX_INDEX => Some(-(leaf as i16) - 1),
            _ => None,
        }
    }
}

impl From<i16> for Child {
    fn from(raw: i16) -> Self {
        Child::decode(raw)
    }
}

/// One branch point of the shared node store.
///
/// A node goes left if `features[feature] < threshold`, right otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "storage", derive(serde::Serialize, serde::Deserialize))]
pub struct DecisionNode {
    /// Index into the feature vector.
    pub feature: i8,
    /// Comparison value, on the quantized feature scale.
    pub threshold: i16,
    /// Raw left child reference.
    pub left: i16,
    /// Raw right child reference.
    pub right: i16,
}

impl DecisionNode {
    /// Create a node from raw fields.
    pub const fn new(feature: i8, threshold: i16, left: i16, right: i16) -> Self {
        Self {
            feature,
            threshold,
            left,
            right,
        }
    }

    /// Decoded left child.
    #[inline]
    pub const fn left_child(&self) -> Child {
        Child::decode(self.left)
    }

    /// Decoded right child.
    #[inline]
    pub const fn right_child(&self) -> Child {
        Child::decode(self.right)
    }

    /// Raw child chosen for `value`.
    #[inline]
    pub const fn select(&self, value: i16) -> i16 {
        if value < self.threshold {
            self.left
        } else {
            self.right
        }
    }

    /// Both children with their side names, for validation and diagnostics.
    pub(crate) fn children(&self) -> [(&'static str, i16); 2] {
        [("left", self.left), ("right", self.right)]
    }
}
