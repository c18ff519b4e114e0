// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stable mark identity.

/// A stable identifier for a mark.
///
/// Identity is what makes diffing keyed rather than positional: the same
/// datum must map to the same `MarkId` across renders, no matter how the
/// input sequence was reordered. Chart code derives ids from datum keys
/// (`category` or `category|series`) via [`MarkId::from_key`]; guide code
/// uses fixed [`MarkId::from_raw`] bases with deterministic offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkId(pub u64);

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

impl MarkId {
    /// Creates an id from a raw value.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Creates an id by hashing a datum key (FNV-1a).
    ///
    /// The hash is fixed and process-independent, so identical keys always
    /// produce identical ids.
    pub fn from_key(key: &str) -> Self {
        let mut h = FNV_OFFSET;
        for b in key.as_bytes() {
            h ^= u64::from(*b);
            h = h.wrapping_mul(FNV_PRIME);
        }
        Self(h)
    }

    /// Creates an id for the `index`-th mark derived from a base id.
    pub const fn offset(self, index: u64) -> Self {
        Self(self.0.wrapping_add(index))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn key_hash_is_stable_and_distinguishes_keys() {
        let a = MarkId::from_key("Germany|exports");
        let b = MarkId::from_key("Germany|exports");
        let c = MarkId::from_key("Germany|imports");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn offset_wraps_instead_of_panicking() {
        let id = MarkId::from_raw(u64::MAX);
        assert_eq!(id.offset(1), MarkId::from_raw(0));
    }
}
