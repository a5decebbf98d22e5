//! Content-addressed plan identity
//!
//! Provides [`PlanHash`], the stable identity of a plan used everywhere
//! instead of object identity.

use crate::label::ActionLabel;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A 32-byte plan hash (Blake3)
///
/// Computed over the length-prefixed sequence of normalized actions, so two
/// hashes are equal iff the action sequences are identical in the same order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlanHash([u8; 32]);

impl PlanHash {
    /// Create a hash from raw bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hash an ordered action sequence
    #[must_use]
    pub fn of_actions(actions: &[ActionLabel]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(actions.len() as u64).to_le_bytes());
        for action in actions {
            let bytes = action.as_str().as_bytes();
            hasher.update(&(bytes.len() as u64).to_le_bytes());
            hasher.update(bytes);
        }
        Self(*hasher.finalize().as_bytes())
    }

    /// Create hash from byte slice
    ///
    /// # Errors
    /// Returns error if slice length is not exactly 32 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, HashError> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| HashError::InvalidLength {
            expected: 32,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    /// Short string representation (first 12 hex chars)
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..6])
    }
}

impl fmt::Debug for PlanHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "PlanHash({})", self.short())
    }
}

impl Display for PlanHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for PlanHash {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes)
    }
}

impl serde::Serialize for PlanHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for PlanHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when parsing plan hashes
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    /// Invalid hash length
    #[error("invalid hash length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Required byte count
        expected: usize,
        /// Byte count found
        actual: usize,
    },

    /// Hex encoding error
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(raw: &[&str]) -> Vec<ActionLabel> {
        raw.iter().map(|a| ActionLabel::normalize(a).unwrap()).collect()
    }

    #[test]
    fn plan_hash_deterministic() {
        let h1 = PlanHash::of_actions(&labels(&["a b", "c"]));
        let h2 = PlanHash::of_actions(&labels(&["a b", "c"]));
        assert_eq!(h1, h2);
    }

    #[test]
    fn plan_hash_order_sensitive() {
        let h1 = PlanHash::of_actions(&labels(&["a", "b"]));
        let h2 = PlanHash::of_actions(&labels(&["b", "a"]));
        assert_ne!(h1, h2);
    }

    #[test]
    fn plan_hash_boundaries_are_not_ambiguous() {
        // "ab" + "c" must differ from "a" + "bc"
        let h1 = PlanHash::of_actions(&labels(&["ab", "c"]));
        let h2 = PlanHash::of_actions(&labels(&["a", "bc"]));
        assert_ne!(h1, h2);
    }

    #[test]
    fn plan_hash_display_and_parse() {
        let hash = PlanHash::of_actions(&labels(&["x"]));
        let parsed: PlanHash = hash.to_string().parse().unwrap();
        assert_eq!(hash, parsed);
        assert!(hash.to_string().starts_with(&hash.short()));
    }

    #[test]
    fn plan_hash_from_slice_invalid_length() {
        let result = PlanHash::from_slice(&[1u8; 31]);
        assert!(matches!(
            result,
            Err(HashError::InvalidLength {
                expected: 32,
                actual: 31
            })
        ));
    }

    #[test]
    fn plan_hash_serde_is_hex_string() {
        let hash = PlanHash::of_actions(&labels(&["x"]));
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json.len(), 66);
        let decoded: PlanHash = serde_json::from_str(&json).unwrap();
        assert_eq!(hash, decoded);
    }
}
