//! Student name digests
//!
//! Provides [`NameDigest`], the SHA-256 value stored in hashed identity
//! records in place of the student's name.

use sha2::{Digest, Sha256};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A 32-byte SHA-256 digest of a normalized student name
///
/// Displayed and parsed as 64 hex characters. Parsing accepts either case, so
/// records written with uppercase hex still match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NameDigest([u8; 32]);

impl NameDigest {
    /// Create a digest from raw bytes
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

    /// Digest a name: `sha256(salt ++ lowercase(trim(name)))`
    #[must_use]
    pub fn of_name(name: &str, salt: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(normalize(name).as_bytes());
        Self(hasher.finalize().into())
    }

    /// Short string representation (first 12 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..6])
    }
}

/// Trim surrounding whitespace and lowercase
#[must_use]
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Display for NameDigest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for NameDigest {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.trim())?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| DigestError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }
}

/// Errors when parsing a stored digest
#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    /// Wrong number of bytes
    #[error("invalid digest length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Bytes required
        expected: usize,
        /// Bytes decoded
        actual: usize,
    },

    /// Not hex
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn digest_ignores_case_and_surrounding_space() {
        assert_eq!(NameDigest::of_name("Alice ", ""), NameDigest::of_name("alice", ""));
        assert_eq!(NameDigest::of_name("  ALICE\t", ""), NameDigest::of_name("alice", ""));
    }

    #[test]
    fn digest_matches_known_sha256() {
        // sha256("alice")
        let expected = "2bd806c97f0e00af1a1fc3328fa763a9269723c8db8fac4f93af71db186d6e90";
        assert_eq!(NameDigest::of_name("Alice", "").to_string(), expected);
    }

    #[test]
    fn salt_changes_digest() {
        assert_ne!(
            NameDigest::of_name("alice", ""),
            NameDigest::of_name("alice", "fall-2026")
        );
    }

    #[test]
    fn inner_whitespace_is_significant() {
        assert_ne!(
            NameDigest::of_name("Ada Lovelace", ""),
            NameDigest::of_name("AdaLovelace", "")
        );
    }

    #[test]
    fn parse_accepts_uppercase_hex() {
        let digest = NameDigest::of_name("bob", "");
        let upper = digest.to_string().to_uppercase();
        assert_eq!(upper.parse::<NameDigest>().unwrap(), digest);
    }

    #[test]
    fn parse_rejects_short_input() {
        let result = "abcd".parse::<NameDigest>();
        assert!(matches!(
            result,
            Err(DigestError::InvalidLength { expected: 32, actual: 2 })
        ));
    }

    #[test]
    fn parse_rejects_non_hex() {
        assert!(matches!(
            "zz".repeat(32).parse::<NameDigest>(),
            Err(DigestError::HexDecode(_))
        ));
    }

    #[test]
    fn short_is_prefix() {
        let digest = NameDigest::of_name("carol", "");
        assert_eq!(digest.short().len(), 12);
        assert!(digest.to_string().starts_with(&digest.short()));
    }

    proptest! {
        #[test]
        fn prop_padding_and_case_do_not_matter(
            name in "[a-zA-Z][a-zA-Z ]{0,20}[a-zA-Z]",
            left in "[ \t]{0,3}",
            right in "[ \t]{0,3}",
        ) {
            let padded = format!("{left}{}{right}", name.to_uppercase());
            prop_assert_eq!(NameDigest::of_name(&padded, "s"), NameDigest::of_name(&name, "s"));
        }
    }
}
