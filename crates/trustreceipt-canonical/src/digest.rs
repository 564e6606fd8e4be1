use serde::{Deserialize, Serialize};
use sha2::{Digest as Sha2Digest, Sha256};
use std::fmt;

/// Algorithm tags accepted in front of a declared hash, lowercase.
const ALGORITHM_TAGS: [&str; 2] = ["sha256:", "sha-256:"];

/// Supported digest algorithms for content binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlg {
    /// SHA-256, the only algorithm receipts bind content with.
    #[serde(rename = "sha256")]
    Sha256,
}

impl DigestAlg {
    /// Tag used when rendering a prefixed digest.
    pub fn tag(&self) -> &'static str {
        match self {
            DigestAlg::Sha256 => "sha256",
        }
    }
}

/// Algorithm + lowercase hex digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest {
    /// Digest algorithm (currently always `sha256`).
    pub alg: DigestAlg,
    /// Lowercase hex digest bytes.
    pub hex: String,
}

impl Digest {
    /// SHA-256 of `bytes`.
    pub fn sha256(bytes: &[u8]) -> Self {
        Self::sha256_concat(&[bytes])
    }

    /// SHA-256 over the concatenation of `parts`, in order.
    pub fn sha256_concat(parts: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        Digest {
            alg: DigestAlg::Sha256,
            hex: hex::encode(hasher.finalize()),
        }
    }

    /// Normalizes a declared hash for comparison.
    ///
    /// Trims whitespace, lowercases, and strips one leading `sha256:` or
    /// `sha-256:` tag. Other tags are left in place so they never compare
    /// equal to a SHA-256 hex digest.
    pub fn normalize_declared(declared: &str) -> String {
        let lowered = declared.trim().to_ascii_lowercase();
        for tag in ALGORITHM_TAGS {
            if let Some(rest) = lowered.strip_prefix(tag) {
                return rest.to_string();
            }
        }
        lowered
    }

    /// Whether a declared hash string names this digest.
    pub fn matches_declared(&self, declared: &str) -> bool {
        Self::normalize_declared(declared) == self.hex
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.alg.tag(), self.hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn sha256_matches_known_vector() {
        assert_eq!(Digest::sha256(b"abc").hex, ABC_SHA256);
    }

    #[test]
    fn concat_equals_hash_of_joined_bytes() {
        assert_eq!(Digest::sha256_concat(&[b"a".as_slice(), b"bc".as_slice()]), Digest::sha256(b"abc"));
    }

    #[test]
    fn declared_hash_normalization() {
        let digest = Digest::sha256(b"abc");
        assert!(digest.matches_declared(ABC_SHA256));
        assert!(digest.matches_declared(&format!("sha256:{}", ABC_SHA256.to_uppercase())));
        assert!(digest.matches_declared(&format!("SHA-256:{}", ABC_SHA256)));
        assert!(!digest.matches_declared(&format!("sha512:{}", ABC_SHA256)));
    }

    #[test]
    fn display_includes_tag() {
        assert_eq!(
            Digest::sha256(b"abc").to_string(),
            format!("sha256:{}", ABC_SHA256)
        );
    }
}
