use serde_json::Value;

use crate::digest::Digest;
use std::fmt;

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// A required subset field is absent from the receipt.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// Provided JSON could not be canonicalized.
    #[error("invalid JSON structure: {0}")]
    InvalidStructure(String),
    /// Non-finite number (NaN/Infinity) detected.
    #[error("non-finite number detected at {0}")]
    NonFiniteNumber(String),
    /// Generic failure.
    #[error("other error: {0}")]
    Other(String),
}

/// Canonical UTF-8 bytes produced by a [`Canonicalizer`].
///
/// These are the exact bytes a signer signs and a verifier verifies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalBytes {
    bytes: Vec<u8>,
}

impl CanonicalBytes {
    /// Raw canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Canonical form as a string slice (always valid UTF-8).
    pub fn as_str(&self) -> &str {
        // Built from a `String` in `Canonicalizer::canonicalize`.
        std::str::from_utf8(&self.bytes).unwrap_or_default()
    }

    /// SHA-256 digest of the canonical bytes.
    pub fn digest(&self) -> Digest {
        Digest::sha256(&self.bytes)
    }
}

/// Helper for building JSON paths during validation.
#[derive(Debug, Clone)]
struct Path {
    segments: Vec<String>,
}

impl Path {
    fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }

    fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{}]", index));
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

/// Canonicalizer that emits deterministic bytes (RFC 8785 / JCS).
///
/// Object keys are sorted at every depth, array order is preserved and no
/// insignificant whitespace is emitted. Strings keep raw UTF-8 with only the
/// mandatory escapes, and numbers use the ECMAScript shortest form, so the
/// output is byte-identical to `JSON.stringify` over key-sorted objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct Canonicalizer;

impl Canonicalizer {
    /// Produces canonical bytes for an arbitrary JSON value.
    pub fn canonicalize(&self, value: &Value) -> Result<CanonicalBytes, CanonicalizationError> {
        self.validate(value, Path::root())?;

        let canonical = serde_jcs::to_string(value)
            .map_err(|err| CanonicalizationError::Other(err.to_string()))?;

        Ok(CanonicalBytes {
            bytes: canonical.into_bytes(),
        })
    }

    /// Rejects values that have no canonical form.
    #[allow(clippy::only_used_in_recursion)]
    fn validate(&self, value: &Value, path: Path) -> Result<(), CanonicalizationError> {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    self.validate(child, path.push_field(key))?;
                }
                Ok(())
            }
            Value::Array(items) => {
                for (idx, item) in items.iter().enumerate() {
                    self.validate(item, path.push_index(idx))?;
                }
                Ok(())
            }
            Value::Number(num) => match num.as_f64() {
                Some(f) if !f.is_finite() => {
                    Err(CanonicalizationError::NonFiniteNumber(path.to_string()))
                }
                _ => Ok(()),
            },
            Value::String(_) | Value::Bool(_) | Value::Null => Ok(()),
        }
    }
}
