//! Canonical subset extraction.
//!
//! The signed message of a receipt is the canonical form of exactly six
//! top-level fields. Every other member (signature, proof references,
//! extensions) is excluded, so adding metadata never invalidates a signature.

use crate::{CanonicalBytes, CanonicalizationError, Canonicalizer};
use serde::Serialize;
use serde_json::{Map, Value};

/// Fields that make up the canonical subset, in their logical order.
pub const SUBSET_FIELDS: [&str; 6] = [
    "id",
    "issued_at",
    "input_hash",
    "output_hash",
    "model_version",
    "policy_version",
];

/// Builds the subset object from a receipt document.
///
/// # Errors
///
/// Returns [`CanonicalizationError::MissingField`] for the first absent
/// subset field, or [`CanonicalizationError::InvalidStructure`] when the
/// document is not a JSON object.
pub fn extract_subset(document: &Value) -> Result<Value, CanonicalizationError> {
    let object = document.as_object().ok_or_else(|| {
        CanonicalizationError::InvalidStructure("receipt must be a JSON object".to_string())
    })?;

    let mut subset = Map::new();
    for field in SUBSET_FIELDS {
        let value = object
            .get(field)
            .ok_or(CanonicalizationError::MissingField(field))?;
        subset.insert(field.to_string(), value.clone());
    }
    Ok(Value::Object(subset))
}

impl Canonicalizer {
    /// Canonical bytes of the six-field subset of a receipt document.
    ///
    /// # Example
    ///
    /// ```rust
    /// use trustreceipt_canonical::Canonicalizer;
    /// use serde_json::json;
    ///
    /// let receipt = json!({
    ///     "policy_version": "policy-v1.0",
    ///     "model_version": "gpt-x-2025-09-01",
    ///     "output_hash": "bb",
    ///     "input_hash": "aa",
    ///     "issued_at": "2025-09-10T12:00:00Z",
    ///     "id": "rec_1",
    ///     "trustscore": 85
    /// });
    ///
    /// let bytes = Canonicalizer::default().canonicalize_subset(&receipt)?;
    /// assert!(bytes.as_str().starts_with(r#"{"id":"rec_1","input_hash":"aa""#));
    /// assert!(!bytes.as_str().contains("trustscore"));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn canonicalize_subset(
        &self,
        document: &Value,
    ) -> Result<CanonicalBytes, CanonicalizationError> {
        let subset = extract_subset(document)?;
        self.canonicalize(&subset)
    }
}

/// Serializes a typed receipt and returns its canonical subset bytes.
///
/// # Errors
///
/// Returns [`CanonicalizationError::Other`] if serialization fails, otherwise
/// the errors of [`Canonicalizer::canonicalize_subset`].
pub fn canonical_subset<T: Serialize>(
    receipt: &T,
    canonicalizer: &Canonicalizer,
) -> Result<CanonicalBytes, CanonicalizationError> {
    let value = serde_json::to_value(receipt)
        .map_err(|e| CanonicalizationError::Other(format!("serialization failed: {}", e)))?;
    canonicalizer.canonicalize_subset(&value)
}
