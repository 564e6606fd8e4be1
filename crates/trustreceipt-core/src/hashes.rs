//! Content hash binding.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use trustreceipt_canonical::Digest;

use crate::config::UncheckedHashPolicy;
use crate::receipt::Receipt;

/// Where a salt is placed relative to the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaltMode {
    /// `sha256(salt ++ content)`.
    #[default]
    Prefix,
    /// `sha256(content ++ salt)`.
    Suffix,
}

/// Salt applied to content before hashing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salt {
    /// Salt bytes.
    pub bytes: Vec<u8>,
    /// Placement of the salt.
    pub mode: SaltMode,
}

impl Salt {
    /// Creates a salt.
    pub fn new(bytes: impl Into<Vec<u8>>, mode: SaltMode) -> Self {
        Self {
            bytes: bytes.into(),
            mode,
        }
    }

    fn digest(&self, content: &[u8]) -> Digest {
        match self.mode {
            SaltMode::Prefix => Digest::sha256_concat(&[self.bytes.as_slice(), content]),
            SaltMode::Suffix => Digest::sha256_concat(&[content, self.bytes.as_slice()]),
        }
    }
}

/// Hash-bearing receipt field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashField {
    /// `input_hash`.
    #[serde(rename = "input_hash")]
    Input,
    /// `output_hash`.
    #[serde(rename = "output_hash")]
    Output,
}

impl HashField {
    /// Receipt member name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HashField::Input => "input_hash",
            HashField::Output => "output_hash",
        }
    }
}

/// Comparison of one declared hash against supplied content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCheck {
    /// Field that was checked.
    pub field: HashField,
    /// Whether the digests matched.
    pub ok: bool,
    /// Declared hash after normalization.
    pub declared: String,
    /// Digest computed from the content.
    pub computed: String,
}

/// Result of the hash binding check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashCheck {
    /// AND over the checked fields; see [`UncheckedHashPolicy`] when empty.
    pub ok: bool,
    /// Fields that were actually checked.
    pub checked: Vec<FieldCheck>,
}

/// Recomputes content digests and compares them with the declared hashes.
///
/// A field is checked only when the receipt declares it and content for it
/// is supplied. Skipped fields do not affect `ok`. A declared value that is
/// not a string never matches.
pub fn verify_hashes(
    receipt: &Receipt,
    input: Option<&[u8]>,
    output: Option<&[u8]>,
    salt: Option<&Salt>,
    unchecked: UncheckedHashPolicy,
) -> HashCheck {
    let candidates = [
        (HashField::Input, receipt.get("input_hash"), input),
        (HashField::Output, receipt.get("output_hash"), output),
    ];

    let checked: Vec<FieldCheck> = candidates
        .into_iter()
        .filter_map(|(field, declared, content)| {
            let (declared, content) = (declared.filter(|v| !v.is_null())?, content?);
            let computed = match salt {
                Some(salt) => salt.digest(content),
                None => Digest::sha256(content),
            };
            let (ok, declared) = match declared {
                Value::String(declared) => (
                    computed.matches_declared(declared),
                    Digest::normalize_declared(declared),
                ),
                other => (false, other.to_string()),
            };
            Some(FieldCheck {
                field,
                ok,
                declared,
                computed: computed.hex,
            })
        })
        .collect();

    let ok = if checked.is_empty() {
        unchecked == UncheckedHashPolicy::Pass
    } else {
        checked.iter().all(|check| check.ok)
    };

    HashCheck { ok, checked }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn receipt_for(input: &[u8], output: &[u8]) -> Receipt {
        Receipt::default()
            .with_member("input_hash", format!("sha256:{}", Digest::sha256(input).hex.to_uppercase()))
            .with_member("output_hash", Digest::sha256(output).hex)
    }

    #[test]
    fn matching_content_passes_both_fields() {
        let receipt = receipt_for(b"prompt", b"completion");
        let check = verify_hashes(
            &receipt,
            Some(&b"prompt"[..]),
            Some(&b"completion"[..]),
            None,
            UncheckedHashPolicy::Pass,
        );
        assert!(check.ok);
        assert_eq!(check.checked.len(), 2);
        assert!(check.checked.iter().all(|c| c.ok));
    }

    #[test]
    fn single_changed_byte_fails_that_field() {
        let receipt = receipt_for(b"prompt", b"completion");
        let check = verify_hashes(
            &receipt,
            Some(&b"prompT"[..]),
            Some(&b"completion"[..]),
            None,
            UncheckedHashPolicy::Pass,
        );
        assert!(!check.ok);
        assert_eq!(check.checked[0].field, HashField::Input);
        assert!(!check.checked[0].ok);
        assert!(check.checked[1].ok);
    }

    #[test]
    fn unsupplied_content_is_skipped() {
        let receipt = receipt_for(b"prompt", b"completion");
        let check = verify_hashes(&receipt, None, Some(&b"completion"[..]), None, UncheckedHashPolicy::Pass);
        assert!(check.ok);
        assert_eq!(check.checked.len(), 1);
        assert_eq!(check.checked[0].field, HashField::Output);
    }

    #[test]
    fn nothing_checked_follows_policy() {
        let receipt = receipt_for(b"prompt", b"completion");
        let pass = verify_hashes(&receipt, None, None, None, UncheckedHashPolicy::Pass);
        assert!(pass.ok);
        assert!(pass.checked.is_empty());

        let fail = verify_hashes(&receipt, None, None, None, UncheckedHashPolicy::Fail);
        assert!(!fail.ok);
    }

    #[test]
    fn undeclared_field_is_skipped_even_with_content() {
        let receipt = Receipt::default()
            .with_member("input_hash", json!(null))
            .with_member("output_hash", Digest::sha256(b"completion").hex);
        let check = verify_hashes(
            &receipt,
            Some(&b"anything"[..]),
            Some(&b"completion"[..]),
            None,
            UncheckedHashPolicy::Fail,
        );
        assert!(check.ok);
        assert_eq!(check.checked.len(), 1);
    }

    #[test]
    fn salt_placement_matters() {
        let prefixed = Digest::sha256(b"pepperprompt").hex;
        let receipt = Receipt::default().with_member("input_hash", prefixed);

        let prefix = Salt::new(b"pepper".to_vec(), SaltMode::Prefix);
        let suffix = Salt::new(b"pepper".to_vec(), SaltMode::Suffix);

        let ok = verify_hashes(&receipt, Some(&b"prompt"[..]), None, Some(&prefix), UncheckedHashPolicy::Pass);
        assert!(ok.ok);

        let wrong = verify_hashes(&receipt, Some(&b"prompt"[..]), None, Some(&suffix), UncheckedHashPolicy::Pass);
        assert!(!wrong.ok);
        assert_eq!(wrong.checked[0].computed, Digest::sha256(b"promptpepper").hex);
    }

    #[test]
    fn non_string_declared_hash_fails_when_checked() {
        let receipt = Receipt::default().with_member("input_hash", json!(42));
        let check = verify_hashes(&receipt, Some(&b"prompt"[..]), None, None, UncheckedHashPolicy::Pass);
        assert!(!check.ok);
        assert_eq!(check.checked[0].declared, "42");

        let skipped = verify_hashes(&receipt, None, None, None, UncheckedHashPolicy::Pass);
        assert!(skipped.ok);
    }
}
