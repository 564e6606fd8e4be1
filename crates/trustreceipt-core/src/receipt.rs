//! Receipt data model.
//!
//! A receipt is kept as the JSON object it was issued as. Known members are
//! read through accessors that tolerate any JSON type, so a wrongly typed
//! member shows up as a failed check (and a schema violation) rather than a
//! parse error, and the signed message is built from exactly the values the
//! issuer wrote.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::OnceLock;
use trustreceipt_canonical::{canonical_subset, CanonicalBytes, Canonicalizer};

use crate::errors::CoreError;

/// Trust receipt binding an AI input/output pair to model and policy versions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Receipt {
    document: Map<String, Value>,
}

/// External anchoring claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofRef {
    /// Kind of anchor (e.g. `ANCHOR`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Ledger or network name (e.g. `ethereum-sepolia`).
    pub network: String,
    /// Transaction reference on that network.
    pub tx: String,
    /// Optional finality level reported by the issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finality_level: Option<String>,
}

impl ProofRef {
    /// Reads a structurally complete proof reference out of a raw entry.
    ///
    /// Returns `None` unless `type`, `network` and `tx` are non-empty strings.
    pub fn from_value(value: &Value) -> Option<Self> {
        let proof: ProofRef = serde_json::from_value(value.clone()).ok()?;
        let complete = !proof.kind.is_empty() && !proof.network.is_empty() && !proof.tx.is_empty();
        complete.then_some(proof)
    }
}

/// `proof_refs` member as found in a receipt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProofRefs<'a> {
    /// Absent or `null`.
    Absent,
    /// A JSON array of raw entries.
    List(&'a [Value]),
    /// Present but not an array.
    Malformed(&'a Value),
}

/// Signature block, normalized from either accepted `signature` shape.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReceiptSignature {
    /// Signature algorithm, `ed25519`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    /// Key identifier, `ed25519:<hex public key>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// Base64 signature bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sig: Option<String>,
}

fn compact_signature_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(did:web:[^#\s]+#\S+)\s+sig:(\S+)$").expect("invalid regex")
    })
}

/// Falsy JSON values: the member counts as not provided.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}

impl ReceiptSignature {
    /// Parses the compact `did:web:<domain>#<key> sig:<data>` form.
    ///
    /// Unparseable strings give an empty block, which verifies as
    /// `sig_missing`.
    pub fn from_compact(compact: &str) -> Self {
        match compact_signature_pattern().captures(compact.trim()) {
            Some(caps) => ReceiptSignature {
                alg: None,
                kid: Some(caps[1].to_string()),
                sig: Some(caps[2].to_string()),
            },
            None => ReceiptSignature::default(),
        }
    }

    /// Reads a `signature` member of any JSON type.
    ///
    /// Falsy values (`null`, `false`, `0`, `""`) are "not provided". Object
    /// members of the wrong type are dropped, except a non-string `alg`,
    /// which is kept as its JSON text so it never names Ed25519. Any other
    /// truthy non-object, non-string value gives an empty block.
    pub fn from_value(value: &Value) -> Option<Self> {
        if is_falsy(value) {
            return None;
        }
        let block = match value {
            Value::String(compact) => Self::from_compact(compact),
            Value::Object(members) => ReceiptSignature {
                alg: members.get("alg").and_then(|alg| match alg {
                    Value::Null => None,
                    Value::String(s) => Some(s.clone()),
                    other => Some(other.to_string()),
                }),
                kid: members.get("kid").and_then(Value::as_str).map(str::to_string),
                sig: members.get("sig").and_then(Value::as_str).map(str::to_string),
            },
            _ => ReceiptSignature::default(),
        };
        Some(block)
    }
}

impl Receipt {
    /// Wraps a JSON document; only a JSON object is a receipt.
    pub fn from_value(document: Value) -> Result<Self, CoreError> {
        match document {
            Value::Object(document) => Ok(Self { document }),
            _ => Err(CoreError::InvalidReceipt(
                "receipt must be a JSON object".to_string(),
            )),
        }
    }

    /// Parses a receipt from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let document: Value = serde_json::from_str(json)?;
        Self::from_value(document)
    }

    /// JSON document form of the receipt, exactly as held.
    pub fn to_value(&self) -> Value {
        Value::Object(self.document.clone())
    }

    /// Raw member lookup.
    pub fn get(&self, member: &str) -> Option<&Value> {
        self.document.get(member)
    }

    /// Sets a member, returning the previous value.
    pub fn set(&mut self, member: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.document.insert(member.into(), value.into())
    }

    /// Removes a member.
    pub fn remove(&mut self, member: &str) -> Option<Value> {
        self.document.remove(member)
    }

    /// Builder form of [`Receipt::set`].
    pub fn with_member(mut self, member: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(member, value);
        self
    }

    /// `id` when it is a string.
    pub fn id(&self) -> Option<&str> {
        self.get("id").and_then(Value::as_str)
    }

    /// Issuer-declared score, when it is a finite number.
    pub fn declared_trustscore(&self) -> Option<f64> {
        self.get("trustscore")
            .and_then(Value::as_f64)
            .filter(|score| score.is_finite())
    }

    /// The `proof_refs` member by shape.
    pub fn proof_refs(&self) -> ProofRefs<'_> {
        match self.get("proof_refs") {
            None | Some(Value::Null) => ProofRefs::Absent,
            Some(Value::Array(entries)) => ProofRefs::List(entries),
            Some(other) => ProofRefs::Malformed(other),
        }
    }

    /// Signature block, or `None` when no signature is provided.
    pub fn signature_block(&self) -> Option<ReceiptSignature> {
        self.get("signature").and_then(ReceiptSignature::from_value)
    }

    /// Copy of the receipt carrying `block` as its `signature`.
    pub fn with_signature(&self, block: &ReceiptSignature) -> Result<Self, CoreError> {
        let mut receipt = self.clone();
        receipt.set("signature", serde_json::to_value(block)?);
        Ok(receipt)
    }

    /// Canonical message covered by the receipt signature.
    ///
    /// Built from the subset members as written, including `null` and
    /// non-string values.
    pub fn canonical_message(&self, canonicalizer: &Canonicalizer) -> Result<CanonicalBytes, CoreError> {
        Ok(canonical_subset(self, canonicalizer)?)
    }
}
