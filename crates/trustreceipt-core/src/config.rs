//! Verifier configuration.
//!
//! Every policy knob lives on the verifier, never on the receipt: an issuer
//! cannot change how its own receipt is scored.

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Weight scheme used when the receipt carries no authoritative score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightScheme {
    /// schema 50, hashes 40, signature 5, anchor 5.
    #[default]
    Standard,
    /// signature 40, hashes 40, anchor 20; schema not weighted.
    Simple,
}

/// Outcome of the hash check when no field could be checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UncheckedHashPolicy {
    /// Nothing checked counts as passed.
    #[default]
    Pass,
    /// Nothing checked counts as failed.
    Fail,
}

/// How `signature.alg` is compared with `ed25519`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgMatching {
    /// Byte-exact match.
    #[default]
    Exact,
    /// ASCII case-insensitive match.
    CaseInsensitive,
}

impl AlgMatching {
    /// Whether `alg` names Ed25519 under this rule.
    pub fn is_ed25519(&self, alg: &str) -> bool {
        match self {
            AlgMatching::Exact => alg == "ed25519",
            AlgMatching::CaseInsensitive => alg.eq_ignore_ascii_case("ed25519"),
        }
    }
}

/// Configuration for a [`ReceiptVerifier`](crate::ReceiptVerifier).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifierConfig {
    /// Trust score weights.
    pub weights: WeightScheme,
    /// Result of a hash check that checked nothing.
    pub unchecked_hashes: UncheckedHashPolicy,
    /// `alg` comparison rule.
    pub alg_matching: AlgMatching,
}

impl VerifierConfig {
    /// Parses a configuration from JSON; absent keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json).map_err(|e| CoreError::InvalidConfig(e.to_string()))
    }
}
