//! Trust score aggregation.

use serde::{Deserialize, Serialize};

use crate::config::WeightScheme;
use crate::receipt::Receipt;

/// Component weights in points out of 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weights {
    /// Schema gate weight.
    pub schema: u8,
    /// Hash binding weight.
    pub hashes: u8,
    /// Signature weight.
    pub signature: u8,
    /// Anchor weight.
    pub anchor: u8,
}

impl WeightScheme {
    /// Points each component contributes when it passes.
    pub fn weights(&self) -> Weights {
        match self {
            WeightScheme::Standard => Weights {
                schema: 50,
                hashes: 40,
                signature: 5,
                anchor: 5,
            },
            WeightScheme::Simple => Weights {
                schema: 0,
                hashes: 40,
                signature: 40,
                anchor: 20,
            },
        }
    }
}

/// Component outcomes fed to the scorer. `None` means the component did not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreParts {
    /// Schema gate passed.
    pub schema_ok: Option<bool>,
    /// Hash binding passed.
    pub hashes_ok: Option<bool>,
    /// Signature verified.
    pub signature_ok: Option<bool>,
    /// Anchors well-formed.
    pub anchor_ok: Option<bool>,
}

/// Where a trust score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    /// Taken from the receipt's `trustscore`.
    Declared,
    /// Computed from component outcomes.
    Computed,
}

/// Final 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustScore {
    /// Score value.
    pub value: u8,
    /// Origin of the value.
    pub source: ScoreSource,
}

/// Computes the trust score of a receipt.
///
/// A finite numeric `trustscore` on the receipt is authoritative and is only
/// clamped to `[0, 100]` and rounded. Otherwise every component that ran and
/// passed adds its weight under `scheme`.
pub fn compute_trust_score(receipt: &Receipt, parts: &ScoreParts, scheme: WeightScheme) -> TrustScore {
    if let Some(declared) = receipt.declared_trustscore() {
        return TrustScore {
            value: declared.clamp(0.0, 100.0).round() as u8,
            source: ScoreSource::Declared,
        };
    }

    let weights = scheme.weights();
    let earned = [
        (parts.schema_ok, weights.schema),
        (parts.hashes_ok, weights.hashes),
        (parts.signature_ok, weights.signature),
        (parts.anchor_ok, weights.anchor),
    ]
    .into_iter()
    .filter(|(ok, _)| *ok == Some(true))
    .map(|(_, weight)| u32::from(weight))
    .sum::<u32>();

    TrustScore {
        value: earned.min(100) as u8,
        source: ScoreSource::Computed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn all_true() -> ScoreParts {
        ScoreParts {
            schema_ok: Some(true),
            hashes_ok: Some(true),
            signature_ok: Some(true),
            anchor_ok: Some(true),
        }
    }

    fn with_trustscore(score: serde_json::Value) -> Receipt {
        Receipt::default().with_member("trustscore", score)
    }

    #[test]
    fn schemes_sum_to_one_hundred() {
        for scheme in [WeightScheme::Standard, WeightScheme::Simple] {
            let w = scheme.weights();
            assert_eq!(u32::from(w.schema) + u32::from(w.hashes) + u32::from(w.signature) + u32::from(w.anchor), 100);
        }
    }

    #[test]
    fn declared_score_is_clamped() {
        let parts = ScoreParts::default();
        let high = compute_trust_score(&with_trustscore(json!(150)), &parts, WeightScheme::Standard);
        assert_eq!(high, TrustScore { value: 100, source: ScoreSource::Declared });
        let low = compute_trust_score(&with_trustscore(json!(-5)), &parts, WeightScheme::Standard);
        assert_eq!(low.value, 0);
    }

    #[test]
    fn declared_score_ignores_components() {
        let score = compute_trust_score(&with_trustscore(json!(85)), &ScoreParts::default(), WeightScheme::Standard);
        assert_eq!(score.value, 85);
        let score = compute_trust_score(&with_trustscore(json!(85)), &all_true(), WeightScheme::Simple);
        assert_eq!(score.value, 85);
    }

    #[test]
    fn fractional_declared_score_rounds() {
        let score = compute_trust_score(&with_trustscore(json!(84.5)), &ScoreParts::default(), WeightScheme::Standard);
        assert_eq!(score.value, 85);
    }

    #[test]
    fn non_numeric_trustscore_is_recomputed() {
        let score = compute_trust_score(&with_trustscore(json!("85")), &all_true(), WeightScheme::Standard);
        assert_eq!(score, TrustScore { value: 100, source: ScoreSource::Computed });
    }

    #[test]
    fn all_components_give_full_score() {
        let receipt = Receipt::default();
        assert_eq!(compute_trust_score(&receipt, &all_true(), WeightScheme::Standard).value, 100);
        assert_eq!(compute_trust_score(&receipt, &all_true(), WeightScheme::Simple).value, 100);
    }

    #[test]
    fn only_hashes_under_standard_is_forty() {
        let parts = ScoreParts {
            schema_ok: Some(false),
            hashes_ok: Some(true),
            signature_ok: Some(false),
            anchor_ok: Some(false),
        };
        assert_eq!(compute_trust_score(&Receipt::default(), &parts, WeightScheme::Standard).value, 40);
    }

    #[test]
    fn components_that_did_not_run_add_nothing() {
        let parts = ScoreParts {
            schema_ok: None,
            ..all_true()
        };
        assert_eq!(compute_trust_score(&Receipt::default(), &parts, WeightScheme::Standard).value, 50);
        assert_eq!(compute_trust_score(&Receipt::default(), &parts, WeightScheme::Simple).value, 100);
    }
}
