//! Proof reference (anchor) validation.

use serde::{Deserialize, Serialize};

use crate::receipt::{ProofRef, ProofRefs, Receipt};

/// Result of the anchor check.
///
/// `count == 0` with `ok == true` means "no anchor evidence", which callers
/// should treat differently from "anchor evidence present but malformed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorCheck {
    /// Every proof reference is structurally complete.
    pub ok: bool,
    /// Number of declared proof references.
    pub count: usize,
}

/// Checks that every declared proof reference has non-empty `type`,
/// `network` and `tx` strings. No ledger is contacted.
///
/// A `proof_refs` member that is not an array fails with `count == 0`.
pub fn verify_anchor(receipt: &Receipt) -> AnchorCheck {
    match receipt.proof_refs() {
        ProofRefs::Absent => AnchorCheck { ok: true, count: 0 },
        ProofRefs::List(refs) => AnchorCheck {
            ok: refs.iter().all(|entry| ProofRef::from_value(entry).is_some()),
            count: refs.len(),
        },
        ProofRefs::Malformed(_) => AnchorCheck { ok: false, count: 0 },
    }
}
