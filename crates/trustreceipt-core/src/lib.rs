//! Verification engine for AI trust receipts.
//!
//! This crate provides:
//! - The receipt data model, a JSON object read leniently (`id`, `issued_at`,
//!   hashes, versions, proof references, optional score and signature)
//! - Hash binding of supplied input/output content, optionally salted
//! - Ed25519 signature verification over the canonical six-field subset
//! - Structural anchor checks and an optional JSON Schema gate
//! - Fixed-weight trust score aggregation
//!
//! Core invariants:
//! - Verification never mutates the receipt and never contacts the network
//! - Every check runs and reports; none short-circuits another
//! - Expected failures are values with stable reason codes, not errors
//!
//! ## Quick Start
//!
//! ```rust
//! use ed25519_dalek::SigningKey;
//! use serde_json::json;
//! use trustreceipt_core::{signed, Receipt, ReceiptVerifier, VerificationContext, VerifierConfig};
//!
//! let receipt = Receipt::from_value(json!({
//!     "id": "rec_doc_001",
//!     "issued_at": "2025-09-10T12:00:00Z",
//!     "input_hash": "a".repeat(64),
//!     "output_hash": "b".repeat(64),
//!     "model_version": "gpt-x-2025-09-01",
//!     "policy_version": "policy-v1.0"
//! }))?;
//! let receipt = signed(&receipt, &SigningKey::from_bytes(&[1u8; 32]))?;
//!
//! let verifier = ReceiptVerifier::new(VerifierConfig::default());
//! let result = verifier.verify(&receipt, &VerificationContext::new());
//! assert!(result.signature.ok);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
#![deny(missing_docs)]

/// Anchor (proof reference) validation.
pub mod anchor;
/// Verifier configuration.
pub mod config;
/// Error types for core operations.
pub mod errors;
/// Content hash binding.
pub mod hashes;
/// Receipt data model.
pub mod receipt;
/// Schema gate.
pub mod schema;
/// Trust score aggregation.
pub mod score;
/// Ed25519 signature verification.
pub mod signature;
/// Receipt signing.
pub mod signing;
/// Verification orchestrator.
pub mod verification;

pub use anchor::{verify_anchor, AnchorCheck};
pub use config::{AlgMatching, UncheckedHashPolicy, VerifierConfig, WeightScheme};
pub use errors::CoreError;
pub use hashes::{verify_hashes, FieldCheck, HashCheck, HashField, Salt, SaltMode};
pub use receipt::{ProofRef, ProofRefs, Receipt, ReceiptSignature};
pub use schema::{bundled_receipt_schema, JsonSchemaGate, SchemaGate, SchemaReport, SchemaViolation};
pub use score::{compute_trust_score, ScoreParts, ScoreSource, TrustScore, Weights};
pub use signature::{
    BackendError, DalekBackend, EmbeddedKeyResolver, KeyResolver, SignatureBackend,
    SignatureCheck, SignatureReason, SignatureVerifier,
};
pub use signing::{kid_for, sign_receipt, signed};
pub use verification::{ReceiptVerifier, VerificationContext, VerificationResult};
