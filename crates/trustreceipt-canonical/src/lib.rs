//! Canonical primitives for AI trust receipts.
//!
//! A receipt is signed over the canonical form of six of its fields
//! (`id`, `issued_at`, `input_hash`, `output_hash`, `model_version`,
//! `policy_version`). Signer and verifier must derive identical bytes from
//! identical logical content, so every byte that participates in signing or
//! content binding is produced by this crate.
//!
#![deny(missing_docs)]

/// Canonicalization helpers for deterministic bytes.
pub mod canonicalizer;
/// SHA-256 digests and declared-hash normalization.
pub mod digest;
/// Six-field subset extraction.
pub mod subset;

pub use canonicalizer::{CanonicalBytes, CanonicalizationError, Canonicalizer};
pub use digest::{Digest, DigestAlg};
pub use subset::{canonical_subset, extract_subset, SUBSET_FIELDS};
