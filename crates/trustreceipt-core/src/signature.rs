//! Ed25519 receipt signature verification.
//!
//! Verification is a state machine over the `signature` member. Every path
//! ends in a [`SignatureCheck`] carrying a stable reason code; nothing in
//! here returns an error or panics on receipt content.
//!
//! Key resolution and the curve arithmetic are both injected:
//! - [`KeyResolver`] turns a `kid` into public key bytes. The built-in
//!   [`EmbeddedKeyResolver`] only understands the self-certifying
//!   `ed25519:<hex>` form; DID resolution would be another implementation.
//! - [`SignatureBackend`] checks `(signature, message, key)`.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use ed25519_dalek::Verifier as _;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use tracing::{debug, warn};
use trustreceipt_canonical::Canonicalizer;

use crate::config::AlgMatching;
use crate::receipt::Receipt;

/// Prefix of a self-certifying key identifier.
pub const ED25519_KID_PREFIX: &str = "ed25519:";

/// Length of an Ed25519 signature in bytes.
const SIGNATURE_LEN: usize = 64;

/// Base64 with the standard alphabet, padding optional.
const SIG_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Stable reason code for a failed signature check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureReason {
    /// The receipt has no `signature`.
    NotProvided,
    /// `alg` is present and is not Ed25519.
    AlgUnsupported,
    /// `sig` is absent or empty.
    SigMissing,
    /// `kid` could not be resolved to a public key.
    KidUnresolved,
    /// The signature does not verify.
    BadSignature,
    /// Decoding or verification could not run.
    VerifyError,
}

impl SignatureReason {
    /// Reason code as written in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureReason::NotProvided => "not_provided",
            SignatureReason::AlgUnsupported => "alg_unsupported",
            SignatureReason::SigMissing => "sig_missing",
            SignatureReason::KidUnresolved => "kid_unresolved",
            SignatureReason::BadSignature => "bad_signature",
            SignatureReason::VerifyError => "verify_error",
        }
    }
}

impl fmt::Display for SignatureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a signature check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureCheck {
    /// Whether the signature verified.
    pub ok: bool,
    /// Failure reason; `None` when `ok`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<SignatureReason>,
    /// Underlying error text for `verify_error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl SignatureCheck {
    /// A verified signature.
    pub fn valid() -> Self {
        Self {
            ok: true,
            reason: None,
            detail: None,
        }
    }

    /// A failed check with a reason code.
    pub fn failed(reason: SignatureReason) -> Self {
        Self {
            ok: false,
            reason: Some(reason),
            detail: None,
        }
    }

    /// A `verify_error` carrying diagnostic text.
    pub fn errored(detail: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: Some(SignatureReason::VerifyError),
            detail: Some(detail.into()),
        }
    }
}

/// Error raised by a [`SignatureBackend`] when verification cannot run.
#[derive(thiserror::Error, Debug)]
#[error("{0}")]
pub struct BackendError(pub String);

/// Resolves key identifiers to Ed25519 public key bytes.
pub trait KeyResolver: Send + Sync {
    /// Public key for `kid`, or `None` if this resolver cannot resolve it.
    fn resolve(&self, kid: &str) -> Option<[u8; 32]>;
}

/// Resolver for `ed25519:<64 hex chars>` identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedKeyResolver;

fn embedded_kid_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^ed25519:([0-9a-fA-F]{64})$").expect("invalid regex"))
}

impl KeyResolver for EmbeddedKeyResolver {
    fn resolve(&self, kid: &str) -> Option<[u8; 32]> {
        let caps = embedded_kid_pattern().captures(kid)?;
        let mut key = [0u8; 32];
        hex::decode_to_slice(&caps[1], &mut key).ok()?;
        Some(key)
    }
}

/// Ed25519 verification primitive.
pub trait SignatureBackend: Send + Sync {
    /// Returns `Ok(true)` if `signature` is valid for `message` under
    /// `public_key`, `Ok(false)` if it is not, and `Err` if the inputs cannot
    /// be used (e.g. the key is not a curve point).
    fn verify(
        &self,
        message: &[u8],
        signature: &[u8; 64],
        public_key: &[u8; 32],
    ) -> Result<bool, BackendError>;
}

/// [`SignatureBackend`] backed by `ed25519-dalek`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DalekBackend;

impl SignatureBackend for DalekBackend {
    fn verify(
        &self,
        message: &[u8],
        signature: &[u8; 64],
        public_key: &[u8; 32],
    ) -> Result<bool, BackendError> {
        let key = ed25519_dalek::VerifyingKey::from_bytes(public_key)
            .map_err(|e| BackendError(format!("invalid public key: {}", e)))?;
        let sig = ed25519_dalek::Signature::from_bytes(signature);
        Ok(key.verify(message, &sig).is_ok())
    }
}

/// Verifies receipt signatures over the canonical subset.
pub struct SignatureVerifier {
    canonicalizer: Canonicalizer,
    resolver: Box<dyn KeyResolver>,
    backend: Box<dyn SignatureBackend>,
    alg_matching: AlgMatching,
}

impl Default for SignatureVerifier {
    fn default() -> Self {
        Self::new(
            Canonicalizer::default(),
            Box::new(EmbeddedKeyResolver),
            Box::new(DalekBackend),
        )
    }
}

impl SignatureVerifier {
    /// Creates a verifier from its collaborators.
    pub fn new(
        canonicalizer: Canonicalizer,
        resolver: Box<dyn KeyResolver>,
        backend: Box<dyn SignatureBackend>,
    ) -> Self {
        Self {
            canonicalizer,
            resolver,
            backend,
            alg_matching: AlgMatching::default(),
        }
    }

    /// Sets the `alg` comparison rule.
    pub fn with_alg_matching(mut self, alg_matching: AlgMatching) -> Self {
        self.alg_matching = alg_matching;
        self
    }

    /// Replaces the key resolver.
    pub fn set_resolver(&mut self, resolver: Box<dyn KeyResolver>) {
        self.resolver = resolver;
    }

    /// Replaces the crypto backend.
    pub fn set_backend(&mut self, backend: Box<dyn SignatureBackend>) {
        self.backend = backend;
    }

    /// Verifies the receipt signature.
    pub fn verify(&self, receipt: &Receipt) -> SignatureCheck {
        let check = self.check(receipt);
        match check.reason {
            None => debug!(id = ?receipt.id(), "signature verified"),
            Some(SignatureReason::VerifyError) => {
                warn!(id = ?receipt.id(), detail = ?check.detail, "signature verification error")
            }
            Some(reason) => debug!(id = ?receipt.id(), %reason, "signature rejected"),
        }
        check
    }

    fn check(&self, receipt: &Receipt) -> SignatureCheck {
        let Some(block) = receipt.signature_block() else {
            return SignatureCheck::failed(SignatureReason::NotProvided);
        };

        if let Some(alg) = block.alg.as_deref() {
            if !self.alg_matching.is_ed25519(alg) {
                return SignatureCheck::failed(SignatureReason::AlgUnsupported);
            }
        }

        let sig = match block.sig.as_deref() {
            Some(sig) if !sig.is_empty() => sig,
            _ => return SignatureCheck::failed(SignatureReason::SigMissing),
        };

        let Some(public_key) = block.kid.as_deref().and_then(|kid| self.resolver.resolve(kid))
        else {
            return SignatureCheck::failed(SignatureReason::KidUnresolved);
        };

        let signature = match decode_signature(sig) {
            Ok(signature) => signature,
            Err(detail) => return SignatureCheck::errored(detail),
        };

        let message = match receipt.canonical_message(&self.canonicalizer) {
            Ok(message) => message,
            Err(e) => return SignatureCheck::errored(e.to_string()),
        };

        match self
            .backend
            .verify(message.as_bytes(), &signature, &public_key)
        {
            Ok(true) => SignatureCheck::valid(),
            Ok(false) => SignatureCheck::failed(SignatureReason::BadSignature),
            Err(e) => SignatureCheck::errored(e.to_string()),
        }
    }
}

/// Decodes a base64 signature that must be exactly 64 bytes.
fn decode_signature(sig: &str) -> Result<[u8; SIGNATURE_LEN], String> {
    let raw = SIG_BASE64
        .decode(sig.trim())
        .map_err(|e| format!("signature is not valid base64: {}", e))?;
    <[u8; SIGNATURE_LEN]>::try_from(raw.as_slice()).map_err(|_| {
        format!(
            "signature must be {} bytes, got {}",
            SIGNATURE_LEN,
            raw.len()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_resolver_accepts_mixed_case_hex() {
        let kid = format!("ed25519:{}", "aB".repeat(32));
        assert_eq!(EmbeddedKeyResolver.resolve(&kid), Some([0xab; 32]));
    }

    #[test]
    fn embedded_resolver_rejects_other_shapes() {
        for kid in [
            "did:web:example.org#k1".to_string(),
            format!("ed25519:{}", "ab".repeat(31)),
            format!("ed25519:{}", "zz".repeat(32)),
            format!("ED25519:{}", "ab".repeat(32)),
            format!("ed25519:{}ff", "ab".repeat(32)),
        ] {
            assert_eq!(EmbeddedKeyResolver.resolve(&kid), None, "{}", kid);
        }
    }

    #[test]
    fn decode_signature_checks_length() {
        let short = base64::engine::general_purpose::STANDARD.encode([7u8; 63]);
        assert!(decode_signature(&short).unwrap_err().contains("got 63"));

        let exact = base64::engine::general_purpose::STANDARD.encode([7u8; 64]);
        assert_eq!(decode_signature(&exact).unwrap(), [7u8; 64]);

        let unpadded = base64::engine::general_purpose::STANDARD_NO_PAD.encode([7u8; 64]);
        assert_eq!(decode_signature(&unpadded).unwrap(), [7u8; 64]);

        assert!(decode_signature("not base64!").is_err());
    }

    #[test]
    fn reason_codes_are_stable() {
        assert_eq!(
            serde_json::to_value(SignatureReason::KidUnresolved).unwrap(),
            serde_json::json!("kid_unresolved")
        );
        assert_eq!(SignatureReason::VerifyError.to_string(), "verify_error");
    }
}
