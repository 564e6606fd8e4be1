//! Receipt signing over the canonical subset.
//!
//! Uses the same canonical message as [`SignatureVerifier`](crate::SignatureVerifier),
//! so a receipt signed here always verifies there. Key generation and storage
//! are the caller's business.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use trustreceipt_canonical::Canonicalizer;

use crate::errors::CoreError;
use crate::receipt::{Receipt, ReceiptSignature};
use crate::signature::ED25519_KID_PREFIX;

/// Self-certifying key identifier for a public key.
pub fn kid_for(key: &VerifyingKey) -> String {
    format!("{}{}", ED25519_KID_PREFIX, hex::encode(key.as_bytes()))
}

/// Signs the canonical subset of `receipt`.
///
/// # Errors
///
/// Returns [`CoreError::Canonicalization`] if a subset field is missing.
pub fn sign_receipt(receipt: &Receipt, key: &SigningKey) -> Result<ReceiptSignature, CoreError> {
    let message = receipt.canonical_message(&Canonicalizer::default())?;
    let signature = key.sign(message.as_bytes());
    Ok(ReceiptSignature {
        alg: Some("ed25519".to_string()),
        kid: Some(kid_for(&key.verifying_key())),
        sig: Some(STANDARD.encode(signature.to_bytes())),
    })
}

/// Returns a copy of `receipt` carrying a fresh signature.
pub fn signed(receipt: &Receipt, key: &SigningKey) -> Result<Receipt, CoreError> {
    let block = sign_receipt(receipt, key)?;
    receipt.with_signature(&block)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kid_is_prefixed_lowercase_hex() {
        let key = SigningKey::from_bytes(&[1u8; 32]);
        let kid = kid_for(&key.verifying_key());
        assert!(kid.starts_with("ed25519:"));
        assert_eq!(kid.len(), "ed25519:".len() + 64);
        assert_eq!(kid, kid.to_ascii_lowercase());
    }

    #[test]
    fn signing_requires_full_subset() {
        let key = SigningKey::from_bytes(&[1u8; 32]);
        let receipt = Receipt::default().with_member("id", "rec");
        assert!(matches!(
            sign_receipt(&receipt, &key),
            Err(CoreError::Canonicalization(_))
        ));
    }
}
