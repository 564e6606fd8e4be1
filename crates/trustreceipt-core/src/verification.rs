//! End-to-end receipt verification.
//!
//! Schema, hash, signature and anchor checks are independent pure functions
//! of the receipt and the supplied context. All of them always run; a failing
//! check never hides the outcome of another.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

use crate::anchor::{verify_anchor, AnchorCheck};
use crate::config::VerifierConfig;
use crate::errors::CoreError;
use crate::hashes::{verify_hashes, HashCheck, Salt};
use crate::receipt::Receipt;
use crate::schema::{SchemaGate, SchemaReport};
use crate::score::{compute_trust_score, ScoreParts, TrustScore};
use crate::signature::{KeyResolver, SignatureBackend, SignatureCheck, SignatureVerifier};

/// Content and salt supplied alongside a receipt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationContext {
    /// Input content bytes.
    pub input: Option<Vec<u8>>,
    /// Output content bytes.
    pub output: Option<Vec<u8>>,
    /// Salt used when the receipt hashes were computed.
    pub salt: Option<Salt>,
}

fn read_content(path: &Path) -> Result<Vec<u8>, CoreError> {
    std::fs::read(path).map_err(|source| CoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl VerificationContext {
    /// Empty context: no content, no salt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Supplies input content.
    pub fn with_input(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.input = Some(bytes.into());
        self
    }

    /// Supplies output content.
    pub fn with_output(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.output = Some(bytes.into());
        self
    }

    /// Supplies the salt.
    pub fn with_salt(mut self, salt: Salt) -> Self {
        self.salt = Some(salt);
        self
    }

    /// Reads the whole input file; the handle is closed before returning.
    pub fn read_input_file(self, path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let bytes = read_content(path.as_ref())?;
        Ok(self.with_input(bytes))
    }

    /// Reads the whole output file; the handle is closed before returning.
    pub fn read_output_file(self, path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let bytes = read_content(path.as_ref())?;
        Ok(self.with_output(bytes))
    }
}

/// Everything the verifier found out about one receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Schema gate report; `None` when the verifier has no gate.
    pub schema: Option<SchemaReport>,
    /// Hash binding outcome.
    pub hashes: HashCheck,
    /// Signature outcome.
    pub signature: SignatureCheck,
    /// Anchor outcome.
    pub anchor: AnchorCheck,
    /// Aggregate score.
    pub trust_score: TrustScore,
}

impl VerificationResult {
    /// Component outcomes in scorer form.
    pub fn parts(&self) -> ScoreParts {
        ScoreParts {
            schema_ok: self.schema.as_ref().map(|report| report.ok),
            hashes_ok: Some(self.hashes.ok),
            signature_ok: Some(self.signature.ok),
            anchor_ok: Some(self.anchor.ok),
        }
    }

    /// Every component that ran passed.
    pub fn all_ok(&self) -> bool {
        let parts = self.parts();
        [parts.schema_ok, parts.hashes_ok, parts.signature_ok, parts.anchor_ok]
            .into_iter()
            .flatten()
            .all(|ok| ok)
    }
}

/// Receipt verification orchestrator.
///
/// Holds no mutable state; one instance can verify any number of receipts,
/// from any number of threads.
pub struct ReceiptVerifier {
    config: VerifierConfig,
    schema_gate: Option<Box<dyn SchemaGate>>,
    signatures: SignatureVerifier,
}

impl ReceiptVerifier {
    /// Creates a verifier with the built-in key resolver and Ed25519 backend
    /// and no schema gate.
    pub fn new(config: VerifierConfig) -> Self {
        Self {
            config,
            schema_gate: None,
            signatures: SignatureVerifier::default().with_alg_matching(config.alg_matching),
        }
    }

    /// Adds a schema gate.
    pub fn with_schema_gate(mut self, gate: impl SchemaGate + 'static) -> Self {
        self.schema_gate = Some(Box::new(gate));
        self
    }

    /// Replaces the key resolver.
    pub fn with_key_resolver(mut self, resolver: impl KeyResolver + 'static) -> Self {
        self.signatures.set_resolver(Box::new(resolver));
        self
    }

    /// Replaces the Ed25519 backend.
    pub fn with_backend(mut self, backend: impl SignatureBackend + 'static) -> Self {
        self.signatures.set_backend(Box::new(backend));
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Verifies a receipt.
    pub fn verify(&self, receipt: &Receipt, context: &VerificationContext) -> VerificationResult {
        let schema = self
            .schema_gate
            .as_ref()
            .map(|gate| gate.validate(&receipt.to_value()));
        self.run(receipt, schema, context)
    }

    /// Verifies a receipt given as a JSON document.
    ///
    /// The schema gate sees `document` exactly as supplied.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidReceipt`] if `document` is not a JSON
    /// object. Wrongly typed members are left to the schema gate and the
    /// individual checks.
    pub fn verify_document(
        &self,
        document: &Value,
        context: &VerificationContext,
    ) -> Result<VerificationResult, CoreError> {
        let receipt = Receipt::from_value(document.clone())?;
        let schema = self.schema_gate.as_ref().map(|gate| gate.validate(document));
        Ok(self.run(&receipt, schema, context))
    }

    fn run(
        &self,
        receipt: &Receipt,
        schema: Option<SchemaReport>,
        context: &VerificationContext,
    ) -> VerificationResult {
        let hashes = verify_hashes(
            receipt,
            context.input.as_deref(),
            context.output.as_deref(),
            context.salt.as_ref(),
            self.config.unchecked_hashes,
        );
        let signature = self.signatures.verify(receipt);
        let anchor = verify_anchor(receipt);

        let parts = ScoreParts {
            schema_ok: schema.as_ref().map(|report| report.ok),
            hashes_ok: Some(hashes.ok),
            signature_ok: Some(signature.ok),
            anchor_ok: Some(anchor.ok),
        };
        let trust_score = compute_trust_score(receipt, &parts, self.config.weights);

        let result = VerificationResult {
            schema,
            hashes,
            signature,
            anchor,
            trust_score,
        };

        debug!(
            id = ?receipt.id(),
            schema_ok = ?result.schema.as_ref().map(|s| s.ok),
            hashes_ok = result.hashes.ok,
            signature_ok = result.signature.ok,
            anchor_ok = result.anchor.ok,
            anchors = result.anchor.count,
            score = result.trust_score.value,
            "receipt verified"
        );

        result
    }
}
