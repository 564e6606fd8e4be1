//! Schema gate: structural validation of the whole receipt document.
//!
//! The verifier treats the gate as opaque (document in, `{ok, errors}` out).
//! [`JsonSchemaGate`] is the JSON Schema implementation; the receipt schema
//! shipped with this crate is available through [`bundled_receipt_schema`].

use jsonschema::{Retrieve, Uri, Validator};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::CoreError;

/// Receipt schema shipped with the crate.
const RECEIPT_SCHEMA_V1: &str = include_str!("../schemas/receipt.v1.schema.json");

/// One schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaViolation {
    /// JSON pointer to the offending part of the document.
    pub instance_path: String,
    /// JSON pointer to the schema keyword that failed.
    pub schema_path: String,
    /// Human-readable message.
    pub message: String,
}

/// Result of validating a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaReport {
    /// Document conforms to the schema.
    pub ok: bool,
    /// Violations, empty when `ok`.
    pub errors: Vec<SchemaViolation>,
}

/// Structural validator for receipt documents.
pub trait SchemaGate: Send + Sync {
    /// Validates `document`; never fails, violations go in the report.
    fn validate(&self, document: &Value) -> SchemaReport;
}

/// Retriever that refuses every external `$ref`, keeping validation offline.
struct OfflineRetriever;

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("external schema reference not allowed: {}", uri.as_str()).into())
    }
}

/// [`SchemaGate`] backed by the `jsonschema` crate.
pub struct JsonSchemaGate {
    validator: Validator,
}

impl JsonSchemaGate {
    /// Compiles `schema` into a gate.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SchemaCompile`] if the schema is invalid or
    /// references external documents.
    pub fn new(schema: &Value) -> Result<Self, CoreError> {
        let mut opts = jsonschema::options();
        opts.with_retriever(OfflineRetriever);
        let validator = opts
            .build(schema)
            .map_err(|e| CoreError::SchemaCompile(e.to_string()))?;
        Ok(Self { validator })
    }

    /// Gate for the bundled receipt schema.
    pub fn bundled() -> Result<Self, CoreError> {
        Self::new(&bundled_receipt_schema()?)
    }
}

impl SchemaGate for JsonSchemaGate {
    fn validate(&self, document: &Value) -> SchemaReport {
        let errors: Vec<SchemaViolation> = self
            .validator
            .iter_errors(document)
            .map(|e| SchemaViolation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        SchemaReport {
            ok: errors.is_empty(),
            errors,
        }
    }
}

/// The receipt schema shipped with this crate.
pub fn bundled_receipt_schema() -> Result<Value, CoreError> {
    serde_json::from_str(RECEIPT_SCHEMA_V1)
        .map_err(|e| CoreError::SchemaCompile(format!("bundled schema: {}", e)))
}
