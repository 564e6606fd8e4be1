//! Verify command implementation.

use clap::{Args, ValueEnum};
use serde_json::json;
use tracing::debug;
use trustreceipt_core::{
    AlgMatching, JsonSchemaGate, ReceiptVerifier, Salt, SaltMode, UncheckedHashPolicy,
    VerificationContext, VerifierConfig, WeightScheme,
};

use super::{read_json_file, read_text_file};
use crate::output::{format_json, format_report};

#[derive(Args)]
pub struct VerifyArgs {
    /// Receipt JSON file
    pub receipt: String,
    /// Input content file checked against `input_hash`
    #[arg(long)]
    pub input: Option<String>,
    /// Output content file checked against `output_hash`
    #[arg(long)]
    pub output: Option<String>,
    /// Salt applied to content before hashing
    #[arg(long)]
    pub salt: Option<String>,
    /// Salt placement (default: prefix)
    #[arg(long, value_enum, requires = "salt")]
    pub salt_mode: Option<SaltModeArg>,
    /// JSON Schema file used instead of the bundled receipt schema
    #[arg(long)]
    pub schema: Option<String>,
    /// Skip the schema gate
    #[arg(long, conflicts_with = "schema")]
    pub no_schema: bool,
    /// Verifier configuration JSON file
    #[arg(long)]
    pub config: Option<String>,
    /// Trust score weights
    #[arg(long, value_enum)]
    pub weights: Option<WeightsArg>,
    /// Fail the hash check when no content was supplied
    #[arg(long)]
    pub strict_hashes: bool,
    /// Accept `alg` in any letter case
    #[arg(long)]
    pub alg_case_insensitive: bool,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SaltModeArg {
    Prefix,
    Suffix,
}

impl From<SaltModeArg> for SaltMode {
    fn from(arg: SaltModeArg) -> Self {
        match arg {
            SaltModeArg::Prefix => SaltMode::Prefix,
            SaltModeArg::Suffix => SaltMode::Suffix,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum WeightsArg {
    Standard,
    Simple,
}

impl From<WeightsArg> for WeightScheme {
    fn from(arg: WeightsArg) -> Self {
        match arg {
            WeightsArg::Standard => WeightScheme::Standard,
            WeightsArg::Simple => WeightScheme::Simple,
        }
    }
}

/// File config first, then flag overrides.
fn load_config(args: &VerifyArgs) -> Result<VerifierConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => VerifierConfig::from_json_str(&read_text_file(path)?)?,
        None => VerifierConfig::default(),
    };
    if let Some(weights) = args.weights {
        config.weights = weights.into();
    }
    if args.strict_hashes {
        config.unchecked_hashes = UncheckedHashPolicy::Fail;
    }
    if args.alg_case_insensitive {
        config.alg_matching = AlgMatching::CaseInsensitive;
    }
    Ok(config)
}

fn load_context(args: &VerifyArgs) -> Result<VerificationContext, Box<dyn std::error::Error>> {
    let mut context = VerificationContext::new();
    if let Some(path) = &args.input {
        context = context.read_input_file(path)?;
    }
    if let Some(path) = &args.output {
        context = context.read_output_file(path)?;
    }
    if let Some(salt) = &args.salt {
        let mode = args.salt_mode.map(SaltMode::from).unwrap_or_default();
        context = context.with_salt(Salt::new(salt.as_bytes(), mode));
    }
    Ok(context)
}

pub fn run(args: VerifyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&args)?;
    debug!(?config, "verifier configuration");

    let mut verifier = ReceiptVerifier::new(config);
    if !args.no_schema {
        let gate = match &args.schema {
            Some(path) => JsonSchemaGate::new(&read_json_file(path)?)?,
            None => JsonSchemaGate::bundled()?,
        };
        verifier = verifier.with_schema_gate(gate);
    }

    let context = load_context(&args)?;
    let document = read_json_file(&args.receipt)?;
    let result = verifier.verify_document(&document, &context)?;

    if args.json {
        let report = json!({
            "receipt": args.receipt,
            "id": document.get("id"),
            "verified_at": chrono::Utc::now().to_rfc3339(),
            "all_ok": result.all_ok(),
            "result": result,
        });
        println!("{}", format_json(&report));
    } else {
        print!("{}", format_report(document.get("id").and_then(|v| v.as_str()), &result));
    }

    Ok(())
}
