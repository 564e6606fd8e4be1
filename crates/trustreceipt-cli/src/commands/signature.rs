//! Signature command implementation.

use trustreceipt_core::{AlgMatching, Receipt, SignatureVerifier};

use super::read_json_file;
use crate::output::format_signature_line;

pub fn run(path: String, alg_case_insensitive: bool) -> Result<(), Box<dyn std::error::Error>> {
    let document = read_json_file(&path)?;
    let receipt = Receipt::from_value(document)?;

    let alg_matching = if alg_case_insensitive {
        AlgMatching::CaseInsensitive
    } else {
        AlgMatching::Exact
    };
    let check = SignatureVerifier::default()
        .with_alg_matching(alg_matching)
        .verify(&receipt);

    println!("{}", format_signature_line(&check));
    Ok(())
}
