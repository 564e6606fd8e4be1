//! Sign command implementation (dev-tools only).

use ed25519_dalek::SigningKey;
use trustreceipt_core::{signed, Receipt};

use super::{read_json_file, CliError};
use crate::output::format_json;

pub fn run(path: String, seed_hex: String) -> Result<(), Box<dyn std::error::Error>> {
    let mut seed = [0u8; 32];
    hex::decode_to_slice(seed_hex.trim(), &mut seed).map_err(|e| {
        CliError::InvalidArgument(format!("--seed-hex must be 64 hex characters: {}", e))
    })?;
    let key = SigningKey::from_bytes(&seed);

    let receipt = Receipt::from_value(read_json_file(&path)?)?;
    let receipt = signed(&receipt, &key)?;

    println!("{}", format_json(&receipt.to_value()));
    Ok(())
}
