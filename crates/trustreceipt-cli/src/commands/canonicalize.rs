//! Canonicalize command implementation.

use trustreceipt_canonical::Canonicalizer;

use super::read_json_or_stdin;

pub fn run(input: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let document = read_json_or_stdin(input.as_deref())?;

    let canonical = Canonicalizer::default()
        .canonicalize_subset(&document)
        .map_err(|e| format!("Canonicalization failed: {}", e))?;

    println!("{}", canonical.as_str());
    println!("{}", canonical.digest());
    Ok(())
}
