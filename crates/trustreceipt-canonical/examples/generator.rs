use serde_json::json;
use trustreceipt_canonical::Canonicalizer;

fn main() {
    let canonicalizer = Canonicalizer::default();
    let receipt = json!({
        "id": "rec_demo_001",
        "issued_at": "2025-09-10T12:00:00Z",
        "input_hash": "a".repeat(64),
        "output_hash": "b".repeat(64),
        "model_version": "gpt-x-2025-09-01",
        "policy_version": "policy-v1.0",
        "proof_refs": []
    });

    match canonicalizer.canonicalize_subset(&receipt) {
        Ok(bytes) => {
            println!("{}", bytes.as_str());
            println!("{}", bytes.digest());
        }
        Err(err) => {
            eprintln!("canonicalization failed: {}", err);
            std::process::exit(1);
        }
    }
}
