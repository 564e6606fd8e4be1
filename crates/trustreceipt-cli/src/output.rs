//! Output formatting utilities.

use serde_json::Value;
use std::fmt::Write as _;
use trustreceipt_core::{ScoreSource, SignatureCheck, SignatureReason, VerificationResult};

/// Formats a value as pretty JSON.
pub fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// One-line signature verdict.
pub fn format_signature_line(check: &SignatureCheck) -> String {
    match (check.ok, check.reason) {
        (true, _) => "signature: PASS".to_string(),
        (false, Some(SignatureReason::NotProvided)) => "signature: not present".to_string(),
        (false, Some(reason)) => format!("signature: FAIL ({})", reason),
        (false, None) => "signature: FAIL".to_string(),
    }
}

fn verdict(ok: bool) -> &'static str {
    if ok {
        "PASS"
    } else {
        "FAIL"
    }
}

/// Human-readable report, one line per check plus detail lines.
pub fn format_report(id: Option<&str>, result: &VerificationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "receipt: {}", id.unwrap_or("?"));

    match &result.schema {
        Some(report) => {
            let _ = writeln!(out, "schema: {}", verdict(report.ok));
            for error in &report.errors {
                let path = if error.instance_path.is_empty() {
                    "/"
                } else {
                    error.instance_path.as_str()
                };
                let _ = writeln!(out, "  {}: {}", path, error.message);
            }
        }
        None => {
            let _ = writeln!(out, "schema: skipped");
        }
    }

    let _ = writeln!(
        out,
        "hashes: {} ({} checked)",
        verdict(result.hashes.ok),
        result.hashes.checked.len()
    );
    for field in &result.hashes.checked {
        let _ = writeln!(
            out,
            "  {}: {} (declared {}, computed {})",
            field.field.as_str(),
            verdict(field.ok),
            truncate(&field.declared, 16),
            truncate(&field.computed, 16)
        );
    }

    let _ = writeln!(out, "{}", format_signature_line(&result.signature));
    if let Some(detail) = &result.signature.detail {
        let _ = writeln!(out, "  {}", detail);
    }

    let _ = writeln!(
        out,
        "anchor: {} ({} proof refs)",
        verdict(result.anchor.ok),
        result.anchor.count
    );

    let source = match result.trust_score.source {
        ScoreSource::Declared => "declared",
        ScoreSource::Computed => "computed",
    };
    let _ = writeln!(out, "trustscore: {} ({})", result.trust_score.value, source);
    out
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
