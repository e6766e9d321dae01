//! `ragwire check`: decode a payload as a named contract and report.
//!
//! Malformed payloads always fail. Check violations are printed as warnings
//! and only fail the command when `[checks] strict = true`.

use anyhow::{bail, Result};
use ragwire_core::kind::Checked;
use ragwire_core::ContractKind;
use std::path::Path;

use crate::config::Config;
use crate::input;

/// Decode and check an already-parsed payload.
pub fn check_payload(
    config: &Config,
    kind: ContractKind,
    payload: serde_json::Value,
    many: bool,
) -> Result<Checked> {
    let policy = &config.checks.policy;
    let checked = if many {
        kind.check_json_many(payload, policy)?
    } else {
        kind.check_json(payload, policy)?
    };
    tracing::debug!(
        contract = checked.contract,
        violations = checked.violations.len(),
        "payload decoded"
    );
    Ok(checked)
}

/// CLI entry point.
pub fn run_check(
    config: &Config,
    kind: &str,
    path: Option<&Path>,
    many: bool,
    json: bool,
) -> Result<()> {
    let kind: ContractKind = kind.parse()?;
    let payload = input::read_payload(path)?;
    let checked = check_payload(config, kind, payload, many)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&checked)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&checked.normalized)?);
        for v in &checked.violations {
            eprintln!("warning: {}", v);
        }
        if checked.is_clean() {
            eprintln!("ok: valid {} payload", checked.contract);
        }
    }

    if config.checks.strict && !checked.is_clean() {
        bail!(
            "{} check violation(s) in {} payload",
            checked.violations.len(),
            checked.contract
        );
    }
    Ok(())
}
