//! `ragwire rank`: order a JSON array of search hits.
//!
//! Only the search-result kinds can be ranked. Hits are sorted by score
//! (desc) then doc id, optionally min-max normalized and cut to `--limit`.

use anyhow::Result;
use ragwire_core::ContractKind;
use std::path::Path;

use crate::input;

/// CLI entry point.
pub fn run_rank(kind: &str, path: Option<&Path>, limit: Option<usize>, normalize: bool) -> Result<()> {
    let kind: ContractKind = kind.parse()?;
    let payload = input::read_payload(path)?;
    let ranked = kind.rank_json(payload, limit, normalize)?;

    if ranked.as_array().is_some_and(|hits| hits.is_empty()) {
        eprintln!("No results.");
    }
    println!("{}", serde_json::to_string_pretty(&ranked)?);
    Ok(())
}
