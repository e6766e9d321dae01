//! Payload input for CLI commands: a file path, or stdin for `-` / no path.

use anyhow::{bail, Context, Result};
use std::io::Read;
use std::path::Path;

pub fn read_payload(path: Option<&Path>) -> Result<serde_json::Value> {
    let text = match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read payload file: {}", p.display()))?,
        _ => {
            if atty::is(atty::Stream::Stdin) {
                bail!("no payload given: pass a file path or pipe JSON on stdin");
            }
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read payload from stdin")?;
            buf
        }
    };
    parse_payload(&text)
}

pub fn parse_payload(text: &str) -> Result<serde_json::Value> {
    if text.trim().is_empty() {
        bail!("payload is empty");
    }
    serde_json::from_str(text).context("payload is not valid JSON")
}
