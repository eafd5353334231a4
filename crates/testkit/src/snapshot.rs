//! Canonical JSON comparison and hashing.
//!
//! Values are serialized as pretty JSON with object keys sorted, so two
//! generation runs can be compared byte for byte.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

/// Assert that two values serialize to byte-identical canonical JSON.
pub fn assert_canonical_eq<A: Serialize, B: Serialize>(left: &A, right: &B) -> Result<()> {
    let left = canonical_json(left)?;
    let right = canonical_json(right)?;
    if left != right {
        let line = left
            .lines()
            .zip(right.lines())
            .position(|(a, b)| a != b)
            .map(|idx| idx + 1)
            .unwrap_or_else(|| left.lines().count().min(right.lines().count()) + 1);
        anyhow::bail!("canonical JSON differs starting at line {line}");
    }
    Ok(())
}

/// BLAKE3 hash of a value's canonical JSON, as hex.
pub fn canonical_hash<T: Serialize>(value: &T) -> Result<String> {
    Ok(content_hash(&canonical_json(value)?))
}

/// BLAKE3 over a string, formatted as 64 hex digits.
pub fn content_hash(contents: &str) -> String {
    blake3::hash(contents.as_bytes()).to_hex().to_string()
}

/// Serialize `value` as pretty JSON with object keys sorted recursively.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value).context("Failed to serialize snapshot value")?;
    let value = canonicalize_value(value);
    let mut s = serde_json::to_string_pretty(&value).context("Failed to format snapshot JSON")?;
    s.push('\n');
    Ok(s)
}

fn canonicalize_value(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut out = serde_json::Map::with_capacity(entries.len());
            for (k, v) in entries {
                out.insert(k, canonicalize_value(v));
            }
            Value::Object(out)
        }
        Value::Array(values) => Value::Array(values.into_iter().map(canonicalize_value).collect()),
        other => other,
    }
}
