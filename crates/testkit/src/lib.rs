#![warn(missing_docs)]
//! Deterministic testing surfaces (canonical JSON comparison + metrics artifacts).

mod metrics;
mod snapshot;

use anyhow::Result;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub use metrics::*;
pub use snapshot::*;

/// Per-territory record captured by worldtests.
#[derive(Debug, Serialize)]
pub struct TerritoryRecord<'a> {
    /// Territory identifier.
    pub id: &'a str,
    /// Archetype label.
    pub archetype: &'a str,
    /// Visual seed the territory was generated from.
    pub seed: u32,
    /// Total number of placed ornament instances.
    pub instances: usize,
    /// Content hash (hex string) of the canonical model JSON.
    pub hash: String,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: File,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self { file })
    }

    /// Append a record to the log.
    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<()> {
        let line = serde_json::to_string(record)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn jsonl_sink_writes_one_line_per_record() {
        let path = std::env::temp_dir().join(format!(
            "territory-records-{}.jsonl",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        let mut sink = JsonlSink::create(&path).expect("sink create");
        for seed in [1_u32, 2] {
            sink.write(&TerritoryRecord {
                id: "eth:1",
                archetype: "island",
                seed,
                instances: 12,
                hash: content_hash("payload"),
            })
            .expect("write succeeds");
        }
        drop(sink);
        let contents = fs::read_to_string(&path).expect("file readable");
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.contains("\"archetype\":\"island\""));
        let _ = fs::remove_file(&path);
    }
}
