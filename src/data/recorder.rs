//! Input record sinks
//!
//! Recording is a side effect of the caller. Sinks never feed back into
//! pricing, and [`record_quietly`] swallows failures after logging them.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::record::InputRecord;
use crate::core::{PricerError, PricerResult};

/// Destination for input records
pub trait InputSink: Send + Sync {
    fn record(&self, record: &InputRecord) -> PricerResult<()>;
}

/// Session-local table of records
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<InputRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn records(&self) -> Vec<InputRecord> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl InputSink for MemorySink {
    fn record(&self, record: &InputRecord) -> PricerResult<()> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(record.clone());
        Ok(())
    }
}

/// Recorder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// JSON-lines file records are appended to
    pub path: PathBuf,
    /// Whether to write at all
    pub enabled: bool,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/inputs.jsonl"),
            enabled: true,
        }
    }
}

impl RecorderConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}

/// Appends one JSON object per line
pub struct JsonLinesSink {
    config: RecorderConfig,
    lock: Mutex<()>,
}

impl JsonLinesSink {
    pub fn new(config: RecorderConfig) -> PricerResult<Self> {
        // Create parent directory if needed
        if config.enabled {
            if let Some(dir) = config.path.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(dir)?;
            }
        }

        Ok(Self {
            config,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Read back every record in a JSON-lines file
    pub fn load(path: impl AsRef<Path>) -> PricerResult<Vec<InputRecord>> {
        let file = fs::File::open(path.as_ref())?;
        let mut records = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }
        Ok(records)
    }
}

impl InputSink for JsonLinesSink {
    fn record(&self, record: &InputRecord) -> PricerResult<()> {
        if !self.config.enabled {
            return Ok(());
        }

        let line = serde_json::to_string(record)?;
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.config.path)
            .map_err(PricerError::Io)?;
        writeln!(file, "{}", line)?;

        tracing::info!(id = record.id, path = ?self.config.path, "Recorded inputs");
        Ok(())
    }
}

/// Fire-and-forget recording: failures are logged, never returned
pub fn record_quietly(sink: &dyn InputSink, record: &InputRecord) {
    if let Err(e) = sink.record(record) {
        tracing::warn!(id = record.id, error = %e, "Failed to record inputs");
    }
}
