//! # Storage Module - Record Persistence Layer
//!
//! The sink side of the pipeline: parsed [`Record`]s are stamped with their
//! receive time and appended as JSON lines under a data directory.
//!
//! ## Architecture
//!
//! ```text
//! data/
//! ├── .lock              ← advisory lock, one daemon per data dir
//! ├── measurements.jsonl ← PRIMARYMEAS frames
//! ├── ph.jsonl           ← PHW / PHS frames
//! └── control.jsonl      ← settings readback and notification frames
//! ```
//!
//! Append-only JSON lines keep the write path a single `O_APPEND` write per
//! record and make the files greppable in the field. The advisory lock (fs2)
//! prevents two daemons from interleaving writes into one data dir.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use growlink::storage::Storage;
//! use growlink::protocol::Record;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut storage = Storage::new("./data").await?;
//!     let stored = storage.store_record(Record::Reset).await?;
//!     println!("stored at {}", stored.received_at);
//!     Ok(())
//! }
//! ```

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::metrics;
use crate::protocol::Record;

/// Failure writing one record. The caller decides whether to drop the record
/// or stop; the daemon logs and keeps ingesting.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A record as persisted: the parsed frame plus its receive timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub received_at: DateTime<Utc>,
    pub record: Record,
}

/// Per-file record counts, reported by the `status` command.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StorageStats {
    pub measurements: u64,
    pub ph: u64,
    pub control: u64,
}

/// Main storage interface. Owns the data directory for the process lifetime;
/// the lock file handle releases on drop.
#[derive(Debug)]
pub struct Storage {
    data_dir: PathBuf,
    _lock: std::fs::File,
}

const MEASUREMENTS_FILE: &str = "measurements.jsonl";
const PH_FILE: &str = "ph.jsonl";
const CONTROL_FILE: &str = "control.jsonl";

fn file_for(record: &Record) -> &'static str {
    match record {
        Record::PrimaryMeasurement(_) => MEASUREMENTS_FILE,
        Record::PhMeasurement(_) => PH_FILE,
        _ => CONTROL_FILE,
    }
}

impl Storage {
    /// Initialize the storage system: create the data directory and take the
    /// advisory lock.
    pub async fn new(data_dir: &str) -> Result<Self> {
        fs::create_dir_all(data_dir)
            .await
            .with_context(|| format!("Failed to create data directory {}", data_dir))?;

        let lock_path = Path::new(data_dir).join(".lock");
        let lock = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file {}", lock_path.display()))?;
        lock.try_lock_exclusive().map_err(|_| {
            anyhow!(
                "data directory {} is already in use by another instance",
                data_dir
            )
        })?;

        debug!("storage initialized at {}", data_dir);
        Ok(Storage {
            data_dir: PathBuf::from(data_dir),
            _lock: lock,
        })
    }

    /// Append one record to its JSON-lines file, stamping the receive time.
    /// The record is consumed; the stored form is returned for callers that
    /// want to echo it (the `probe` command does).
    pub async fn store_record(&mut self, record: Record) -> Result<StoredRecord, StorageError> {
        let stored = StoredRecord {
            received_at: Utc::now(),
            record,
        };
        let mut line = serde_json::to_string(&stored)?;
        line.push('\n');

        let path = self.data_dir.join(file_for(&stored.record));
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(line.as_bytes()).await?;

        metrics::inc_records_stored();
        Ok(stored)
    }

    /// Count persisted records per file.
    pub async fn stats(&self) -> Result<StorageStats> {
        Ok(StorageStats {
            measurements: self.count_lines(MEASUREMENTS_FILE).await?,
            ph: self.count_lines(PH_FILE).await?,
            control: self.count_lines(CONTROL_FILE).await?,
        })
    }

    async fn count_lines(&self, name: &str) -> Result<u64> {
        let path = self.data_dir.join(name);
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(content.lines().filter(|l| !l.trim().is_empty()).count() as u64),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{PhMeasurement, PrimaryMeasurement};

    fn primary() -> Record {
        Record::PrimaryMeasurement(PrimaryMeasurement {
            humidity: "55".into(),
            lux: "120".into(),
            temp_up: "21".into(),
            temp_middle: "22".into(),
            temp_down: "20".into(),
            soil_moisture: "60".into(),
        })
    }

    #[tokio::test]
    async fn records_route_to_per_kind_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = Storage::new(dir.path().to_str().unwrap()).await.unwrap();

        storage.store_record(primary()).await.unwrap();
        storage
            .store_record(Record::PhMeasurement(PhMeasurement {
                ph_water: Some("6.8".into()),
                ph_soil: None,
            }))
            .await
            .unwrap();
        storage.store_record(Record::Reset).await.unwrap();
        storage
            .store_record(Record::St("24".into(), "18".into()))
            .await
            .unwrap();

        let stats = storage.stats().await.unwrap();
        assert_eq!(stats.measurements, 1);
        assert_eq!(stats.ph, 1);
        assert_eq!(stats.control, 2);
    }

    #[tokio::test]
    async fn stored_lines_deserialize_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = Storage::new(dir.path().to_str().unwrap()).await.unwrap();
        let stored = storage.store_record(primary()).await.unwrap();

        let content = std::fs::read_to_string(dir.path().join("measurements.jsonl")).unwrap();
        let back: StoredRecord = serde_json::from_str(content.lines().next().unwrap()).unwrap();
        assert_eq!(back, stored);
    }

    #[tokio::test]
    async fn second_instance_is_locked_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_str().unwrap();
        let _first = Storage::new(path).await.unwrap();
        let second = Storage::new(path).await;
        assert!(second.is_err());
        assert!(second
            .unwrap_err()
            .to_string()
            .contains("already in use"));
    }

    #[tokio::test]
    async fn stats_on_empty_dir_are_zero() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().to_str().unwrap()).await.unwrap();
        let stats = storage.stats().await.unwrap();
        assert_eq!(stats.measurements, 0);
        assert_eq!(stats.ph, 0);
        assert_eq!(stats.control, 0);
    }
}
