use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage backend types
///
/// `S3` writes to the configured bucket and relies on S3 event notifications to reach the
/// watcher. `Local` writes under a directory and emits object-created events in process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Local,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "local" => Ok(StorageBackend::Local),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::Local => write!(f, "local"),
        }
    }
}

/// Work queue backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueBackend {
    Sqs,
    Memory,
}

impl FromStr for QueueBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqs" => Ok(QueueBackend::Sqs),
            "memory" => Ok(QueueBackend::Memory),
            _ => Err(anyhow::anyhow!("Invalid queue backend: {}", s)),
        }
    }
}

impl Display for QueueBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            QueueBackend::Sqs => write!(f, "sqs"),
            QueueBackend::Memory => write!(f, "memory"),
        }
    }
}
