//! Append-only, newest-first log of per-recipient transfer attempts.

use chrono::{DateTime, Local};
use ethers::types::{Address, TxHash};
use std::collections::VecDeque;
use std::fmt;

/// Process-unique identity of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogId(pub u64);

impl fmt::Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of a transfer attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

impl LogStatus {
    /// Success and Error are final; nothing may overwrite them
    pub fn is_terminal(&self) -> bool {
        matches!(self, LogStatus::Success | LogStatus::Error)
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub id: LogId,
    pub recipient: Address,
    pub tx_hash: Option<TxHash>,
    pub status: LogStatus,
    pub message: String,
    pub timestamp: DateTime<Local>,
}

impl LogEntry {
    /// New attempt in the pending state, timestamped now
    pub fn pending(id: LogId, recipient: Address) -> Self {
        Self {
            id,
            recipient,
            tx_hash: None,
            status: LogStatus::Pending,
            message: "Sending transfer...".to_string(),
            timestamp: Local::now(),
        }
    }
}

/// Progress reported for an existing entry
#[derive(Debug, Clone, PartialEq)]
pub enum LogUpdate {
    /// Transaction accepted by the node; still awaiting confirmation
    Submitted { tx_hash: TxHash },
    Confirmed,
    Failed { reason: String },
}

/// Per-status entry counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogStatistics {
    pub total: usize,
    pub pending: usize,
    pub success: usize,
    pub failed: usize,
}

impl LogStatistics {
    pub fn summary(&self) -> String {
        format!(
            "Total: {} | Pending: {} | Success: {} | Failed: {}",
            self.total, self.pending, self.success, self.failed
        )
    }
}

#[derive(Debug, Default)]
pub struct LogStore {
    entries: VecDeque<LogEntry>,
}

impl LogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new entry at the front
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push_front(entry);
    }

    /// Merge an update into the entry with the given id.
    ///
    /// Returns false when the id is unknown or the entry is already terminal.
    pub fn apply(&mut self, id: LogId, update: LogUpdate) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            tracing::debug!("Ignoring update for unknown log entry {}", id);
            return false;
        };
        if entry.status.is_terminal() {
            tracing::debug!("Ignoring update for finished log entry {}: {:?}", id, update);
            return false;
        }

        match update {
            LogUpdate::Submitted { tx_hash } => {
                entry.tx_hash = Some(tx_hash);
                entry.message = "Transaction submitted, waiting for confirmation...".to_string();
            }
            LogUpdate::Confirmed => {
                entry.status = LogStatus::Success;
                entry.message = "Transfer confirmed".to_string();
            }
            LogUpdate::Failed { reason } => {
                entry.status = LogStatus::Error;
                entry.message = if reason.trim().is_empty() {
                    "Transaction failed".to_string()
                } else {
                    reason
                };
            }
        }
        true
    }

    pub fn get(&self, id: LogId) -> Option<&LogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entries, newest first
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn statistics(&self) -> LogStatistics {
        let mut stats = LogStatistics::default();
        for entry in &self.entries {
            stats.total += 1;
            match entry.status {
                LogStatus::Idle => {}
                LogStatus::Pending => stats.pending += 1,
                LogStatus::Success => stats.success += 1,
                LogStatus::Error => stats.failed += 1,
            }
        }
        stats
    }
}
