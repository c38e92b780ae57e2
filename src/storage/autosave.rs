//! Periodic flush of the soul ledger to disk.
//!
//! The autosave task runs alongside the event loop. Each tick it takes the ledger lock
//! only long enough to snapshot the in-memory state, then writes the snapshot on a
//! blocking thread so a slow disk never stalls event handling. Shutdown is observed only
//! between saves: a save that has started always finishes.
//!
//! # Features
//! - Fixed interval from `[autosave]` config (see [`crate::config::AutosaveConfig`])
//! - Full-snapshot writes through [`super::write_document`]
//! - Snapshots reach disk in the order they were taken, across every [`SoulsFile`] clone
//! - Save counters for status reporting
//! - Graceful stop that waits for any in-flight save

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, error, info};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::write_document;
use crate::souls::{SharedLedger, SoulsError};

/// Counters kept by the autosave task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutosaveStats {
    pub saves: u64,
    pub failures: u64,
    pub last_save: Option<DateTime<Utc>>,
}

/// Souls document on disk plus the gate every writer of it goes through.
///
/// Clones share the gate. A flush holds it from snapshot to rename, so an older
/// snapshot can never land on top of a newer one.
#[derive(Debug, Clone)]
pub struct SoulsFile {
    path: PathBuf,
    write_gate: Arc<Mutex<()>>,
}

impl SoulsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Snapshot the ledger and write it to `file`. Returns the number of players written.
///
/// The ledger lock is released before any file I/O starts; the file's write gate is not.
pub async fn flush_now(ledger: &SharedLedger, file: &SoulsFile) -> Result<usize, SoulsError> {
    let _gate = file.write_gate.lock().await;
    let doc = {
        let store = ledger.lock().await;
        store.save_all()
    };
    let count = doc.players.len();
    let path = file.path.clone();
    tokio::task::spawn_blocking(move || write_document(&path, &doc))
        .await
        .map_err(|e| SoulsError::Internal(format!("save task failed: {}", e)))??;
    Ok(count)
}

/// Running autosave task.
pub struct Autosaver {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<AutosaveStats>,
}

impl Autosaver {
    /// Start flushing `ledger` to `file` every `interval`. The first save happens one
    /// full interval after start.
    pub fn spawn(ledger: SharedLedger, file: SoulsFile, interval: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run(ledger, file, interval, shutdown_rx));
        Self { shutdown_tx, task }
    }

    /// Signal the task to stop and wait for it, including any save in progress.
    pub async fn stop(self) -> AutosaveStats {
        let _ = self.shutdown_tx.send(true);
        match self.task.await {
            Ok(stats) => stats,
            Err(e) => {
                error!("Autosave task ended abnormally: {}", e);
                AutosaveStats::default()
            }
        }
    }
}

async fn run(
    ledger: SharedLedger,
    file: SoulsFile,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) -> AutosaveStats {
    let mut stats = AutosaveStats::default();
    let start = tokio::time::Instant::now() + interval;
    let mut ticker = tokio::time::interval_at(start, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(
        "Autosave every {}s to {}",
        interval.as_secs(),
        file.path().display()
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match flush_now(&ledger, &file).await {
                    Ok(count) => {
                        stats.saves += 1;
                        stats.last_save = Some(Utc::now());
                        info!("Soul data autosaved ({} player(s))", count);
                    }
                    Err(e) => {
                        stats.failures += 1;
                        error!("Autosave to {} failed: {}", file.path().display(), e);
                    }
                }
            }
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    debug!("Autosave task stopping");
                    break;
                }
            }
        }
    }
    stats
}
