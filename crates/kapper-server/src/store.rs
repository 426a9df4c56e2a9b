//! In-memory provider snapshot backed by the providers file.
//!
//! Requests clone the current `Arc<ProviderSnapshot>` and work on it without
//! holding the lock; a reload builds a whole new snapshot and swaps it in.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use kapper_core::{ConfigError, Point, SkippedRecord};
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("providers load task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug)]
pub struct ProviderSnapshot {
    pub points: Vec<Point>,
    pub skipped: Vec<SkippedRecord>,
    pub loaded_at: DateTime<Utc>,
}

impl ProviderSnapshot {
    #[must_use]
    pub fn from_records(records: &[kapper_core::ProviderRecord]) -> Self {
        let batch = kapper_core::into_points(records);
        Self {
            points: batch.points,
            skipped: batch.skipped,
            loaded_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderStore {
    path: Option<Arc<PathBuf>>,
    current: Arc<RwLock<Arc<ProviderSnapshot>>>,
}

impl ProviderStore {
    /// Load the providers file and build the first snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be read, parsed, or validated.
    pub async fn open(path: PathBuf) -> Result<Self, StoreError> {
        let snapshot = read_snapshot(path.clone()).await?;
        log_snapshot(&snapshot, "providers loaded");
        Ok(Self {
            path: Some(Arc::new(path)),
            current: Arc::new(RwLock::new(Arc::new(snapshot))),
        })
    }

    /// A store with fixed contents and nothing to reload from.
    #[cfg(test)]
    pub fn from_snapshot(snapshot: ProviderSnapshot) -> Self {
        Self {
            path: None,
            current: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    pub async fn snapshot(&self) -> Arc<ProviderSnapshot> {
        Arc::clone(&*self.current.read().await)
    }

    /// Re-read the providers file and swap in the new snapshot.
    ///
    /// On failure the previous snapshot stays in place.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be read, parsed, or validated.
    pub async fn reload(&self) -> Result<usize, StoreError> {
        let Some(path) = &self.path else {
            return Ok(self.snapshot().await.points.len());
        };
        let snapshot = read_snapshot(path.as_ref().clone()).await?;
        log_snapshot(&snapshot, "providers reloaded");
        let count = snapshot.points.len();
        *self.current.write().await = Arc::new(snapshot);
        Ok(count)
    }
}

async fn read_snapshot(path: PathBuf) -> Result<ProviderSnapshot, StoreError> {
    let file = tokio::task::spawn_blocking(move || kapper_core::load_providers(&path)).await??;
    Ok(ProviderSnapshot::from_records(&file.providers))
}

fn log_snapshot(snapshot: &ProviderSnapshot, message: &'static str) {
    for skipped in &snapshot.skipped {
        tracing::warn!(id = %skipped.id, reason = %skipped.reason, "provider skipped");
    }
    tracing::info!(
        accepted = snapshot.points.len(),
        skipped = snapshot.skipped.len(),
        "{message}"
    );
}
