use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tracker::AssetTracker;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Persisted engine state, enough to resume a session in a new process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub session_id: Uuid,
    pub last_epoch: Option<u64>,
    pub trackers: Vec<TrackerSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerSnapshot {
    pub asset: String,
    pub tracker: AssetTracker,
}

pub fn load_snapshot_from_path(path: &Path) -> Result<Option<EngineSnapshot>> {
    if !path.exists() {
        return Ok(None);
    }

    let payload = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let snapshot: EngineSnapshot =
        serde_json::from_str(&payload).context("failed to parse engine snapshot json")?;
    Ok(Some(snapshot))
}

pub fn persist_snapshot_to_path(path: &Path, snapshot: &EngineSnapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }

    let json = serde_json::to_string_pretty(snapshot)
        .context("failed to serialize engine snapshot json")?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
