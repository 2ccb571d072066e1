//! Local export of the hub's data to a single JSON artifact.

use crate::status::LifeState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Everything needed to inspect or restore the hub elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    /// The last persisted status summary, or `{}` if none was stored.
    pub status: serde_json::Value,

    /// The full in-memory document.
    pub full_data: LifeState,

    pub export_date: DateTime<Utc>,
}

impl ExportBundle {
    pub fn new(status: serde_json::Value, full_data: LifeState, export_date: DateTime<Utc>) -> Self {
        Self {
            status,
            full_data,
            export_date,
        }
    }

    /// Suggested file name, e.g. `lifehub-export-2026-10-15.json`.
    pub fn file_name(&self) -> String {
        format!("lifehub-export-{}.json", self.export_date.format("%Y-%m-%d"))
    }

    /// Write the bundle as pretty JSON into `dir` under [`Self::file_name`].
    pub async fn write_to(&self, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
        let path = dir.as_ref().join(self.file_name());
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content).await?;
        Ok(path)
    }
}
