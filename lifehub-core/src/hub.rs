//! LifeHub - the controller that owns the status document.
//!
//! The hub is constructed once at startup and handed around by reference.
//! Every mutation runs the same chain to completion:
//! validate, append, persist (primary + daily backup), write the status
//! projection, then notify observers. Storage failures never abort that
//! chain; they are reported back and surfaced as notices.

use crate::assistant;
use crate::clock::{Clock, SystemClock};
use crate::entry::Category;
use crate::export::ExportBundle;
use crate::ingest::{EntryForm, ValidationError};
use crate::projection::{
    activity_feed, project, ActivityLine, StatusSummary, DISPLAY_RECENT, STATUS_RECENT,
};
use crate::status::LifeState;
use crate::store::{Store, StoreError, StoreKeys};
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors from hub operations that do fail the caller.
#[derive(Debug, Error)]
pub enum HubError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Configuration for a hub.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Prefix for every store key.
    pub key_prefix: String,

    /// Entries kept in the persisted status summary.
    pub status_recent: usize,

    /// Entries shown in the activity feed.
    pub display_recent: usize,
}

impl HubConfig {
    pub fn new() -> Self {
        Self {
            key_prefix: "lifehub".to_string(),
            status_recent: STATUS_RECENT,
            display_recent: DISPLAY_RECENT,
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    pub fn with_status_recent(mut self, count: usize) -> Self {
        self.status_recent = count;
        self
    }

    pub fn with_display_recent(mut self, count: usize) -> Self {
        self.display_recent = count;
        self
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A user-visible, non-blocking message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Receives state changes. Renderers implement this.
pub trait StatusObserver: Send + Sync {
    /// Called after every mutation with freshly projected views.
    fn status_changed(&self, summary: &StatusSummary, feed: &[ActivityLine]);

    fn notice(&self, _notice: &Notice) {}
}

/// How the document was obtained on load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A stored document was read.
    Restored,
    /// Nothing was stored; sample data was seeded and persisted.
    Seeded,
    /// A stored document could not be read; started from the empty default.
    Recovered { reason: String },
}

/// Result of the two writes a save performs.
#[derive(Debug)]
pub struct SaveReport {
    pub primary_key: String,
    pub primary: Result<(), StoreError>,
    pub backup_key: String,
    pub backup: Result<(), StoreError>,
}

impl SaveReport {
    pub fn is_ok(&self) -> bool {
        self.primary.is_ok() && self.backup.is_ok()
    }

    /// Keys whose write failed, with the error.
    pub fn failures(&self) -> Vec<(&str, &StoreError)> {
        [
            (self.primary_key.as_str(), &self.primary),
            (self.backup_key.as_str(), &self.backup),
        ]
        .into_iter()
        .filter_map(|(key, result)| result.as_ref().err().map(|e| (key, e)))
        .collect()
    }
}

/// What a successful `log` call did.
#[derive(Debug)]
pub struct LogReceipt {
    pub category: Category,
    pub timestamp: DateTime<Utc>,
    pub save: SaveReport,
}

/// When the primary document was last written, as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastSave {
    Never,
    At(DateTime<Utc>),
    Unreadable,
}

/// Storage diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageReport {
    pub available: bool,
    pub entry_count: usize,
    pub last_save: LastSave,
}

/// The life hub.
pub struct LifeHub {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    keys: StoreKeys,
    config: HubConfig,
    state: LifeState,
    observers: Vec<Arc<dyn StatusObserver>>,
    load_outcome: LoadOutcome,
    last_saved_at: Option<DateTime<Utc>>,
}

impl LifeHub {
    /// Open a hub over `store` using the wall clock.
    pub async fn open(store: Arc<dyn Store>, config: HubConfig) -> Self {
        Self::open_with_clock(store, Arc::new(SystemClock), config).await
    }

    /// Open a hub with an explicit clock.
    pub async fn open_with_clock(
        store: Arc<dyn Store>,
        clock: Arc<dyn Clock>,
        config: HubConfig,
    ) -> Self {
        let now = clock.now();
        let mut hub = Self {
            store,
            clock,
            keys: StoreKeys::new(config.key_prefix.clone()),
            config,
            state: LifeState::unknown(now),
            observers: Vec::new(),
            load_outcome: LoadOutcome::Restored,
            last_saved_at: None,
        };
        hub.load().await;
        hub
    }

    /// Register an observer. It is immediately sent the current status.
    pub fn subscribe(&mut self, observer: Arc<dyn StatusObserver>) {
        let summary = self.summary();
        let feed = self.recent_activity();
        observer.status_changed(&summary, &feed);
        self.observers.push(observer);
    }

    /// (Re)load the document from the store.
    ///
    /// A missing document seeds sample data and persists it. A document that
    /// exists but cannot be read falls back to the sample header with an empty
    /// log, and is left in storage untouched until the next save.
    pub async fn load(&mut self) -> LoadOutcome {
        let now = self.clock.now();
        let primary = self.keys.primary();

        let outcome = match self.store.get(&primary).await {
            Ok(Some(raw)) => match serde_json::from_str::<LifeState>(&raw) {
                Ok(state) => {
                    info!(
                        entries = state.activities().len(),
                        "Loaded status document"
                    );
                    self.state = state;
                    LoadOutcome::Restored
                }
                Err(e) => {
                    warn!(error = %e, key = %primary, "Stored document is malformed, starting empty");
                    self.state = LifeState::recovered(now);
                    LoadOutcome::Recovered {
                        reason: e.to_string(),
                    }
                }
            },
            Ok(None) => {
                info!("No saved data found, seeding sample data");
                self.state = LifeState::sample(now);
                self.persist().await;
                LoadOutcome::Seeded
            }
            Err(e) => {
                warn!(error = %e, key = %primary, "Could not read stored document, starting empty");
                self.state = LifeState::recovered(now);
                LoadOutcome::Recovered {
                    reason: e.to_string(),
                }
            }
        };

        if let LoadOutcome::Recovered { .. } = outcome {
            self.announce(Notice::error("Error loading data. Starting with an empty log."));
        }

        self.load_outcome = outcome.clone();
        self.refresh().await;
        outcome
    }

    /// Validate a form and, on success, record it.
    ///
    /// On validation failure nothing changes. A failed save is reported in
    /// the receipt and as a notice; the entry stays in memory either way.
    pub async fn log<F: EntryForm>(&mut self, form: F) -> Result<LogReceipt, ValidationError> {
        let timestamp = self.state.next_timestamp(self.clock.now());
        let entry = form.into_entry(timestamp).inspect_err(|e| {
            debug!(category = %e.category(), reason = %e, "Rejected entry");
        })?;

        let category = entry.category();
        debug!(%category, %timestamp, "Logging entry");
        self.state.append(entry);

        let save = self.persist().await;
        self.refresh().await;
        self.announce(Notice::success("Entry logged successfully!"));

        Ok(LogReceipt {
            category,
            timestamp,
            save,
        })
    }

    /// Set weather and/or the predicted next action.
    pub async fn update_conditions(
        &mut self,
        weather: Option<String>,
        predicted_next_action: Option<String>,
    ) -> SaveReport {
        let now = self.clock.now();
        self.state
            .update_conditions(weather, predicted_next_action, now);
        let save = self.persist().await;
        self.refresh().await;
        save
    }

    /// Persist the full document under the primary key and today's backup key.
    pub async fn save(&mut self) -> SaveReport {
        self.persist().await
    }

    /// Write the status projection to its key and return it.
    ///
    /// A failed write is logged only.
    pub async fn update_status(&self) -> StatusSummary {
        let summary = self.summary();
        let key = self.keys.status();
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => {
                if let Err(e) = self.store.set(&key, &json).await {
                    error!(error = %e, %key, "Error saving status");
                }
            }
            Err(e) => error!(error = %e, "Error encoding status"),
        }
        summary
    }

    /// Remove the stored document and status, and reset to the empty default.
    ///
    /// The empty default is written back to the primary key so a later load
    /// restores it instead of reseeding sample data. If that write fails the
    /// in-memory state is still cleared, but the error is returned and a later
    /// load will reseed. Daily backups are kept.
    pub async fn clear(&mut self) -> Result<(), HubError> {
        let result = self.remove_documents().await;
        if let Err(e) = &result {
            error!(error = %e, "Error clearing data");
            self.announce(Notice::error("Error clearing data."));
            return result;
        }

        self.state = LifeState::unknown(self.clock.now());
        let primary = self.keys.primary();
        let written = match serde_json::to_string(&self.state) {
            Ok(json) => self.store.set(&primary, &json).await,
            Err(e) => Err(StoreError::Unavailable(format!(
                "document could not be encoded: {e}"
            ))),
        };
        self.refresh().await;

        if let Err(e) = written {
            error!(error = %e, key = %primary, "Error saving cleared document");
            self.announce(Notice::error(
                "Error saving data. Please check your storage.",
            ));
            return Err(e.into());
        }

        info!("All data cleared");
        self.announce(Notice::success("All data cleared successfully!"));
        Ok(())
    }

    /// Throw away the current document and reseed the sample data.
    pub async fn reset_to_sample(&mut self) -> Result<SaveReport, HubError> {
        if let Err(e) = self.remove_documents().await {
            error!(error = %e, "Error resetting data");
            self.announce(Notice::error("Error resetting data."));
            return Err(e);
        }

        self.state = LifeState::sample(self.clock.now());
        let save = self.persist().await;
        info!("Data reset to sample");
        self.refresh().await;
        self.announce(Notice::success("Data reset successfully!"));
        Ok(save)
    }

    /// Snapshot of the last persisted status plus the full document.
    pub async fn export(&self) -> Result<ExportBundle, HubError> {
        let status = match self.store.get(&self.keys.status()).await? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Stored status is malformed, exporting empty status");
                serde_json::Value::Object(Default::default())
            }),
            None => serde_json::Value::Object(Default::default()),
        };

        Ok(ExportBundle::new(status, self.state.clone(), self.clock.now()))
    }

    /// Answer a question about the current status.
    ///
    /// Reads the persisted status; falls back to a fresh projection when that
    /// cannot be read.
    pub async fn ask(&self, question: &str) -> String {
        let stored = match self.store.get(&self.keys.status()).await {
            Ok(Some(raw)) => serde_json::from_str::<StatusSummary>(&raw).ok(),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Could not read status for assistant");
                None
            }
        };
        let status = stored.unwrap_or_else(|| self.summary());
        assistant::answer(question, &status)
    }

    /// Storage availability, entry count and last save time.
    pub async fn storage_report(&self) -> StorageReport {
        let probe = self.keys.probe();
        let available = self.store.set(&probe, &probe).await.is_ok()
            && self.store.remove(&probe).await.is_ok();

        let last_save = match self.store.get(&self.keys.primary()).await {
            Ok(Some(raw)) => match serde_json::from_str::<LifeState>(&raw) {
                Ok(state) => LastSave::At(state.last_checkin()),
                Err(_) => LastSave::Unreadable,
            },
            Ok(None) => LastSave::Never,
            Err(_) => LastSave::Unreadable,
        };

        StorageReport {
            available,
            entry_count: self.state.activities().len(),
            last_save,
        }
    }

    /// Dates that have a daily backup, oldest first.
    pub async fn backups(&self) -> Result<Vec<NaiveDate>, HubError> {
        let mut dates: Vec<NaiveDate> = self
            .store
            .keys()
            .await?
            .iter()
            .filter_map(|key| self.keys.backup_date(key))
            .collect();
        dates.sort();
        Ok(dates)
    }

    /// Status summary for external consumers.
    pub fn summary(&self) -> StatusSummary {
        project(&self.state, self.config.status_recent)
    }

    /// Rows for the recent-activity feed.
    pub fn recent_activity(&self) -> Vec<ActivityLine> {
        activity_feed(&self.state, self.config.display_recent)
    }

    pub fn state(&self) -> &LifeState {
        &self.state
    }

    pub fn keys(&self) -> &StoreKeys {
        &self.keys
    }

    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    /// When this hub last completed a fully successful save.
    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    async fn persist(&mut self) -> SaveReport {
        let now = self.clock.now();
        let primary_key = self.keys.primary();
        let backup_key = self.keys.backup(now.date_naive());

        let (primary, backup) = match serde_json::to_string(&self.state) {
            Ok(json) => (
                self.store.set(&primary_key, &json).await,
                self.store.set(&backup_key, &json).await,
            ),
            Err(e) => {
                error!(error = %e, "Error encoding document");
                let reason = format!("document could not be encoded: {e}");
                (
                    Err(StoreError::Unavailable(reason.clone())),
                    Err(StoreError::Unavailable(reason)),
                )
            }
        };

        let report = SaveReport {
            primary_key,
            primary,
            backup_key,
            backup,
        };

        if report.is_ok() {
            debug!(entries = self.state.activities().len(), "Data saved");
            self.last_saved_at = Some(now);
        } else {
            for (key, e) in report.failures() {
                error!(error = %e, %key, "Error saving data");
            }
            self.announce(Notice::error(
                "Error saving data. Please check your storage.",
            ));
        }

        report
    }

    async fn remove_documents(&self) -> Result<(), HubError> {
        self.store.remove(&self.keys.primary()).await?;
        self.store.remove(&self.keys.status()).await?;
        Ok(())
    }

    /// Write the status projection and push fresh views to observers.
    async fn refresh(&self) {
        let summary = self.update_status().await;
        let feed = self.recent_activity();
        for observer in &self.observers {
            observer.status_changed(&summary, &feed);
        }
    }

    fn announce(&self, notice: Notice) {
        for observer in &self.observers {
            observer.notice(&notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hub_config() {
        let config = HubConfig::new()
            .with_key_prefix("travis")
            .with_status_recent(20)
            .with_display_recent(3);

        assert_eq!(config.key_prefix, "travis");
        assert_eq!(config.status_recent, 20);
        assert_eq!(config.display_recent, 3);

        let defaults = HubConfig::default();
        assert_eq!(defaults.status_recent, STATUS_RECENT);
        assert_eq!(defaults.display_recent, DISPLAY_RECENT);
    }

    #[test]
    fn test_save_report_failures() {
        let report = SaveReport {
            primary_key: "lifehub-data".to_string(),
            primary: Ok(()),
            backup_key: "lifehub-backup-2026-10-15".to_string(),
            backup: Err(StoreError::Unavailable("quota exceeded".to_string())),
        };

        assert!(!report.is_ok());
        let failures = report.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "lifehub-backup-2026-10-15");
    }
}
