//! Testing utilities for the life hub.
//!
//! This module provides doubles for every seam the hub depends on:
//! - `FixedClock` for deterministic timestamps
//! - `FaultyStore` for injecting storage failures
//! - `RecordingObserver` for asserting on what a renderer would see
//! - `ScriptedVcs` for exercising the publish sequence without `git`
//! - `TestHub` to wire them together

use crate::clock::Clock;
use crate::hub::{HubConfig, LifeHub, Notice, StatusObserver};
use crate::projection::{ActivityLine, StatusSummary};
use crate::status::LifeState;
use crate::store::{MemoryStore, Store, StoreError, StoreKeys};
use crate::sync::{CommandFailed, PublishStep, VersionControl};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    millis: AtomicI64,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            millis: AtomicI64::new(at.timestamp_millis()),
        }
    }

    /// 2026-10-15 12:00:00 UTC.
    pub fn default_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0)
            .single()
            .unwrap_or_default()
    }

    pub fn set(&self, at: DateTime<Utc>) {
        self.millis.store(at.timestamp_millis(), Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        self.millis.fetch_add(by.num_milliseconds(), Ordering::SeqCst);
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::new(Self::default_start())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }
}

/// In-memory store whose reads and writes can be made to fail per key.
#[derive(Debug, Default)]
pub struct FaultyStore {
    inner: MemoryStore,
    failing_writes: Mutex<HashSet<String>>,
    failing_reads: Mutex<HashSet<String>>,
    failing_sets: Mutex<HashSet<String>>,
    all_writes_fail: Mutex<bool>,
    writes: Mutex<Vec<String>>,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every `set` and `remove` of `key`.
    pub fn fail_writes_to(&self, key: impl Into<String>) {
        lock(&self.failing_writes).insert(key.into());
    }

    /// Fail every `set` of `key` while still allowing it to be removed.
    pub fn fail_sets_to(&self, key: impl Into<String>) {
        lock(&self.failing_sets).insert(key.into());
    }

    /// Fail every `get` of `key`.
    pub fn fail_reads_of(&self, key: impl Into<String>) {
        lock(&self.failing_reads).insert(key.into());
    }

    /// Fail all writes, as a full or disabled storage would.
    pub fn fail_all_writes(&self, fail: bool) {
        *lock(&self.all_writes_fail) = fail;
    }

    /// Remove all injected faults.
    pub fn heal(&self) {
        lock(&self.failing_writes).clear();
        lock(&self.failing_reads).clear();
        lock(&self.failing_sets).clear();
        *lock(&self.all_writes_fail) = false;
    }

    /// Keys of every successful `set`, in order.
    pub fn writes(&self) -> Vec<String> {
        lock(&self.writes).clone()
    }

    fn check_write(&self, key: &str) -> Result<(), StoreError> {
        if *lock(&self.all_writes_fail) || lock(&self.failing_writes).contains(key) {
            return Err(StoreError::Unavailable(format!("write to '{key}' rejected")));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for FaultyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if lock(&self.failing_reads).contains(key) {
            return Err(StoreError::Unavailable(format!("read of '{key}' rejected")));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_write(key)?;
        if lock(&self.failing_sets).contains(key) {
            return Err(StoreError::Unavailable(format!("write to '{key}' rejected")));
        }
        self.inner.set(key, value).await?;
        lock(&self.writes).push(key.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check_write(key)?;
        self.inner.remove(key).await
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        self.inner.keys().await
    }
}

/// Observer that records everything it is sent.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    summaries: Mutex<Vec<StatusSummary>>,
    feeds: Mutex<Vec<Vec<ActivityLine>>>,
    notices: Mutex<Vec<Notice>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summaries(&self) -> Vec<StatusSummary> {
        lock(&self.summaries).clone()
    }

    pub fn last_summary(&self) -> Option<StatusSummary> {
        lock(&self.summaries).last().cloned()
    }

    pub fn last_feed(&self) -> Option<Vec<ActivityLine>> {
        lock(&self.feeds).last().cloned()
    }

    pub fn notices(&self) -> Vec<Notice> {
        lock(&self.notices).clone()
    }

    pub fn update_count(&self) -> usize {
        lock(&self.summaries).len()
    }
}

impl StatusObserver for RecordingObserver {
    fn status_changed(&self, summary: &StatusSummary, feed: &[ActivityLine]) {
        lock(&self.summaries).push(summary.clone());
        lock(&self.feeds).push(feed.to_vec());
    }

    fn notice(&self, notice: &Notice) {
        lock(&self.notices).push(notice.clone());
    }
}

/// Version control that records calls and fails at a chosen step.
#[derive(Debug, Default)]
pub struct ScriptedVcs {
    fail_at: Mutex<Option<PublishStep>>,
    calls: Mutex<Vec<PublishStep>>,
    messages: Mutex<Vec<String>>,
}

impl ScriptedVcs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `step` fail from now on.
    pub fn failing_at(step: PublishStep) -> Self {
        let vcs = Self::new();
        *lock(&vcs.fail_at) = Some(step);
        vcs
    }

    /// Steps attempted, in order, including a failing one.
    pub fn calls(&self) -> Vec<PublishStep> {
        lock(&self.calls).clone()
    }

    pub fn commit_messages(&self) -> Vec<String> {
        lock(&self.messages).clone()
    }

    fn run(&self, step: PublishStep) -> Result<(), CommandFailed> {
        lock(&self.calls).push(step);
        if *lock(&self.fail_at) == Some(step) {
            return Err(CommandFailed(format!("scripted {step} failure")));
        }
        Ok(())
    }
}

#[async_trait]
impl VersionControl for ScriptedVcs {
    async fn stage_all(&self) -> Result<(), CommandFailed> {
        self.run(PublishStep::Stage)
    }

    async fn commit(&self, message: &str) -> Result<(), CommandFailed> {
        self.run(PublishStep::Commit)?;
        lock(&self.messages).push(message.to_string());
        Ok(())
    }

    async fn push(&self) -> Result<(), CommandFailed> {
        self.run(PublishStep::Push)
    }
}

/// A hub wired to test doubles.
pub struct TestHub {
    pub hub: LifeHub,
    pub store: Arc<FaultyStore>,
    pub clock: Arc<FixedClock>,
    pub observer: Arc<RecordingObserver>,
}

impl TestHub {
    /// Open over an empty store, so the sample data gets seeded.
    pub async fn seeded() -> Self {
        Self::open_over(Arc::new(FaultyStore::new())).await
    }

    /// Open over a store already holding the empty "Unknown" document.
    pub async fn empty() -> Self {
        let store = Arc::new(FaultyStore::new());
        let document = LifeState::unknown(FixedClock::default_start());
        let json = serde_json::to_string(&document).unwrap_or_default();
        // MemoryStore writes cannot fail without injected faults.
        let _ = store.set(&StoreKeys::default().primary(), &json).await;
        Self::open_over(store).await
    }

    /// Open over an existing store.
    pub async fn open_over(store: Arc<FaultyStore>) -> Self {
        let clock = Arc::new(FixedClock::default());
        let mut hub =
            LifeHub::open_with_clock(store.clone(), clock.clone(), HubConfig::default()).await;
        let observer = Arc::new(RecordingObserver::new());
        hub.subscribe(observer.clone());

        Self {
            hub,
            store,
            clock,
            observer,
        }
    }

    /// Reopen a fresh hub over the same store and clock.
    pub async fn reopen(&self) -> LifeHub {
        LifeHub::open_with_clock(self.store.clone(), self.clock.clone(), HubConfig::default())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_moves_only_when_told() {
        let clock = FixedClock::default();
        let start = clock.now();
        assert_eq!(start, FixedClock::default_start());

        clock.advance(Duration::minutes(90));
        assert_eq!(clock.now() - start, Duration::minutes(90));

        clock.set(start);
        assert_eq!(clock.now(), start);
    }

    #[tokio::test]
    async fn test_faulty_store_injection() {
        let store = FaultyStore::new();
        store.fail_writes_to("a");

        assert!(store.set("a", "1").await.is_err());
        store.set("b", "2").await.unwrap();
        assert_eq!(store.writes(), vec!["b"]);

        store.fail_reads_of("b");
        assert!(store.get("b").await.is_err());

        store.heal();
        store.set("a", "1").await.unwrap();
        assert_eq!(store.get("b").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_scripted_vcs_fails_at_step() {
        let vcs = ScriptedVcs::failing_at(PublishStep::Commit);

        vcs.stage_all().await.unwrap();
        assert!(vcs.commit("msg").await.is_err());
        assert_eq!(vcs.calls(), vec![PublishStep::Stage, PublishStep::Commit]);
        assert!(vcs.commit_messages().is_empty());
    }
}
