//! Personal life-tracking hub.
//!
//! This crate provides:
//! - A bounded, newest-first activity log of typed entries
//! - Validation of raw form input into entries
//! - Status projections for dashboards and external consumers
//! - A key-value store adapter with daily backups
//! - A sync gateway that publishes the status document through git
//!
//! # Quick Start
//!
//! ```ignore
//! use lifehub_core::{FileStore, HubConfig, LifeHub, MoodForm};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(FileStore::new("./lifehub-data"));
//!     let mut hub = LifeHub::open(store, HubConfig::default()).await;
//!
//!     hub.log(MoodForm {
//!         mood: "good".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//!     println!("{}", hub.ask("how am I feeling?").await);
//!     Ok(())
//! }
//! ```

pub mod assistant;
pub mod clock;
pub mod entry;
pub mod export;
pub mod hub;
pub mod ingest;
pub mod projection;
pub mod status;
pub mod store;
pub mod sync;
pub mod testing;

// Primary public API
pub use clock::{Clock, SystemClock};
pub use entry::{Category, ChanceActivity, Entry};
pub use export::ExportBundle;
pub use hub::{
    HubConfig, HubError, LastSave, LifeHub, LoadOutcome, LogReceipt, Notice, NoticeLevel,
    SaveReport, StatusObserver, StorageReport,
};
pub use ingest::{
    ChanceForm, EntryForm, FinanceForm, GoalForm, HealthForm, MoodForm, MusicForm, ProjectForm,
    ValidationError,
};
pub use projection::{ActivityLine, StatusSummary};
pub use status::LifeState;
pub use store::{FileStore, MemoryStore, Store, StoreError, StoreKeys};
pub use sync::{
    GitCli, PublishError, PublishReceipt, PublishStep, SyncGateway, SyncPayload, VersionControl,
};
pub use testing::{FaultyStore, FixedClock, RecordingObserver, ScriptedVcs, TestHub};
