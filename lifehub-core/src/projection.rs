//! Status projection: bounded, display-ready views of the log.
//!
//! "Recent" is positional: a projection takes the first N entries of the
//! newest-first log and never filters by category or age.

use crate::entry::{Category, Entry};
use crate::status::LifeState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entries kept in the persisted, externally queryable status.
pub const STATUS_RECENT: usize = 10;

/// Entries shown in the recent-activity feed.
pub const DISPLAY_RECENT: usize = 5;

/// Header fields plus a prefix of the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub mood: String,
    pub weather: String,
    pub last_checkin: DateTime<Utc>,
    pub chance_status: String,
    pub predicted_next_action: String,
    pub recent_activities: Vec<Entry>,
}

impl StatusSummary {
    pub fn latest(&self) -> Option<&Entry> {
        self.recent_activities.first()
    }
}

/// Summarize `state`, keeping the first `max_recent` entries.
pub fn project(state: &LifeState, max_recent: usize) -> StatusSummary {
    StatusSummary {
        mood: state.mood().to_string(),
        weather: state.weather().to_string(),
        last_checkin: state.last_checkin(),
        chance_status: state.chance_status().to_string(),
        predicted_next_action: state.predicted_next_action().to_string(),
        recent_activities: state.activities().recent(max_recent).to_vec(),
    }
}

/// One row of the recent-activity feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityLine {
    pub category: Category,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&Entry> for ActivityLine {
    fn from(entry: &Entry) -> Self {
        Self {
            category: entry.category(),
            description: entry.describe(),
            timestamp: entry.timestamp(),
        }
    }
}

/// Feed rows for the first `max_recent` entries.
pub fn activity_feed(state: &LifeState, max_recent: usize) -> Vec<ActivityLine> {
    state
        .activities()
        .recent(max_recent)
        .iter()
        .map(ActivityLine::from)
        .collect()
}
