//! The activity log and the status header that rides along with it.
//!
//! `LifeState` is the canonical document: it is what gets persisted under the
//! primary key, and everything else (status summaries, activity feeds,
//! exports) is derived from it.

use crate::entry::{ChanceActivity, ChanceEntry, Entry, MoodEntry, MusicEntry};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of entries kept in the log.
pub const MAX_ACTIVITIES: usize = 50;

/// Placeholder for header fields that have never been set.
pub const UNKNOWN: &str = "Unknown";

/// Bounded, newest-first sequence of entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityLog {
    entries: Vec<Entry>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the head, dropping whatever falls past `MAX_ACTIVITIES`.
    pub fn push_front(&mut self, entry: Entry) {
        self.entries.insert(0, entry);
        self.entries.truncate(MAX_ACTIVITIES);
    }

    /// The most recent entry.
    pub fn latest(&self) -> Option<&Entry> {
        self.entries.first()
    }

    /// The first `count` entries, newest-first.
    pub fn recent(&self, count: usize) -> &[Entry] {
        &self.entries[..count.min(self.entries.len())]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Entry> for ActivityLog {
    /// Builds a log from entries already in newest-first order.
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        let mut entries: Vec<Entry> = iter.into_iter().collect();
        entries.truncate(MAX_ACTIVITIES);
        Self { entries }
    }
}

/// The persisted status document.
///
/// Header fields missing from a stored document fall back to their defaults,
/// so older or hand-edited documents still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeState {
    #[serde(default = "unknown")]
    mood: String,

    #[serde(default = "unknown")]
    weather: String,

    #[serde(default = "Utc::now")]
    last_checkin: DateTime<Utc>,

    #[serde(default = "unknown")]
    chance_status: String,

    #[serde(default = "unknown")]
    predicted_next_action: String,

    #[serde(default)]
    recent_activities: ActivityLog,

    /// Bumped on every in-memory mutation; never persisted.
    #[serde(skip)]
    revision: u64,
}

fn unknown() -> String {
    UNKNOWN.to_string()
}

impl LifeState {
    /// Empty document with every header field set to "Unknown".
    pub fn unknown(now: DateTime<Utc>) -> Self {
        Self {
            mood: unknown(),
            weather: unknown(),
            last_checkin: now,
            chance_status: unknown(),
            predicted_next_action: unknown(),
            recent_activities: ActivityLog::new(),
            revision: 0,
        }
    }

    /// Bootstrap document used when nothing has been stored yet.
    ///
    /// Three entries, two, four and six hours before `now`.
    pub fn sample(now: DateTime<Utc>) -> Self {
        let recent_activities = [
            Entry::Mood(MoodEntry {
                timestamp: now - Duration::hours(2),
                mood: "Good".to_string(),
                energy: Some(8),
                notes: "Feeling productive today!".to_string(),
            }),
            Entry::Chance(ChanceEntry {
                timestamp: now - Duration::hours(4),
                activity: ChanceActivity::Walked,
                duration: Some(30),
                notes: "Great walk in the park".to_string(),
            }),
            Entry::Music(MusicEntry {
                timestamp: now - Duration::hours(6),
                title: "New Album - Artist".to_string(),
                rating: Some(9),
                notes: "Really digging this new sound".to_string(),
            }),
        ]
        .into_iter()
        .collect();

        Self {
            mood: "Good".to_string(),
            weather: "Sunny".to_string(),
            last_checkin: now,
            chance_status: "Fed and walked".to_string(),
            predicted_next_action: "Work on projects".to_string(),
            recent_activities,
            revision: 0,
        }
    }

    /// Fallback for a stored document that cannot be read: the sample header
    /// over an empty log.
    pub fn recovered(now: DateTime<Utc>) -> Self {
        Self {
            recent_activities: ActivityLog::new(),
            ..Self::sample(now)
        }
    }

    /// Record an entry.
    ///
    /// Mood and chance entries also refresh their header field.
    pub fn append(&mut self, entry: Entry) {
        self.last_checkin = entry.timestamp();
        match &entry {
            Entry::Mood(e) => self.mood = e.mood.clone(),
            Entry::Chance(e) => self.chance_status = chance_status(e.activity, e.duration),
            Entry::Finance(_)
            | Entry::Health(_)
            | Entry::Music(_)
            | Entry::Goal(_)
            | Entry::Project(_) => {}
        }
        self.recent_activities.push_front(entry);
        self.revision += 1;
    }

    /// Explicit header update. Counts as a check-in.
    pub fn update_conditions(
        &mut self,
        weather: Option<String>,
        predicted_next_action: Option<String>,
        at: DateTime<Utc>,
    ) {
        if let Some(weather) = weather {
            self.weather = weather;
        }
        if let Some(prediction) = predicted_next_action {
            self.predicted_next_action = prediction;
        }
        self.last_checkin = self.next_timestamp(at);
        self.revision += 1;
    }

    /// Earliest timestamp a new entry may carry given the clock reads `now`.
    ///
    /// Keeps the log monotonic and `last_checkin` pointing at the newest event
    /// even if the wall clock steps backwards.
    pub fn next_timestamp(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let floor = self
            .recent_activities
            .latest()
            .map(Entry::timestamp)
            .map_or(self.last_checkin, |head| head.max(self.last_checkin));
        now.max(floor)
    }

    pub fn mood(&self) -> &str {
        &self.mood
    }

    pub fn weather(&self) -> &str {
        &self.weather
    }

    pub fn last_checkin(&self) -> DateTime<Utc> {
        self.last_checkin
    }

    pub fn chance_status(&self) -> &str {
        &self.chance_status
    }

    pub fn predicted_next_action(&self) -> &str {
        &self.predicted_next_action
    }

    pub fn activities(&self) -> &ActivityLog {
        &self.recent_activities
    }

    /// In-memory mutation counter; zero for a freshly loaded document.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// `"walked"` or `"walked for 30 minutes"`.
pub fn chance_status(activity: ChanceActivity, duration: Option<u32>) -> String {
    match duration {
        Some(minutes) => format!("{activity} for {minutes} minutes"),
        None => activity.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{FinanceEntry, HealthEntry};
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap()
    }

    fn mood_at(mood: &str, at: DateTime<Utc>) -> Entry {
        Entry::Mood(MoodEntry {
            timestamp: at,
            mood: mood.to_string(),
            energy: None,
            notes: String::new(),
        })
    }

    #[test]
    fn test_log_is_bounded_and_newest_first() {
        let mut state = LifeState::unknown(t0());
        for i in 0..75 {
            state.append(mood_at(&format!("m{i}"), t0() + Duration::minutes(i)));
            assert!(state.activities().len() <= MAX_ACTIVITIES);
        }

        let log = state.activities();
        assert_eq!(log.len(), MAX_ACTIVITIES);
        assert_eq!(log.latest().unwrap().describe(), "Mood: m74");
        assert_eq!(log.iter().last().unwrap().describe(), "Mood: m25");

        let stamps: Vec<_> = log.iter().map(Entry::timestamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_mood_entry_updates_header() {
        let mut state = LifeState::unknown(t0());
        state.append(mood_at("stressed", t0()));

        assert_eq!(state.mood(), "stressed");
        assert_eq!(state.last_checkin(), t0());
        assert_eq!(state.revision(), 1);
    }

    #[test]
    fn test_chance_status_formatting() {
        let mut state = LifeState::unknown(t0());
        state.append(Entry::Chance(ChanceEntry {
            timestamp: t0(),
            activity: ChanceActivity::Walked,
            duration: Some(30),
            notes: String::new(),
        }));
        assert_eq!(state.chance_status(), "walked for 30 minutes");

        state.append(Entry::Chance(ChanceEntry {
            timestamp: t0(),
            activity: ChanceActivity::Fed,
            duration: None,
            notes: String::new(),
        }));
        assert_eq!(state.chance_status(), "fed");
    }

    #[test]
    fn test_other_categories_leave_header_alone() {
        let mut state = LifeState::sample(t0());
        let later = t0() + Duration::minutes(5);
        state.append(Entry::Finance(FinanceEntry {
            timestamp: later,
            income: Some(10.0),
            expense: None,
            description: String::new(),
            net: 10.0,
        }));
        state.append(Entry::Health(HealthEntry {
            timestamp: later,
            weight: None,
            steps: Some(4000),
            notes: String::new(),
        }));

        assert_eq!(state.mood(), "Good");
        assert_eq!(state.chance_status(), "Fed and walked");
        assert_eq!(state.last_checkin(), later);
    }

    #[test]
    fn test_sample_has_three_entries_in_the_past() {
        let state = LifeState::sample(t0());
        let hours: Vec<i64> = state
            .activities()
            .iter()
            .map(|e| (t0() - e.timestamp()).num_hours())
            .collect();
        assert_eq!(hours, vec![2, 4, 6]);
    }

    #[test]
    fn test_recovered_keeps_sample_header_without_entries() {
        let state = LifeState::recovered(t0());

        assert_eq!(state.mood(), "Good");
        assert_eq!(state.weather(), "Sunny");
        assert_eq!(state.chance_status(), "Fed and walked");
        assert_eq!(state.predicted_next_action(), "Work on projects");
        assert_eq!(state.last_checkin(), t0());
        assert!(state.activities().is_empty());
    }

    #[test]
    fn test_next_timestamp_never_goes_backwards() {
        let mut state = LifeState::unknown(t0());
        state.append(mood_at("good", t0() + Duration::hours(1)));

        assert_eq!(state.next_timestamp(t0()), t0() + Duration::hours(1));
        let later = t0() + Duration::hours(3);
        assert_eq!(state.next_timestamp(later), later);
    }

    #[test]
    fn test_update_conditions_is_a_checkin() {
        let mut state = LifeState::unknown(t0());
        let at = t0() + Duration::minutes(10);
        state.update_conditions(Some("Rainy".to_string()), None, at);

        assert_eq!(state.weather(), "Rainy");
        assert_eq!(state.predicted_next_action(), UNKNOWN);
        assert_eq!(state.last_checkin(), at);
    }

    #[test]
    fn test_missing_header_fields_fall_back_to_defaults() {
        let raw = r#"{"mood":"okay","recent_activities":[]}"#;
        let state: LifeState = serde_json::from_str(raw).unwrap();

        assert_eq!(state.mood(), "okay");
        assert_eq!(state.weather(), UNKNOWN);
        assert_eq!(state.chance_status(), UNKNOWN);
        assert!(state.activities().is_empty());
    }

    #[test]
    fn test_revision_is_not_serialized() {
        let mut state = LifeState::unknown(t0());
        state.append(mood_at("good", t0()));

        let json = serde_json::to_value(&state).unwrap();
        assert!(json.get("revision").is_none());
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 6);
    }
}
