//! Logged entries.
//!
//! One variant per tracking category. The wire shape is a flat JSON object
//! tagged by a `type` field, so a persisted log reads like:
//!
//! ```json
//! { "type": "chance", "timestamp": "2026-10-15T08:30:00.000Z",
//!   "activity": "walked", "duration": 30, "notes": "" }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The tracking category an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Mood,
    Finance,
    Health,
    Chance,
    Music,
    Goal,
    Project,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Mood,
        Category::Finance,
        Category::Health,
        Category::Chance,
        Category::Music,
        Category::Goal,
        Category::Project,
    ];

    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Mood => "mood",
            Category::Finance => "finance",
            Category::Health => "health",
            Category::Chance => "chance",
            Category::Music => "music",
            Category::Goal => "goal",
            Category::Project => "project",
        }
    }

    /// Human-facing label used in activity lines.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Mood => "Mood",
            Category::Finance => "Finance",
            Category::Health => "Health",
            Category::Chance => "Chance",
            Category::Music => "Music",
            Category::Goal => "Goal",
            Category::Project => "Project",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Things that can be done with Chance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChanceActivity {
    Fed,
    Walked,
    Played,
    Groomed,
    Vet,
}

impl ChanceActivity {
    pub const ALL: [ChanceActivity; 5] = [
        ChanceActivity::Fed,
        ChanceActivity::Walked,
        ChanceActivity::Played,
        ChanceActivity::Groomed,
        ChanceActivity::Vet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChanceActivity::Fed => "fed",
            ChanceActivity::Walked => "walked",
            ChanceActivity::Played => "played",
            ChanceActivity::Groomed => "groomed",
            ChanceActivity::Vet => "vet",
        }
    }
}

impl fmt::Display for ChanceActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChanceActivity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == wanted)
            .ok_or_else(|| s.trim().to_string())
    }
}

/// A mood check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub timestamp: DateTime<Utc>,
    pub mood: String,
    pub energy: Option<u32>,
    #[serde(default)]
    pub notes: String,
}

/// Money in or out. `net` is income minus expense with absent sides as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceEntry {
    pub timestamp: DateTime<Utc>,
    pub income: Option<f64>,
    pub expense: Option<f64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub net: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthEntry {
    pub timestamp: DateTime<Utc>,
    pub weight: Option<f64>,
    pub steps: Option<u64>,
    #[serde(default)]
    pub notes: String,
}

/// Pet care for Chance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChanceEntry {
    pub timestamp: DateTime<Utc>,
    pub activity: ChanceActivity,
    /// Minutes.
    pub duration: Option<u32>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicEntry {
    pub timestamp: DateTime<Utc>,
    pub title: String,
    pub rating: Option<u32>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalEntry {
    pub timestamp: DateTime<Utc>,
    pub title: String,
    #[serde(default)]
    pub category: String,
    pub progress: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub timestamp: DateTime<Utc>,
    pub name: String,
    #[serde(default)]
    pub status: String,
    pub update: String,
}

/// One logged user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entry {
    Mood(MoodEntry),
    Finance(FinanceEntry),
    Health(HealthEntry),
    Chance(ChanceEntry),
    Music(MusicEntry),
    Goal(GoalEntry),
    Project(ProjectEntry),
}

impl Entry {
    pub fn category(&self) -> Category {
        match self {
            Entry::Mood(_) => Category::Mood,
            Entry::Finance(_) => Category::Finance,
            Entry::Health(_) => Category::Health,
            Entry::Chance(_) => Category::Chance,
            Entry::Music(_) => Category::Music,
            Entry::Goal(_) => Category::Goal,
            Entry::Project(_) => Category::Project,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Entry::Mood(e) => e.timestamp,
            Entry::Finance(e) => e.timestamp,
            Entry::Health(e) => e.timestamp,
            Entry::Chance(e) => e.timestamp,
            Entry::Music(e) => e.timestamp,
            Entry::Goal(e) => e.timestamp,
            Entry::Project(e) => e.timestamp,
        }
    }

    /// One-line description for activity feeds, e.g. `Mood: good`.
    pub fn describe(&self) -> String {
        let detail = match self {
            Entry::Mood(e) => e.mood.clone(),
            Entry::Chance(e) => e.activity.to_string(),
            Entry::Music(e) => e.title.clone(),
            Entry::Finance(e) => or_logged(&e.description),
            Entry::Health(e) => or_logged(&e.notes),
            Entry::Goal(e) => e.title.clone(),
            Entry::Project(e) => e.name.clone(),
        };
        format!("{}: {}", self.category().label(), detail)
    }
}

fn or_logged(text: &str) -> String {
    if text.is_empty() {
        "Entry logged".to_string()
    } else {
        text.to_string()
    }
}
