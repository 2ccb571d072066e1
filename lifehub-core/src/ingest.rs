//! Entry ingestion: raw form input to validated entries.
//!
//! Each category has a form type holding the raw strings a user typed. A form
//! either becomes an [`Entry`] or fails with a [`ValidationError`]; nothing is
//! appended on failure. Optional numbers that are blank or unparsable become
//! `None`, never zero.

use crate::entry::{
    Category, ChanceActivity, ChanceEntry, Entry, FinanceEntry, GoalEntry, HealthEntry, MoodEntry,
    MusicEntry, ProjectEntry,
};
use chrono::{DateTime, Utc};
use std::str::FromStr;
use thiserror::Error;

/// A required field was missing or invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a mood")]
    MissingMood,

    #[error("Please enter either income or expense amount")]
    MissingAmount,

    #[error("Please enter at least weight or steps")]
    MissingMeasurement,

    #[error("Please select an activity")]
    MissingActivity,

    #[error("Unknown activity: {0}")]
    UnknownActivity(String),

    #[error("Please enter a song/artist")]
    MissingTitle,

    #[error("Please enter both goal and progress update")]
    IncompleteGoal,

    #[error("Please enter both project name and update")]
    IncompleteProject,
}

impl ValidationError {
    /// Category of the form that failed.
    pub fn category(&self) -> Category {
        match self {
            ValidationError::MissingMood => Category::Mood,
            ValidationError::MissingAmount => Category::Finance,
            ValidationError::MissingMeasurement => Category::Health,
            ValidationError::MissingActivity | ValidationError::UnknownActivity(_) => {
                Category::Chance
            }
            ValidationError::MissingTitle => Category::Music,
            ValidationError::IncompleteGoal => Category::Goal,
            ValidationError::IncompleteProject => Category::Project,
        }
    }
}

/// Raw form input that can be turned into an entry.
pub trait EntryForm {
    fn category(&self) -> Category;

    /// Validate and build the entry, stamped with `timestamp`.
    fn into_entry(self, timestamp: DateTime<Utc>) -> Result<Entry, ValidationError>;
}

#[derive(Debug, Clone, Default)]
pub struct MoodForm {
    pub mood: String,
    pub energy: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default)]
pub struct FinanceForm {
    pub income: String,
    pub expense: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct HealthForm {
    pub weight: String,
    pub steps: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default)]
pub struct ChanceForm {
    pub activity: String,
    pub duration: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default)]
pub struct MusicForm {
    pub title: String,
    pub rating: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default)]
pub struct GoalForm {
    pub title: String,
    pub category: String,
    pub progress: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectForm {
    pub name: String,
    pub status: String,
    pub update: String,
}

impl EntryForm for MoodForm {
    fn category(&self) -> Category {
        Category::Mood
    }

    fn into_entry(self, timestamp: DateTime<Utc>) -> Result<Entry, ValidationError> {
        let mood = required(&self.mood).ok_or(ValidationError::MissingMood)?;
        Ok(Entry::Mood(MoodEntry {
            timestamp,
            mood,
            energy: parse_int(&self.energy),
            notes: text(&self.notes),
        }))
    }
}

impl EntryForm for FinanceForm {
    fn category(&self) -> Category {
        Category::Finance
    }

    fn into_entry(self, timestamp: DateTime<Utc>) -> Result<Entry, ValidationError> {
        let income = parse_float(&self.income);
        let expense = parse_float(&self.expense);
        if income.is_none() && expense.is_none() {
            return Err(ValidationError::MissingAmount);
        }

        Ok(Entry::Finance(FinanceEntry {
            timestamp,
            income,
            expense,
            description: text(&self.description),
            net: income.unwrap_or(0.0) - expense.unwrap_or(0.0),
        }))
    }
}

impl EntryForm for HealthForm {
    fn category(&self) -> Category {
        Category::Health
    }

    fn into_entry(self, timestamp: DateTime<Utc>) -> Result<Entry, ValidationError> {
        if is_blank(&self.weight) && is_blank(&self.steps) {
            return Err(ValidationError::MissingMeasurement);
        }

        Ok(Entry::Health(HealthEntry {
            timestamp,
            weight: parse_float(&self.weight),
            steps: parse_int(&self.steps),
            notes: text(&self.notes),
        }))
    }
}

impl EntryForm for ChanceForm {
    fn category(&self) -> Category {
        Category::Chance
    }

    fn into_entry(self, timestamp: DateTime<Utc>) -> Result<Entry, ValidationError> {
        let raw = required(&self.activity).ok_or(ValidationError::MissingActivity)?;
        let activity =
            ChanceActivity::from_str(&raw).map_err(ValidationError::UnknownActivity)?;

        Ok(Entry::Chance(ChanceEntry {
            timestamp,
            activity,
            duration: parse_int(&self.duration),
            notes: text(&self.notes),
        }))
    }
}

impl EntryForm for MusicForm {
    fn category(&self) -> Category {
        Category::Music
    }

    fn into_entry(self, timestamp: DateTime<Utc>) -> Result<Entry, ValidationError> {
        let title = required(&self.title).ok_or(ValidationError::MissingTitle)?;
        Ok(Entry::Music(MusicEntry {
            timestamp,
            title,
            rating: parse_int(&self.rating),
            notes: text(&self.notes),
        }))
    }
}

impl EntryForm for GoalForm {
    fn category(&self) -> Category {
        Category::Goal
    }

    fn into_entry(self, timestamp: DateTime<Utc>) -> Result<Entry, ValidationError> {
        let (Some(title), Some(progress)) = (required(&self.title), required(&self.progress))
        else {
            return Err(ValidationError::IncompleteGoal);
        };

        Ok(Entry::Goal(GoalEntry {
            timestamp,
            title,
            category: text(&self.category),
            progress,
        }))
    }
}

impl EntryForm for ProjectForm {
    fn category(&self) -> Category {
        Category::Project
    }

    fn into_entry(self, timestamp: DateTime<Utc>) -> Result<Entry, ValidationError> {
        let (Some(name), Some(update)) = (required(&self.name), required(&self.update)) else {
            return Err(ValidationError::IncompleteProject);
        };

        Ok(Entry::Project(ProjectEntry {
            timestamp,
            name,
            status: text(&self.status),
            update,
        }))
    }
}

fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

fn text(raw: &str) -> String {
    raw.trim().to_string()
}

fn required(raw: &str) -> Option<String> {
    let value = raw.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Integer field: blank or unparsable input is "no value".
pub fn parse_int<T: FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}

/// Decimal field using `.` as the separator regardless of locale.
///
/// Non-finite values ("NaN", "inf") count as unparsable.
pub fn parse_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 15, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_mood_requires_selection() {
        let err = MoodForm::default().into_entry(at()).unwrap_err();
        assert_eq!(err, ValidationError::MissingMood);
        assert_eq!(err.category(), Category::Mood);

        let entry = MoodForm {
            mood: "stressed".to_string(),
            energy: "4".to_string(),
            notes: " deadline ".to_string(),
        }
        .into_entry(at())
        .unwrap();

        match entry {
            Entry::Mood(m) => {
                assert_eq!(m.mood, "stressed");
                assert_eq!(m.energy, Some(4));
                assert_eq!(m.notes, "deadline");
                assert_eq!(m.timestamp, at());
            }
            other => panic!("expected mood entry, got {other:?}"),
        }
    }

    #[test]
    fn test_finance_requires_a_parseable_amount() {
        let blank = FinanceForm::default().into_entry(at());
        assert_eq!(blank.unwrap_err(), ValidationError::MissingAmount);

        let garbage = FinanceForm {
            income: "lots".to_string(),
            expense: String::new(),
            description: String::new(),
        }
        .into_entry(at());
        assert_eq!(garbage.unwrap_err(), ValidationError::MissingAmount);
    }

    #[test]
    fn test_finance_net_counts_absent_side_as_zero() {
        let entry = FinanceForm {
            income: String::new(),
            expense: "12.50".to_string(),
            description: "lunch".to_string(),
        }
        .into_entry(at())
        .unwrap();

        let Entry::Finance(f) = entry else {
            panic!("expected finance entry");
        };
        assert_eq!(f.income, None);
        assert_eq!(f.expense, Some(12.5));
        assert_eq!(f.net, -12.5);
    }

    #[test]
    fn test_health_weight_only() {
        let entry = HealthForm {
            weight: "150".to_string(),
            steps: String::new(),
            notes: String::new(),
        }
        .into_entry(at())
        .unwrap();

        let Entry::Health(h) = entry else {
            panic!("expected health entry");
        };
        assert_eq!(h.weight, Some(150.0));
        assert_eq!(h.steps, None);
    }

    #[test]
    fn test_health_unparsable_but_present_is_accepted_as_no_value() {
        let entry = HealthForm {
            weight: "heavy".to_string(),
            steps: String::new(),
            notes: String::new(),
        }
        .into_entry(at())
        .unwrap();

        let Entry::Health(h) = entry else {
            panic!("expected health entry");
        };
        assert_eq!(h.weight, None);
        assert_eq!(h.steps, None);

        assert_eq!(
            HealthForm::default().into_entry(at()).unwrap_err(),
            ValidationError::MissingMeasurement
        );
    }

    #[test]
    fn test_chance_activity_must_be_known() {
        assert_eq!(
            ChanceForm::default().into_entry(at()).unwrap_err(),
            ValidationError::MissingActivity
        );

        let err = ChanceForm {
            activity: "swam".to_string(),
            ..Default::default()
        }
        .into_entry(at())
        .unwrap_err();
        assert_eq!(err, ValidationError::UnknownActivity("swam".to_string()));

        let entry = ChanceForm {
            activity: "walked".to_string(),
            duration: "30".to_string(),
            notes: String::new(),
        }
        .into_entry(at())
        .unwrap();
        let Entry::Chance(c) = entry else {
            panic!("expected chance entry");
        };
        assert_eq!(c.activity, ChanceActivity::Walked);
        assert_eq!(c.duration, Some(30));
    }

    #[test]
    fn test_goal_and_project_need_both_fields() {
        let goal = GoalForm {
            title: "Run a 10k".to_string(),
            ..Default::default()
        };
        assert_eq!(goal.into_entry(at()).unwrap_err(), ValidationError::IncompleteGoal);

        let project = ProjectForm {
            update: "shipped v1".to_string(),
            ..Default::default()
        };
        assert_eq!(
            project.into_entry(at()).unwrap_err(),
            ValidationError::IncompleteProject
        );

        assert_eq!(
            MusicForm::default().into_entry(at()).unwrap_err(),
            ValidationError::MissingTitle
        );
    }

    #[test]
    fn test_numeric_parsing() {
        assert_eq!(parse_int::<u32>(" 42 "), Some(42));
        assert_eq!(parse_int::<u32>("4.5"), None);
        assert_eq!(parse_int::<u32>("-3"), None);
        assert_eq!(parse_int::<u32>(""), None);
        assert_eq!(parse_float("1e3"), Some(1000.0));
        assert_eq!(parse_float("NaN"), None);
        assert_eq!(parse_float("1,5"), None);
    }
}
