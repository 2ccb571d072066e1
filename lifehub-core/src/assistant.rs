//! Keyword-routed answers about the current status.

use crate::projection::StatusSummary;
use chrono::{DateTime, Utc};

/// Answer `question` from `status`.
///
/// Routing is by keyword, case-insensitive, first match wins.
pub fn answer(question: &str, status: &StatusSummary) -> String {
    let question = question.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| question.contains(w));

    if mentions(&["mood", "feeling"]) {
        format!(
            "Based on your recent data, your current mood is: {}. Your last check-in was {}.",
            status.mood,
            when(status.last_checkin)
        )
    } else if mentions(&["chance", "dog"]) {
        format!(
            "Chance's current status: {}. {}",
            status.chance_status, status.predicted_next_action
        )
    } else if mentions(&["activity", "recent"]) {
        match status.latest() {
            Some(latest) => format!(
                "Your most recent activity was: {} at {}.",
                latest.category(),
                when(latest.timestamp())
            ),
            None => "No recent activities found.".to_string(),
        }
    } else {
        format!(
            "I can see your current status: Mood: {}, Last check-in: {}. How can I help you today?",
            status.mood,
            when(status.last_checkin)
        )
    }
}

fn when(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}
