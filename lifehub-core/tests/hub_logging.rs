//! Tests for logging entries through the hub.
//!
//! Run with: `cargo test -p lifehub-core --test hub_logging`

use chrono::Duration;
use lifehub_core::entry::{Category, Entry};
use lifehub_core::status::MAX_ACTIVITIES;
use lifehub_core::testing::TestHub;
use lifehub_core::{
    ChanceForm, FinanceForm, GoalForm, HealthForm, MoodForm, MusicForm, NoticeLevel, ProjectForm,
    ValidationError,
};

fn mood(value: &str) -> MoodForm {
    MoodForm {
        mood: value.to_string(),
        ..Default::default()
    }
}

// =============================================================================
// Header fields
// =============================================================================

#[tokio::test]
async fn test_mood_entry_updates_header() {
    let mut t = TestHub::seeded().await;

    let receipt = t.hub.log(mood("stressed")).await.expect("mood should log");

    assert_eq!(receipt.category, Category::Mood);
    assert!(receipt.save.is_ok());
    assert_eq!(t.hub.state().mood(), "stressed");
    assert_eq!(t.hub.state().last_checkin(), receipt.timestamp);

    let Some(Entry::Mood(latest)) = t.hub.state().activities().latest() else {
        panic!("expected a mood entry at the head of the log");
    };
    assert_eq!(latest.mood, "stressed");
    assert_eq!(latest.energy, None);
}

#[tokio::test]
async fn test_chance_entry_updates_status() {
    let mut t = TestHub::seeded().await;

    t.hub
        .log(ChanceForm {
            activity: "walked".to_string(),
            duration: "30".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(t.hub.state().chance_status(), "walked for 30 minutes");

    t.clock.advance(Duration::minutes(5));
    t.hub
        .log(ChanceForm {
            activity: "Fed".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(t.hub.state().chance_status(), "fed");
}

#[tokio::test]
async fn test_other_categories_leave_mood_alone() {
    let mut t = TestHub::seeded().await;
    let before = t.hub.state().mood().to_string();

    t.hub
        .log(MusicForm {
            title: "Blue Train - John Coltrane".to_string(),
            rating: "10".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    t.hub
        .log(GoalForm {
            title: "Run a 10k".to_string(),
            category: "fitness".to_string(),
            progress: "Ran 6k today".to_string(),
        })
        .await
        .unwrap();
    t.hub
        .log(ProjectForm {
            name: "lifehub".to_string(),
            status: "active".to_string(),
            update: "Added backups".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(t.hub.state().mood(), before);
    assert_eq!(t.hub.state().chance_status(), "Fed and walked");
    assert_eq!(t.hub.state().activities().len(), 6);
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_rejected_entry_changes_nothing() {
    let mut t = TestHub::seeded().await;
    let revision = t.hub.state().revision();
    let entries = t.hub.state().activities().len();
    let writes = t.store.writes().len();
    let updates = t.observer.update_count();

    let err = t
        .hub
        .log(FinanceForm {
            description: "Coffee".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert_eq!(err, ValidationError::MissingAmount);
    assert_eq!(t.hub.state().revision(), revision);
    assert_eq!(t.hub.state().activities().len(), entries);
    assert_eq!(t.store.writes().len(), writes);
    assert_eq!(t.observer.update_count(), updates);
}

#[tokio::test]
async fn test_unknown_chance_activity_rejected() {
    let mut t = TestHub::seeded().await;

    let err = t
        .hub
        .log(ChanceForm {
            activity: "napped".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ValidationError::UnknownActivity(ref a) if a == "napped"));
    assert_eq!(t.hub.state().chance_status(), "Fed and walked");
}

#[tokio::test]
async fn test_health_with_weight_only() {
    let mut t = TestHub::seeded().await;

    t.hub
        .log(HealthForm {
            weight: "150".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let Some(Entry::Health(health)) = t.hub.state().activities().latest() else {
        panic!("expected a health entry");
    };
    assert_eq!(health.weight, Some(150.0));
    assert_eq!(health.steps, None);
}

#[tokio::test]
async fn test_finance_net() {
    let mut t = TestHub::seeded().await;

    t.hub
        .log(FinanceForm {
            expense: "12.50".to_string(),
            description: "Lunch".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let Some(Entry::Finance(finance)) = t.hub.state().activities().latest() else {
        panic!("expected a finance entry");
    };
    assert_eq!(finance.income, None);
    assert_eq!(finance.net, -12.5);
}

// =============================================================================
// Log bounds and ordering
// =============================================================================

#[tokio::test]
async fn test_log_keeps_newest_fifty() {
    let mut t = TestHub::empty().await;

    for i in 0..60 {
        t.clock.advance(Duration::minutes(1));
        t.hub.log(mood(&format!("mood-{i}"))).await.unwrap();
    }

    let log = t.hub.state().activities();
    assert_eq!(log.len(), MAX_ACTIVITIES);

    let Some(Entry::Mood(newest)) = log.latest() else {
        panic!("expected a mood entry");
    };
    assert_eq!(newest.mood, "mood-59");

    let Some(Entry::Mood(oldest)) = log.iter().last() else {
        panic!("expected a mood entry");
    };
    assert_eq!(oldest.mood, "mood-10");

    let stamps: Vec<_> = log.iter().map(Entry::timestamp).collect();
    assert!(stamps.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_timestamps_never_go_backwards() {
    let mut t = TestHub::seeded().await;
    let first = t.hub.log(mood("calm")).await.unwrap().timestamp;

    t.clock.advance(Duration::hours(-3));
    let second = t.hub.log(mood("tired")).await.unwrap().timestamp;

    assert!(second >= first);
    assert_eq!(t.hub.state().last_checkin(), second);
}

// =============================================================================
// Observers
// =============================================================================

#[tokio::test]
async fn test_observer_sees_every_mutation() {
    let mut t = TestHub::seeded().await;
    assert_eq!(t.observer.update_count(), 1);

    t.hub.log(mood("happy")).await.unwrap();

    assert_eq!(t.observer.update_count(), 2);
    let summary = t.observer.last_summary().unwrap();
    assert_eq!(summary.mood, "happy");
    assert_eq!(summary.recent_activities.len(), 4);

    let feed = t.observer.last_feed().unwrap();
    assert_eq!(feed[0].description, "Mood: happy");

    let notices = t.observer.notices();
    assert_eq!(notices.last().unwrap().level, NoticeLevel::Success);
}

#[tokio::test]
async fn test_update_conditions() {
    let mut t = TestHub::seeded().await;

    let report = t
        .hub
        .update_conditions(Some("Rainy".to_string()), None)
        .await;

    assert!(report.is_ok());
    assert_eq!(t.hub.state().weather(), "Rainy");
    assert_eq!(t.hub.state().predicted_next_action(), "Work on projects");
    assert_eq!(t.observer.last_summary().unwrap().weather, "Rainy");
}
