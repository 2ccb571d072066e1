//! Plain-text rendering of the hub for the terminal.

use chrono::{DateTime, Local, Utc};
use lifehub_core::{
    ActivityLine, LastSave, Notice, NoticeLevel, StatusObserver, StatusSummary, StorageReport,
};

/// Prints notices, and optionally the dashboard after every change.
pub struct TerminalRenderer {
    live: bool,
}

impl TerminalRenderer {
    /// Only notices are printed.
    pub fn quiet() -> Self {
        Self { live: false }
    }

    /// Notices and the full dashboard on every change.
    pub fn live() -> Self {
        Self { live: true }
    }
}

impl StatusObserver for TerminalRenderer {
    fn status_changed(&self, summary: &StatusSummary, feed: &[ActivityLine]) {
        if self.live {
            println!("{}", dashboard(summary, feed));
        }
    }

    fn notice(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Error => eprintln!("{}", format_notice(notice)),
            NoticeLevel::Success | NoticeLevel::Info => println!("{}", format_notice(notice)),
        }
    }
}

pub fn format_notice(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Success => "OK",
        NoticeLevel::Info => "INFO",
        NoticeLevel::Error => "ERROR",
    };
    format!("[{tag}] {}", notice.message)
}

fn local(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Status header followed by the activity feed.
pub fn dashboard(summary: &StatusSummary, feed: &[ActivityLine]) -> String {
    let mut out = String::new();
    out.push_str("=== Life Hub ===\n");
    out.push_str(&format!("Mood:          {}\n", summary.mood));
    out.push_str(&format!("Weather:       {}\n", summary.weather));
    out.push_str(&format!("Chance:        {}\n", summary.chance_status));
    out.push_str(&format!("Next up:       {}\n", summary.predicted_next_action));
    out.push_str(&format!("Last check-in: {}\n", local(summary.last_checkin)));
    out.push('\n');
    out.push_str(&activity_list(feed));
    out
}

pub fn activity_list(feed: &[ActivityLine]) -> String {
    if feed.is_empty() {
        return "No recent activities\n".to_string();
    }

    feed.iter()
        .map(|line| format!("  {}  {}\n", local(line.timestamp), line.description))
        .collect()
}

pub fn storage(report: &StorageReport) -> String {
    let last_save = match report.last_save {
        LastSave::Never => "Never".to_string(),
        LastSave::At(at) => local(at),
        LastSave::Unreadable => "Error".to_string(),
    };
    format!(
        "Storage:   {}\nEntries:   {}\nLast save: {}\n",
        if report.available { "Available" } else { "Unavailable" },
        report.entry_count,
        last_save
    )
}
