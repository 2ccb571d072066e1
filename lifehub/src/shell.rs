//! Interactive line-oriented mode.
//!
//! Each input line is one of:
//! - `<category> key=value ...` to log an entry, e.g. `chance activity=walked duration=30`
//! - `? <question>` to ask the assistant
//! - `#<command>` for everything else (`#help` lists them)

use crate::render;
use lifehub_core::{
    Category, ChanceForm, FinanceForm, GoalForm, HealthForm, LifeHub, MoodForm, MusicForm,
    ProjectForm, ValidationError,
};
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::path::Path;

pub async fn run(hub: &mut LifeHub) -> anyhow::Result<()> {
    println!("{}", render::dashboard(&hub.summary(), &hub.recent_activity()));
    print_help();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(question) = line.strip_prefix('?') {
            println!("{}", hub.ask(question.trim()).await);
        } else if let Some(command) = line.strip_prefix('#') {
            let (name, rest) = split_word(command);
            match name {
                "quit" | "exit" => {
                    println!("Goodbye!");
                    break;
                }
                "status" => {
                    println!("{}", render::dashboard(&hub.summary(), &hub.recent_activity()))
                }
                "weather" | "next" => {
                    if let Err(usage) = update_condition(hub, name, rest).await {
                        println!("[ERROR] {usage}");
                    }
                }
                "export" => {
                    let dir = if rest.is_empty() { "." } else { rest };
                    match hub.export().await {
                        Ok(bundle) => match bundle.write_to(Path::new(dir)).await {
                            Ok(path) => println!("[OK] Exported to {}", path.display()),
                            Err(e) => println!("[ERROR] Export failed: {e}"),
                        },
                        Err(e) => println!("[ERROR] Export failed: {e}"),
                    }
                }
                "storage" => print!("{}", render::storage(&hub.storage_report().await)),
                "help" => print_help(),
                _ => println!("[ERROR] Unknown command: #{name}"),
            }
        } else {
            let (category, rest) = split_word(line);
            match log_line(hub, category, &parse_fields(rest)).await {
                Some(Ok(())) => {}
                Some(Err(e)) => println!("[ERROR] {e}"),
                None => println!("[ERROR] Unknown category: {category}"),
            }
        }

        stdout.flush()?;
    }

    Ok(())
}

fn print_help() {
    println!("Log entries:");
    println!("  mood mood=<m> energy=<1-10> notes=<text>");
    println!("  finance income=<n> expense=<n> description=<text>");
    println!("  health weight=<n> steps=<n> notes=<text>");
    println!("  chance activity=<fed|walked|played|groomed|vet> duration=<min> notes=<text>");
    println!("  music title=<text> rating=<1-10> notes=<text>");
    println!("  goal title=<text> category=<text> progress=<text>");
    println!("  project name=<text> status=<text> update=<text>");
    println!("Other:");
    println!("  ? <question>      - Ask about your status");
    println!("  #status           - Show the dashboard");
    println!("  #weather <text>   - Set the weather");
    println!("  #next <text>      - Set the predicted next action");
    println!("  #export [dir]     - Export all data");
    println!("  #storage          - Show storage info");
    println!("  #quit             - Exit");
    println!();
}

fn split_word(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    }
}

/// `key=value` pairs. A value runs until the next token containing `=`.
fn parse_fields(input: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for token in input.split_whitespace() {
        if let Some((key, value)) = token.split_once('=') {
            if let Some((key, words)) = current.take() {
                fields.insert(key, words.join(" "));
            }
            current = Some((key.to_lowercase(), vec![value]));
        } else if let Some((_, words)) = current.as_mut() {
            words.push(token);
        }
    }
    if let Some((key, words)) = current {
        fields.insert(key, words.join(" "));
    }
    fields
}

/// Set the weather or the predicted next action. Blank text changes nothing.
async fn update_condition(hub: &mut LifeHub, name: &str, text: &str) -> Result<(), String> {
    if text.is_empty() {
        return Err(format!("Usage: #{name} <text>"));
    }

    let value = Some(text.to_string());
    if name == "weather" {
        hub.update_conditions(value, None).await;
    } else {
        hub.update_conditions(None, value).await;
    }
    Ok(())
}

async fn log_line(
    hub: &mut LifeHub,
    category: &str,
    fields: &HashMap<String, String>,
) -> Option<Result<(), ValidationError>> {
    let get = |key: &str| fields.get(key).cloned().unwrap_or_default();

    let wanted = category.to_lowercase();
    let category = Category::ALL.into_iter().find(|c| c.as_str() == wanted)?;

    let result = match category {
        Category::Mood => hub
            .log(MoodForm {
                mood: get("mood"),
                energy: get("energy"),
                notes: get("notes"),
            })
            .await
            .map(|_| ()),
        Category::Finance => hub
            .log(FinanceForm {
                income: get("income"),
                expense: get("expense"),
                description: get("description"),
            })
            .await
            .map(|_| ()),
        Category::Health => hub
            .log(HealthForm {
                weight: get("weight"),
                steps: get("steps"),
                notes: get("notes"),
            })
            .await
            .map(|_| ()),
        Category::Chance => hub
            .log(ChanceForm {
                activity: get("activity"),
                duration: get("duration"),
                notes: get("notes"),
            })
            .await
            .map(|_| ()),
        Category::Music => hub
            .log(MusicForm {
                title: get("title"),
                rating: get("rating"),
                notes: get("notes"),
            })
            .await
            .map(|_| ()),
        Category::Goal => hub
            .log(GoalForm {
                title: get("title"),
                category: get("category"),
                progress: get("progress"),
            })
            .await
            .map(|_| ()),
        Category::Project => hub
            .log(ProjectForm {
                name: get("name"),
                status: get("status"),
                update: get("update"),
            })
            .await
            .map(|_| ()),
    };
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fields_multiword_values() {
        let fields = parse_fields("expense=12.50 description=Lunch with Sam");
        assert_eq!(fields["expense"], "12.50");
        assert_eq!(fields["description"], "Lunch with Sam");
    }

    #[test]
    fn test_parse_fields_ignores_leading_words() {
        let fields = parse_fields("stray words Activity=walked");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["activity"], "walked");
    }

    #[test]
    fn test_split_word() {
        assert_eq!(split_word("weather  Light rain"), ("weather", "Light rain"));
        assert_eq!(split_word("status"), ("status", ""));
    }

    #[tokio::test]
    async fn test_log_line_dispatch() {
        let mut t = lifehub_core::TestHub::empty().await;

        let fields = parse_fields("activity=walked duration=30");
        assert_eq!(log_line(&mut t.hub, "chance", &fields).await, Some(Ok(())));
        assert_eq!(t.hub.state().chance_status(), "walked for 30 minutes");

        let missing = log_line(&mut t.hub, "finance", &HashMap::new()).await;
        assert_eq!(missing, Some(Err(ValidationError::MissingAmount)));

        assert_eq!(log_line(&mut t.hub, "sleep", &HashMap::new()).await, None);
        assert_eq!(
            log_line(&mut t.hub, "Music", &parse_fields("title=So What")).await,
            Some(Ok(()))
        );
    }

    #[tokio::test]
    async fn test_blank_condition_changes_nothing() {
        let mut t = lifehub_core::TestHub::seeded().await;

        let err = update_condition(&mut t.hub, "weather", "").await.unwrap_err();
        assert_eq!(err, "Usage: #weather <text>");
        assert!(update_condition(&mut t.hub, "next", "").await.is_err());
        assert_eq!(t.hub.state().weather(), "Sunny");
        assert_eq!(t.hub.state().predicted_next_action(), "Work on projects");

        update_condition(&mut t.hub, "next", "Walk Chance").await.unwrap();
        assert_eq!(t.hub.state().predicted_next_action(), "Walk Chance");
    }
}
