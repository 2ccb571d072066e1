//! Life Hub terminal front end.
//!
//! Logs entries, shows the dashboard and talks to `lifehub-server`.
//!
//! ```bash
//! lifehub log chance --activity walked --duration 30
//! lifehub status
//! lifehub ask "how is Chance doing?"
//! lifehub sync --server http://localhost:3000
//! ```

mod remote;
mod render;
mod shell;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use lifehub_core::{
    ChanceForm, EntryForm, FileStore, FinanceForm, GoalForm, HealthForm, HubConfig, LifeHub,
    LoadOutcome, MoodForm, MusicForm, ProjectForm,
};
use tracing::debug;

use remote::RemoteClient;
use render::TerminalRenderer;

#[derive(Parser)]
#[command(name = "lifehub")]
#[command(about = "Personal life-tracking hub")]
struct Cli {
    /// Directory holding the hub's data
    #[arg(long, env = "LIFEHUB_STORE_DIR", default_value = "lifehub-data")]
    store_dir: PathBuf,

    /// Prefix for every stored key
    #[arg(long, env = "LIFEHUB_KEY_PREFIX", default_value = "lifehub")]
    key_prefix: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log an entry
    #[command(subcommand)]
    Log(LogCommand),

    /// Show the dashboard
    Status,

    /// Show recent activity
    Recent,

    /// Set weather and/or the predicted next action
    Conditions {
        #[arg(long)]
        weather: Option<String>,
        #[arg(long)]
        next: Option<String>,
    },

    /// Ask a question about your status
    Ask {
        #[arg(required = true)]
        question: Vec<String>,
    },

    /// Write an export file
    Export {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },

    /// Delete all data and start from an empty log
    Clear {
        /// Skip the confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Replace all data with the sample data
    Reset {
        #[arg(long)]
        yes: bool,
    },

    /// List daily backups
    Backups,

    /// Show storage diagnostics
    Storage,

    /// Push the document to the server and publish it
    Sync(ServerArgs),

    /// Overwrite the server's document without publishing
    SaveRemote(ServerArgs),

    /// Interactive mode
    Shell,
}

#[derive(Args)]
struct ServerArgs {
    #[arg(long, env = "LIFEHUB_SERVER", default_value = "http://localhost:3000")]
    server: String,
}

#[derive(Subcommand)]
enum LogCommand {
    Mood {
        mood: String,
        #[arg(long, default_value = "")]
        energy: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    Finance {
        #[arg(long, default_value = "")]
        income: String,
        #[arg(long, default_value = "")]
        expense: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Health {
        #[arg(long, default_value = "")]
        weight: String,
        #[arg(long, default_value = "")]
        steps: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Pet care for Chance
    Chance {
        #[arg(long)]
        activity: String,
        /// Minutes
        #[arg(long, default_value = "")]
        duration: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    Music {
        title: String,
        #[arg(long, default_value = "")]
        rating: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    Goal {
        title: String,
        #[arg(long)]
        progress: String,
        #[arg(long, default_value = "")]
        category: String,
    },
    Project {
        name: String,
        #[arg(long)]
        update: String,
        #[arg(long, default_value = "")]
        status: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lifehub=warn".parse()?)
                .add_directive("lifehub_core=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    debug!(store = %cli.store_dir.display(), "Opening hub");

    let store = Arc::new(FileStore::new(&cli.store_dir));
    let config = HubConfig::new().with_key_prefix(&cli.key_prefix);
    let mut hub = LifeHub::open(store, config).await;

    match hub.load_outcome() {
        LoadOutcome::Seeded => println!("[INFO] No saved data found, loaded sample data"),
        LoadOutcome::Recovered { reason } => {
            eprintln!("[ERROR] Error loading data ({reason}). Starting with an empty log.")
        }
        LoadOutcome::Restored => {}
    }

    let live = matches!(cli.command, Command::Shell);
    hub.subscribe(Arc::new(if live {
        TerminalRenderer::live()
    } else {
        TerminalRenderer::quiet()
    }));

    match cli.command {
        Command::Log(entry) => {
            let ok = match entry {
                LogCommand::Mood { mood, energy, notes } => {
                    log(&mut hub, MoodForm { mood, energy, notes }).await
                }
                LogCommand::Finance {
                    income,
                    expense,
                    description,
                } => {
                    log(
                        &mut hub,
                        FinanceForm {
                            income,
                            expense,
                            description,
                        },
                    )
                    .await
                }
                LogCommand::Health {
                    weight,
                    steps,
                    notes,
                } => log(&mut hub, HealthForm { weight, steps, notes }).await,
                LogCommand::Chance {
                    activity,
                    duration,
                    notes,
                } => {
                    log(
                        &mut hub,
                        ChanceForm {
                            activity,
                            duration,
                            notes,
                        },
                    )
                    .await
                }
                LogCommand::Music {
                    title,
                    rating,
                    notes,
                } => log(&mut hub, MusicForm { title, rating, notes }).await,
                LogCommand::Goal {
                    title,
                    progress,
                    category,
                } => {
                    log(
                        &mut hub,
                        GoalForm {
                            title,
                            category,
                            progress,
                        },
                    )
                    .await
                }
                LogCommand::Project {
                    name,
                    update,
                    status,
                } => log(&mut hub, ProjectForm { name, status, update }).await,
            };
            if !ok {
                std::process::exit(1);
            }
        }
        Command::Status => {
            println!("{}", render::dashboard(&hub.summary(), &hub.recent_activity()));
        }
        Command::Recent => print!("{}", render::activity_list(&hub.recent_activity())),
        Command::Conditions { weather, next } => {
            if weather.is_none() && next.is_none() {
                anyhow::bail!("Nothing to update: pass --weather and/or --next");
            }
            let report = hub.update_conditions(weather, next).await;
            if report.is_ok() {
                println!("[OK] Conditions updated");
            }
        }
        Command::Ask { question } => {
            println!("{}", hub.ask(&question.join(" ")).await);
        }
        Command::Export { dir } => {
            let bundle = hub.export().await?;
            let path = bundle
                .write_to(&dir)
                .await
                .with_context(|| format!("Could not write export to {}", dir.display()))?;
            println!("[OK] Data exported to {}", path.display());
        }
        Command::Clear { yes } => {
            if yes || confirm("Are you sure you want to clear all data? This cannot be undone.")? {
                hub.clear().await?;
            }
        }
        Command::Reset { yes } => {
            if yes || confirm("Reset all data to the sample data?")? {
                hub.reset_to_sample().await?;
            }
        }
        Command::Backups => {
            let dates = hub.backups().await?;
            if dates.is_empty() {
                println!("No backups");
            }
            for date in dates {
                println!("{}  {}", date, hub.keys().backup(date));
            }
        }
        Command::Storage => print!("{}", render::storage(&hub.storage_report().await)),
        Command::Sync(args) => {
            let message = RemoteClient::new(args.server).push(hub.state()).await?;
            println!("[OK] {message}");
        }
        Command::SaveRemote(args) => {
            let message = RemoteClient::new(args.server).save(hub.state()).await?;
            println!("[OK] {message}");
        }
        Command::Shell => shell::run(&mut hub).await?,
    }

    Ok(())
}

/// Log a form, printing the rejection if any. Returns whether it was accepted.
async fn log<F: EntryForm>(hub: &mut LifeHub, form: F) -> bool {
    match hub.log(form).await {
        Ok(_) => true,
        Err(e) => {
            eprintln!("[ERROR] {e}");
            false
        }
    }
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    use std::io::{BufRead, Write};

    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_log_chance() {
        let cli = Cli::try_parse_from([
            "lifehub",
            "--store-dir",
            "/tmp/hub",
            "log",
            "chance",
            "--activity",
            "walked",
            "--duration",
            "30",
        ])
        .unwrap();

        assert_eq!(cli.store_dir, PathBuf::from("/tmp/hub"));
        let Command::Log(LogCommand::Chance {
            activity, duration, ..
        }) = cli.command
        else {
            panic!("expected log chance");
        };
        assert_eq!(activity, "walked");
        assert_eq!(duration, "30");
    }

    #[test]
    fn test_parse_sync_server() {
        let cli =
            Cli::try_parse_from(["lifehub", "sync", "--server", "http://hub.local:8080"]).unwrap();
        let Command::Sync(args) = cli.command else {
            panic!("expected sync");
        };
        assert_eq!(args.server, "http://hub.local:8080");
    }
}
