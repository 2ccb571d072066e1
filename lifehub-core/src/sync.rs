//! Sync gateway: writes the status document server-side and publishes it
//! through version control.
//!
//! Publishing is four sequential steps: write the file, stage all changes,
//! commit, push. The first failure stops the sequence. Nothing is rolled
//! back, so a commit that was made but not pushed stays committed locally.

use crate::clock::Clock;
use crate::status::LifeState;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::fs;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStep {
    WriteFile,
    Stage,
    Commit,
    Push,
}

impl fmt::Display for PublishStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PublishStep::WriteFile => "write",
            PublishStep::Stage => "stage",
            PublishStep::Commit => "commit",
            PublishStep::Push => "push",
        })
    }
}

/// A version-control command failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CommandFailed(pub String);

/// Errors from the sync gateway.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Stored document is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("{step} failed: {source}")]
    Step {
        step: PublishStep,
        #[source]
        source: CommandFailed,
    },
}

impl PublishError {
    /// The step that failed, if the failure happened while publishing.
    pub fn step(&self) -> Option<PublishStep> {
        match self {
            PublishError::Write { .. } => Some(PublishStep::WriteFile),
            PublishError::Step { step, .. } => Some(*step),
            PublishError::Read { .. } | PublishError::Malformed(_) => None,
        }
    }
}

/// Version-control capability used to publish.
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Stage every change in the working tree.
    async fn stage_all(&self) -> Result<(), CommandFailed>;

    async fn commit(&self, message: &str) -> Result<(), CommandFailed>;

    /// Push to the configured remote and branch.
    async fn push(&self) -> Result<(), CommandFailed>;
}

/// `git` on the command line.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_dir: PathBuf,
    remote: String,
    branch: String,
}

impl GitCli {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            remote: "origin".to_string(),
            branch: "main".to_string(),
        }
    }

    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    async fn git(&self, args: &[&str]) -> Result<(), CommandFailed> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .output()
            .await
            .map_err(|e| CommandFailed(format!("failed to run git {}: {e}", args.join(" "))))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let detail = if !stderr.is_empty() {
            stderr
        } else if !stdout.is_empty() {
            stdout
        } else {
            output.status.to_string()
        };
        Err(CommandFailed(format!("git {} failed: {detail}", args.join(" "))))
    }
}

#[async_trait]
impl VersionControl for GitCli {
    async fn stage_all(&self) -> Result<(), CommandFailed> {
        self.git(&["add", "."]).await
    }

    async fn commit(&self, message: &str) -> Result<(), CommandFailed> {
        self.git(&["commit", "-m", message]).await
    }

    async fn push(&self) -> Result<(), CommandFailed> {
        self.git(&["push", &self.remote, &self.branch]).await
    }
}

/// Body of a sync request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncPayload {
    pub data: serde_json::Value,
    pub timestamp: String,
}

/// What a completed publish did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub timestamp: String,
    pub commit_message: String,
}

/// Owns the server-side status file and the publish sequence.
pub struct SyncGateway {
    status_path: PathBuf,
    vcs: Arc<dyn VersionControl>,
    clock: Arc<dyn Clock>,
    // Single writer for the status file.
    write_lock: Mutex<()>,
}

impl SyncGateway {
    pub fn new(
        status_path: impl Into<PathBuf>,
        vcs: Arc<dyn VersionControl>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            status_path: status_path.into(),
            vcs,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    pub fn status_path(&self) -> &Path {
        &self.status_path
    }

    /// Write `data` verbatim (pretty-printed) to the status file.
    pub async fn save(&self, data: &serde_json::Value) -> Result<(), PublishError> {
        let _guard = self.write_lock.lock().await;
        self.write_document(data).await
    }

    /// Read the status file, creating it with the empty default if absent.
    pub async fn load_or_init(&self) -> Result<serde_json::Value, PublishError> {
        let _guard = self.write_lock.lock().await;
        match fs::read_to_string(&self.status_path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.status_path.display(), "Status file missing, writing default");
                let default = serde_json::to_value(LifeState::unknown(self.clock.now()))?;
                self.write_document(&default).await?;
                Ok(default)
            }
            Err(source) => Err(PublishError::Read {
                path: self.status_path.clone(),
                source,
            }),
        }
    }

    /// Write the payload, then stage, commit and push.
    pub async fn publish(&self, payload: &SyncPayload) -> Result<PublishReceipt, PublishError> {
        let _guard = self.write_lock.lock().await;
        self.write_document(&payload.data).await?;

        let commit_message = format!(
            "Update data - {}",
            self.clock.now().format("%Y-%m-%d %H:%M:%S UTC")
        );

        self.vcs
            .stage_all()
            .await
            .map_err(|source| step_failed(PublishStep::Stage, source))?;
        info!("Staged changes");

        self.vcs
            .commit(&commit_message)
            .await
            .map_err(|source| step_failed(PublishStep::Commit, source))?;
        info!(message = %commit_message, "Committed status");

        self.vcs
            .push()
            .await
            .map_err(|source| step_failed(PublishStep::Push, source))?;
        info!("Pushed to remote");

        Ok(PublishReceipt {
            timestamp: payload.timestamp.clone(),
            commit_message,
        })
    }

    async fn write_document(&self, data: &serde_json::Value) -> Result<(), PublishError> {
        let write_err = |source| PublishError::Write {
            path: self.status_path.clone(),
            source,
        };

        if let Some(dir) = self.status_path.parent() {
            fs::create_dir_all(dir).await.map_err(write_err)?;
        }
        let content = serde_json::to_string_pretty(data)?;
        fs::write(&self.status_path, content)
            .await
            .map_err(write_err)
    }
}

fn step_failed(step: PublishStep, source: CommandFailed) -> PublishError {
    error!(%step, error = %source, "Publish step failed");
    PublishError::Step { step, source }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_error_reports_step() {
        let err = step_failed(PublishStep::Push, CommandFailed("rejected".to_string()));
        assert_eq!(err.step(), Some(PublishStep::Push));
        assert_eq!(err.to_string(), "push failed: rejected");

        let write = PublishError::Write {
            path: PathBuf::from("data/status.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(write.step(), Some(PublishStep::WriteFile));
    }

    #[test]
    fn test_git_cli_defaults() {
        let git = GitCli::new("/srv/lifehub").with_branch("trunk");
        assert_eq!(git.remote, "origin");
        assert_eq!(git.branch, "trunk");
    }
}
