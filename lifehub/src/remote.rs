//! Client for the lifehub-server endpoints.

use anyhow::{bail, Context};
use chrono::{SecondsFormat, Utc};
use lifehub_core::status::LifeState;
use lifehub_core::sync::SyncPayload;
use serde_json::Value;
use tracing::{debug, info};

pub struct RemoteClient {
    base: String,
    http: reqwest::Client,
}

impl RemoteClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Overwrite the server's status document.
    pub async fn save(&self, state: &LifeState) -> anyhow::Result<String> {
        let body = serde_json::to_value(state)?;
        self.post("/save-data", &body).await
    }

    /// Write and publish the document through the server.
    pub async fn push(&self, state: &LifeState) -> anyhow::Result<String> {
        let payload = SyncPayload {
            data: serde_json::to_value(state)?,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        self.post("/push-to-github", &serde_json::to_value(payload)?).await
    }

    async fn post(&self, path: &str, body: &Value) -> anyhow::Result<String> {
        let url = format!("{}{path}", self.base);
        debug!(%url, "Sending to server");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Could not reach {url}"))?;
        let status = response.status();
        let reply: Value = response
            .json()
            .await
            .with_context(|| format!("Unexpected response from {url}"))?;

        let message = reply["message"].as_str().unwrap_or_default().to_string();
        if !status.is_success() || reply["success"] != Value::Bool(true) {
            let detail = reply["error"].as_str().unwrap_or(status.as_str());
            bail!("{message} ({detail})");
        }

        info!(%url, "Server accepted update");
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trimmed() {
        let client = RemoteClient::new("http://localhost:3000/");
        assert_eq!(client.base, "http://localhost:3000");
    }
}
