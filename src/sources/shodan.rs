use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tokio::time::timeout;

use crate::error::AdapterError;
use crate::sources::Source;

#[derive(Debug, Deserialize)]
struct ShosubgoEntry {
    subdomain: Option<String>,
}

/// Credentialed Shodan-backed source, wrapping a shosubgo-style binary
/// that emits a JSON array of `{ "subdomain": ... }` objects. Only
/// registered when the operator supplied an API key.
pub struct Shodan {
    api_key: String,
}

impl Shodan {
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }
}

fn parse_output(stdout: &str) -> Result<HashSet<String>, AdapterError> {
    let entries: Vec<ShosubgoEntry> =
        serde_json::from_str(stdout).map_err(|e| AdapterError::Parse(e.to_string()))?;
    Ok(entries
        .into_iter()
        .filter_map(|entry| entry.subdomain)
        .filter(|sub| !sub.is_empty())
        .collect())
}

#[async_trait]
impl Source for Shodan {
    fn name(&self) -> &'static str {
        "shosubgo"
    }

    async fn fetch(
        &self,
        domain: &str,
        budget: Duration,
    ) -> Result<HashSet<String>, AdapterError> {
        let output = timeout(
            budget,
            Command::new("shosubgo")
                .args(["-d", domain, "-s", self.api_key.as_str(), "-json"])
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| AdapterError::Timeout(budget))??;

        if !output.status.success() {
            return Err(AdapterError::Command {
                command: "shosubgo".to_string(),
                status: output.status,
            });
        }

        parse_output(&String::from_utf8_lossy(&output.stdout))
    }
}
