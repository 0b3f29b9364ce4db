use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;

use crate::error::AdapterError;
use crate::sources::Source;

/// Subprocess-backed enumeration tool invoked with an explicit argv —
/// never through a shell.
pub struct CommandSource {
    name: &'static str,
    program: &'static str,
    args: fn(&str) -> Vec<String>,
}

impl CommandSource {
    pub fn subfinder() -> Self {
        Self {
            name: "subfinder",
            program: "subfinder",
            args: |domain| {
                vec![
                    "-d".to_string(),
                    domain.to_string(),
                    "-all".to_string(),
                    "-silent".to_string(),
                ]
            },
        }
    }

    pub fn assetfinder() -> Self {
        Self {
            name: "assetfinder",
            program: "assetfinder",
            args: |domain| vec!["-subs-only".to_string(), domain.to_string()],
        }
    }
}

#[async_trait]
impl Source for CommandSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(
        &self,
        domain: &str,
        budget: Duration,
    ) -> Result<HashSet<String>, AdapterError> {
        let output = timeout(
            budget,
            Command::new(self.program)
                .args((self.args)(domain))
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| AdapterError::Timeout(budget))??;

        if !output.status.success() {
            return Err(AdapterError::Command {
                command: self.program.to_string(),
                status: output.status,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_reports_failure_instead_of_panicking() {
        let source = CommandSource {
            name: "bogus",
            program: "subsweep-test-no-such-binary",
            args: |domain| vec![domain.to_string()],
        };
        let err = source
            .fetch("example.com", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::Io(_)));
    }

    #[tokio::test]
    async fn stdout_lines_become_candidates() {
        let source = CommandSource {
            name: "echo",
            program: "echo",
            args: |domain| vec![format!("a.{domain}\nb.{domain}\n\n")],
        };
        let subs = source
            .fetch("example.com", Duration::from_secs(5))
            .await
            .unwrap();
        assert!(subs.contains("a.example.com"));
        assert!(subs.contains("b.example.com"));
        assert_eq!(subs.len(), 2);
    }
}
