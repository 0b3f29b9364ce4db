use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;
use tokio::time::sleep;
use tracing::warn;

use crate::error::AdapterError;
use crate::sources::{random_user_agent, Source};

#[derive(Debug, Deserialize)]
struct CrtShEntry {
    name_value: String,
}

/// Certificate-transparency search. crt.sh returns one JSON entry per
/// certificate; `name_value` packs multiple names separated by newlines.
pub struct CrtSh {
    client: Client,
    max_retries: usize,
}

impl CrtSh {
    pub fn new(client: Client, max_retries: usize) -> Self {
        Self {
            client,
            max_retries: max_retries.max(1),
        }
    }
}

#[async_trait]
impl Source for CrtSh {
    fn name(&self) -> &'static str {
        "crt.sh"
    }

    async fn fetch(
        &self,
        domain: &str,
        _budget: Duration,
    ) -> Result<HashSet<String>, AdapterError> {
        let url = format!("https://crt.sh/?q=%25.{}&output=json", domain);
        let mut retries = 0;
        let mut last_error: Option<AdapterError> = None;

        while retries < self.max_retries {
            let resp = self
                .client
                .get(&url)
                .header(header::USER_AGENT, random_user_agent())
                .header(header::ACCEPT, "application/json")
                .send()
                .await;

            match resp {
                Ok(r) if r.status().is_success() => match r.json::<Vec<CrtShEntry>>().await {
                    Ok(entries) => {
                        let mut subs = HashSet::new();
                        for entry in entries {
                            for name in entry.name_value.split('\n') {
                                let trimmed = name.trim();
                                if trimmed.contains('.') && !trimmed.starts_with('*') {
                                    subs.insert(trimmed.to_string());
                                }
                            }
                        }
                        return Ok(subs);
                    }
                    Err(e) => last_error = Some(AdapterError::Parse(e.to_string())),
                },
                Ok(r) => {
                    last_error = Some(AdapterError::Parse(format!(
                        "unexpected status {}",
                        r.status()
                    )))
                }
                Err(e) => last_error = Some(AdapterError::Http(e)),
            }

            retries += 1;
            if retries < self.max_retries {
                let delay = Duration::from_secs(2_u64.pow(retries as u32));
                warn!(domain, retry = retries, "crt.sh retrying after {:?}", delay);
                sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| AdapterError::Parse("max retries exceeded".into())))
    }
}
