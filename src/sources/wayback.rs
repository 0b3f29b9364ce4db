use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};

use crate::error::AdapterError;
use crate::sources::{random_user_agent, Source};

/// Historical web-archive index. The CDX endpoint returns one archived
/// original URL per line; the host component is the candidate.
pub struct Wayback {
    client: Client,
}

impl Wayback {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn host_of(url_line: &str) -> Option<&str> {
    // scheme://host/...; the host sits in the third slash-field
    url_line.split('/').nth(2).filter(|host| !host.is_empty())
}

#[async_trait]
impl Source for Wayback {
    fn name(&self) -> &'static str {
        "wayback"
    }

    async fn fetch(
        &self,
        domain: &str,
        _budget: Duration,
    ) -> Result<HashSet<String>, AdapterError> {
        let url = format!(
            "https://web.archive.org/cdx/search/cdx?url=*.{}&collapse=urlkey&fl=original",
            domain
        );
        let body = self
            .client
            .get(&url)
            .header(header::USER_AGENT, random_user_agent())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(body
            .lines()
            .filter_map(host_of)
            .map(str::to_string)
            .collect())
    }
}
