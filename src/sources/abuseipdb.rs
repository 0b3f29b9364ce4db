use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use scraper::{Html, Selector};

use crate::error::AdapterError;
use crate::sources::{random_user_agent, Source};

/// Best-effort scrape of the AbuseIPDB whois page, which lists observed
/// subdomains as plain `<li>` entries. Bare labels are qualified against
/// the queried domain; anything else rides through to the normalizer.
pub struct AbuseIpDb {
    client: Client,
}

impl AbuseIpDb {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn scrape_list_items(body: &str, domain: &str) -> HashSet<String> {
    let doc = Html::parse_document(body);
    let item = Selector::parse("li").unwrap();
    let mut subs = HashSet::new();

    for el in doc.select(&item) {
        let text = el.text().collect::<String>().trim().to_string();
        if text.is_empty()
            || text.contains(char::is_whitespace)
            || !text.starts_with(|c: char| c.is_ascii_alphanumeric())
        {
            continue;
        }
        if text.contains('.') {
            subs.insert(text);
        } else {
            subs.insert(format!("{}.{}", text, domain));
        }
    }
    subs
}

#[async_trait]
impl Source for AbuseIpDb {
    fn name(&self) -> &'static str {
        "abuseipdb"
    }

    async fn fetch(
        &self,
        domain: &str,
        _budget: Duration,
    ) -> Result<HashSet<String>, AdapterError> {
        let url = format!("https://www.abuseipdb.com/whois/{}", domain);
        let body = self
            .client
            .get(&url)
            .header(header::USER_AGENT, random_user_agent())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(scrape_list_items(&body, domain))
    }
}
