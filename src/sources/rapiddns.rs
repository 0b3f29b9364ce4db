use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use scraper::{Html, Selector};
use tracing::warn;

use crate::constants::PAGE_PARAM_REGEX;
use crate::error::AdapterError;
use crate::sources::{random_user_agent, Source};

/// RapidDNS result-table scrape. The site paginates; the first page's
/// pager links reveal how far to walk. Later pages are best-effort: a
/// failed page is skipped, not fatal, since page one already delivered.
pub struct RapidDns {
    client: Client,
}

impl RapidDns {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn get_page(&self, url: &str) -> Result<String, AdapterError> {
        let resp = self
            .client
            .get(url)
            .header(header::USER_AGENT, random_user_agent())
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.text().await?)
    }
}

/// Pulls every dotted cell value into `subs`; returns the highest page
/// number advertised by the pager.
fn scrape_table(body: &str, subs: &mut HashSet<String>) -> usize {
    let doc = Html::parse_document(body);
    let cell = Selector::parse("td").unwrap();
    let pager = Selector::parse("a.page-link").unwrap();

    for td in doc.select(&cell) {
        let text = td.text().collect::<String>().trim().to_string();
        if text.contains('.') {
            subs.insert(text);
        }
    }

    let mut max_page = 1;
    for link in doc.select(&pager) {
        let href = link.value().attr("href").unwrap_or("");
        if let Some(caps) = PAGE_PARAM_REGEX.captures(href) {
            if let Ok(page) = caps[1].parse::<usize>() {
                max_page = max_page.max(page);
            }
        }
    }
    max_page
}

#[async_trait]
impl Source for RapidDns {
    fn name(&self) -> &'static str {
        "rapiddns"
    }

    async fn fetch(
        &self,
        domain: &str,
        _budget: Duration,
    ) -> Result<HashSet<String>, AdapterError> {
        let base_url = format!("https://rapiddns.io/s/{}?full=1&down=1", domain);
        let mut subs = HashSet::new();

        let body = self.get_page(&base_url).await?;
        let max_page = scrape_table(&body, &mut subs);

        for page in 2..=max_page {
            let url = format!("{}&page={}", base_url, page);
            match self.get_page(&url).await {
                Ok(body) => {
                    scrape_table(&body, &mut subs);
                }
                Err(e) => {
                    warn!(domain, page, error = %e, "rapiddns page fetch failed");
                    continue;
                }
            }
        }

        Ok(subs)
    }
}
