use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::{redirect::Policy, Client};

use crate::config::PipelineConfig;
use crate::constants::USER_AGENTS;
use crate::error::AdapterError;

mod abuseipdb;
mod command;
mod crtsh;
mod rapiddns;
mod shodan;
mod wayback;

pub use abuseipdb::AbuseIpDb;
pub use command::CommandSource;
pub use crtsh::CrtSh;
pub use rapiddns::RapidDns;
pub use shodan::Shodan;
pub use wayback::Wayback;

/// A single passive data source. `fetch` reports failure through its
/// Result; the collector is the only place that decides what a failure
/// means for the batch, so adapters stay free of recovery policy.
#[async_trait]
pub trait Source: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(
        &self,
        domain: &str,
        budget: Duration,
    ) -> Result<HashSet<String>, AdapterError>;
}

pub(crate) fn random_user_agent() -> &'static str {
    *USER_AGENTS.choose(&mut rand::thread_rng()).unwrap()
}

pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .redirect(Policy::limited(2))
        .danger_accept_invalid_certs(false)
        .pool_idle_timeout(Some(Duration::from_secs(30)))
        .build()
}

/// The source roster for a run. The credentialed Shodan source joins only
/// when a key was supplied; absence is not an error.
pub fn default_sources(client: &Client, cfg: &PipelineConfig) -> Vec<Arc<dyn Source>> {
    let mut sources: Vec<Arc<dyn Source>> = vec![
        Arc::new(CommandSource::subfinder()),
        Arc::new(CommandSource::assetfinder()),
        Arc::new(CrtSh::new(client.clone(), cfg.retries)),
        Arc::new(RapidDns::new(client.clone())),
        Arc::new(Wayback::new(client.clone())),
        Arc::new(AbuseIpDb::new(client.clone())),
    ];
    if let Some(key) = &cfg.shodan_key {
        sources.push(Arc::new(Shodan::new(key.clone())));
    }
    sources
}
