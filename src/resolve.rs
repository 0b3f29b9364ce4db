use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::debug;
use trust_dns_resolver::config::{NameServerConfig, Protocol, ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

use crate::constants::DNS_TIMEOUT;
use crate::error::PipelineError;

/// The resolution seam: candidates in, alive subset out. Batch-fatal
/// conditions surface as errors; a single candidate that fails to resolve
/// is simply absent from the result.
#[async_trait]
pub trait ResolvePool: Send + Sync {
    async fn resolve_batch(
        &self,
        candidates: &HashSet<String>,
    ) -> Result<HashSet<String>, PipelineError>;
}

pub struct DnsPool {
    resolver: TokioAsyncResolver,
    concurrency: usize,
    batch_budget: Duration,
}

impl DnsPool {
    /// Builds a pool from a resolver list file, one IP address per line.
    /// Lines that do not parse as addresses are ignored; an unusable list
    /// is a configuration error, not an empty pool.
    pub fn from_file(
        path: &Path,
        concurrency: usize,
        batch_budget: Duration,
    ) -> Result<Self, PipelineError> {
        if !path.is_file() {
            return Err(PipelineError::Configuration(format!(
                "resolver list {} not found",
                path.display()
            )));
        }

        let addrs: Vec<IpAddr> = std::fs::read_to_string(path)?
            .lines()
            .filter_map(|line| line.trim().parse().ok())
            .collect();
        if addrs.is_empty() {
            return Err(PipelineError::Configuration(format!(
                "resolver list {} holds no usable addresses",
                path.display()
            )));
        }

        let mut config = ResolverConfig::new();
        for addr in addrs {
            config.add_name_server(NameServerConfig {
                socket_addr: SocketAddr::new(addr, 53),
                protocol: Protocol::Udp,
                tls_dns_name: None,
                trust_negative_responses: false,
                bind_addr: None,
            });
        }

        let opts = ResolverOpts::default();
        Ok(Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
            concurrency: concurrency.max(1),
            batch_budget,
        })
    }
}

#[async_trait]
impl ResolvePool for DnsPool {
    async fn resolve_batch(
        &self,
        candidates: &HashSet<String>,
    ) -> Result<HashSet<String>, PipelineError> {
        let batch = async {
            let semaphore = Arc::new(Semaphore::new(self.concurrency));
            let mut tasks = FuturesUnordered::new();

            for candidate in candidates.iter() {
                let permit = semaphore.clone().acquire_owned().await.unwrap();
                let resolver = self.resolver.clone();
                let candidate = candidate.clone();

                tasks.push(tokio::spawn(async move {
                    let result = timeout(DNS_TIMEOUT, resolver.lookup_ip(candidate.clone())).await;
                    drop(permit);

                    match result {
                        Ok(Ok(lookup)) if lookup.iter().next().is_some() => Some(candidate),
                        _ => None,
                    }
                }));
            }

            let mut alive = HashSet::new();
            while let Some(res) = tasks.next().await {
                if let Ok(Some(host)) = res {
                    alive.insert(host);
                }
            }
            alive
        };

        match timeout(self.batch_budget, batch).await {
            Ok(alive) => {
                debug!(
                    candidates = candidates.len(),
                    alive = alive.len(),
                    "resolution batch complete"
                );
                Ok(alive)
            }
            Err(_) => Err(PipelineError::ResolutionTimeout {
                budget: self.batch_budget,
            }),
        }
    }
}
