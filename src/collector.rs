use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::{AdapterError, AdapterFailure};
use crate::sources::Source;

/// Runs every (domain, source) pair under a bounded worker pool and
/// merges whatever succeeded. Workers accumulate locally; the single
/// fan-in loop below is the only writer to the merged set, and set union
/// makes the result independent of completion order. Individual failures
/// become `AdapterFailure` records and never abort the batch.
pub async fn collect(
    domains: &[String],
    sources: &[Arc<dyn Source>],
    workers: usize,
    per_source_budget: Duration,
) -> (HashSet<String>, Vec<AdapterFailure>) {
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let mut tasks = FuturesUnordered::new();

    for domain in domains {
        for source in sources {
            let permit = semaphore.clone().acquire_owned().await.unwrap();
            let source = Arc::clone(source);
            let domain = domain.clone();

            tasks.push(tokio::spawn(async move {
                let result =
                    match timeout(per_source_budget, source.fetch(&domain, per_source_budget))
                        .await
                    {
                        Ok(Ok(subs)) => Ok(subs),
                        Ok(Err(e)) => Err(e),
                        Err(_) => Err(AdapterError::Timeout(per_source_budget)),
                    };
                drop(permit);
                (source.name(), domain, result)
            }));
        }
    }

    let mut merged = HashSet::new();
    let mut failures = Vec::new();

    while let Some(res) = tasks.next().await {
        match res {
            Ok((source, domain, Ok(subs))) => {
                debug!(source, domain = %domain, found = subs.len(), "source finished");
                merged.extend(subs);
            }
            Ok((source, domain, Err(e))) => {
                warn!(source, domain = %domain, error = %e, "source failed");
                failures.push(AdapterFailure {
                    source,
                    domain,
                    reason: e.to_string(),
                });
            }
            Err(e) => warn!(error = %e, "collector task died"),
        }
    }

    (merged, failures)
}
