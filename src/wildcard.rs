use std::collections::HashSet;

use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::info;

use crate::error::PipelineError;
use crate::resolve::ResolvePool;

/// A randomly labelled sibling probe tied to the alive host it vouches
/// for.
#[derive(Debug, Clone)]
pub struct ProbePair {
    pub probe: String,
    pub host: String,
}

#[derive(Debug)]
pub struct WildcardOutcome {
    pub kept: HashSet<String>,
    pub removed: usize,
    pub probes: Vec<ProbePair>,
    pub hits: HashSet<String>,
}

fn random_label() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .map(char::from)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .take(8)
        .collect()
}

/// One fresh probe per alive host under that host's immediate parent
/// zone. Hosts sharing a zone still get independent probes, so one zone's
/// lucky miss cannot mask contamination visible through another host.
/// Hosts without a parent zone cannot be probed and are left alone.
pub fn probe_pairs(alive: &HashSet<String>) -> Vec<ProbePair> {
    let mut pairs = Vec::new();
    for host in alive.iter() {
        if let Some((_, zone)) = host.split_once('.') {
            if zone.is_empty() {
                continue;
            }
            pairs.push(ProbePair {
                probe: format!("{}.{}", random_label(), zone),
                host: host.clone(),
            });
        }
    }
    pairs
}

/// Drops an alive host only when its own random probe resolved. Zero
/// removals is success, distinct from "could not check" (which surfaces
/// as an error from the resolver).
pub async fn filter_wildcards(
    alive: &HashSet<String>,
    pool: &dyn ResolvePool,
) -> Result<WildcardOutcome, PipelineError> {
    let probes = probe_pairs(alive);
    let probe_set: HashSet<String> = probes.iter().map(|p| p.probe.clone()).collect();

    let hits = if probe_set.is_empty() {
        HashSet::new()
    } else {
        pool.resolve_batch(&probe_set).await?
    };

    let mut kept = alive.clone();
    let mut removed = 0;
    for pair in &probes {
        if hits.contains(&pair.probe) && kept.remove(&pair.host) {
            removed += 1;
        }
    }

    info!(removed, probed = probes.len(), "wildcard filtering complete");
    Ok(WildcardOutcome {
        kept,
        removed,
        probes,
        hits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Resolves exactly the candidates it was seeded with; `all` short-
    /// circuits to "everything resolves".
    struct StubPool {
        all: bool,
        alive: HashSet<String>,
    }

    impl StubPool {
        fn wildcard_everywhere() -> Self {
            Self {
                all: true,
                alive: HashSet::new(),
            }
        }

        fn dead_zone() -> Self {
            Self {
                all: false,
                alive: HashSet::new(),
            }
        }
    }

    #[async_trait]
    impl ResolvePool for StubPool {
        async fn resolve_batch(
            &self,
            candidates: &HashSet<String>,
        ) -> Result<HashSet<String>, PipelineError> {
            if self.all {
                return Ok(candidates.clone());
            }
            Ok(candidates.intersection(&self.alive).cloned().collect())
        }
    }

    fn alive_set(hosts: &[&str]) -> HashSet<String> {
        hosts.iter().map(|h| h.to_string()).collect()
    }

    #[test]
    fn hosts_sharing_a_zone_get_independent_probes() {
        let alive = alive_set(&["a.example.com", "b.example.com"]);
        let pairs = probe_pairs(&alive);

        assert_eq!(pairs.len(), 2);
        for pair in &pairs {
            assert!(pair.probe.ends_with(".example.com"));
            let label = pair.probe.split('.').next().unwrap();
            assert_eq!(label.len(), 8);
            assert!(label
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        }
        assert_ne!(pairs[0].probe, pairs[1].probe);
    }

    #[test]
    fn unprobeable_hosts_are_skipped() {
        let alive = alive_set(&["localhost"]);
        assert!(probe_pairs(&alive).is_empty());
    }

    #[tokio::test]
    async fn universal_wildcard_zone_loses_every_host() {
        let alive = alive_set(&["a.example.com", "b.example.com"]);
        let outcome = filter_wildcards(&alive, &StubPool::wildcard_everywhere())
            .await
            .unwrap();

        assert_eq!(outcome.removed, 2);
        assert!(outcome.kept.is_empty());
    }

    #[tokio::test]
    async fn clean_zone_keeps_every_host() {
        let alive = alive_set(&["a.example.com", "b.example.com"]);
        let outcome = filter_wildcards(&alive, &StubPool::dead_zone()).await.unwrap();

        assert_eq!(outcome.removed, 0);
        assert_eq!(outcome.kept, alive);
    }

    #[tokio::test]
    async fn empty_alive_set_needs_no_resolution() {
        let outcome = filter_wildcards(&HashSet::new(), &StubPool::dead_zone())
            .await
            .unwrap();
        assert_eq!(outcome.removed, 0);
        assert!(outcome.kept.is_empty());
        assert!(outcome.probes.is_empty());
    }

    #[tokio::test]
    async fn unprobeable_host_survives_a_wildcard_pass() {
        let alive = alive_set(&["localhost", "a.example.com"]);
        let outcome = filter_wildcards(&alive, &StubPool::wildcard_everywhere())
            .await
            .unwrap();

        assert_eq!(outcome.removed, 1);
        assert!(outcome.kept.contains("localhost"));
    }
}
