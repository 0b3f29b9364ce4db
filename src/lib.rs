pub mod args;
mod collector;
mod config;
mod constants;
mod error;
mod normalize;
mod permutation;
mod report;
mod resolve;
mod sources;
mod wildcard;
mod wordlist;

pub use args::Args;
pub use config::{PipelineConfig, RunPaths};
pub use error::{AdapterError, AdapterFailure, PipelineError};
pub use permutation::{AffixGenerator, PermutationGenerator};
pub use resolve::{DnsPool, ResolvePool};
pub use sources::Source;

use std::path::PathBuf;
use std::time::Instant;

use tracing::error;

use collector::collect;
use normalize::normalize;
use permutation::expand_permutations;
use wildcard::filter_wildcards;
use wordlist::expand_wordlist;

#[derive(Debug)]
pub struct RunSummary {
    pub output_dir: PathBuf,
    pub candidates: usize,
    pub alive: Option<usize>,
    pub wildcards_removed: usize,
    pub permutations_added: usize,
    pub adapter_failures: Vec<AdapterFailure>,
    pub aborted: Option<String>,
}

/// Converts a fatal stage error into a recorded abort: the stage and
/// everything downstream is skipped, earlier artifacts stay on disk, and
/// the caller gets a summary instead of a crash.
fn abort(
    mut summary: RunSummary,
    stage: &'static str,
    err: PipelineError,
) -> Result<RunSummary, PipelineError> {
    error!(stage, error = %err, "stage failed; downstream stages skipped");
    println!("[!] {} failed: {}", stage, err);
    summary.aborted = Some(format!("{}: {}", stage, err));
    Ok(summary)
}

pub async fn run(config: PipelineConfig) -> Result<RunSummary, PipelineError> {
    let started = Instant::now();
    let primary = config
        .domains
        .first()
        .map(String::as_str)
        .ok_or_else(|| PipelineError::Configuration("no domains supplied".to_string()))?;
    let paths = RunPaths::create(&config.output_root, primary)?;

    println!("[*] Starting reconnaissance for {} domain(s)", config.domains.len());
    println!("[*] Configuration:");
    println!("    - Domains: {}", config.domains.join(", "));
    println!("    - Concurrency: {}", config.concurrency);
    println!("    - Source workers: {}", config.source_workers);
    println!("    - Output: {}", paths.dir.display());

    let client = sources::build_client(config.http_timeout)?;
    let roster = sources::default_sources(&client, &config);

    let (raw, adapter_failures) = collect(
        &config.domains,
        &roster,
        config.source_workers,
        config.source_timeout,
    )
    .await;
    for failure in &adapter_failures {
        println!(
            "[!] {} failed for {}: {}",
            failure.source, failure.domain, failure.reason
        );
    }
    println!(
        "[+] Collected {} raw candidates from {} sources",
        raw.len(),
        roster.len()
    );

    report::write_candidates(&paths.raw_candidates(config.format), &raw, config.format)?;
    println!(
        "[~] Collection took {:.2}s",
        started.elapsed().as_secs_f64()
    );

    let mut summary = RunSummary {
        output_dir: paths.dir.clone(),
        candidates: raw.len(),
        alive: None,
        wildcards_removed: 0,
        permutations_added: 0,
        adapter_failures,
        aborted: None,
    };

    let Some(resolvers) = config.resolvers.clone() else {
        println!("[~] No resolver list supplied; skipping the resolution phase.");
        return Ok(summary);
    };

    let mut candidates = normalize(&raw);
    report::write_lines(&paths.cleaned(), &candidates)?;
    summary.candidates = candidates.len();
    println!("[+] Normalized to {} candidates", candidates.len());

    if let Some(wordlist) = &config.wordlist {
        match expand_wordlist(wordlist, &config.domains, &candidates) {
            Ok(expanded) => {
                candidates = expanded;
                report::write_lines(&paths.cleaned(), &candidates)?;
                summary.candidates = candidates.len();
                println!("[+] Wordlist expansion grew the set to {}", candidates.len());
            }
            Err(e) => return abort(summary, "wordlist expansion", e),
        }
    }

    let pool = match DnsPool::from_file(&resolvers, config.concurrency, config.resolve_budget) {
        Ok(pool) => pool,
        Err(e) => return abort(summary, "resolver setup", e),
    };

    let alive = match pool.resolve_batch(&candidates).await {
        Ok(alive) => alive,
        Err(e) => return abort(summary, "resolution", e),
    };
    report::write_lines(&paths.alive(), &alive)?;
    summary.alive = Some(alive.len());
    println!("[+] {} live subdomains detected", alive.len());

    let alive = match filter_wildcards(&alive, &pool).await {
        Ok(outcome) => {
            report::write_lines(
                &paths.wildcard_probes(),
                outcome.probes.iter().map(|pair| &pair.probe),
            )?;
            report::write_lines(&paths.wildcard_hits(), &outcome.hits)?;
            if outcome.removed == 0 {
                println!("[✓] No wildcard DNS detected.");
            } else {
                println!("[~] Removed {} wildcard DNS entries.", outcome.removed);
                report::write_lines(&paths.alive(), &outcome.kept)?;
            }
            summary.wildcards_removed = outcome.removed;
            summary.alive = Some(outcome.kept.len());
            outcome.kept
        }
        Err(e) => return abort(summary, "wildcard filtering", e),
    };

    if config.permutations {
        match expand_permutations(&alive, &AffixGenerator, &pool).await {
            Ok(outcome) => {
                report::write_lines(&paths.permutations(), &outcome.generated)?;
                report::write_lines(&paths.permutations_resolved(), &outcome.resolved)?;
                if outcome.added == 0 {
                    println!("[~] No new live subdomains after permutation expansion.");
                } else {
                    println!(
                        "[✓] Added {} new live subdomains after permutation expansion.",
                        outcome.added
                    );
                    report::write_lines(&paths.alive(), &outcome.expanded)?;
                }
                summary.permutations_added = outcome.added;
                summary.alive = Some(outcome.expanded.len());
            }
            Err(e) => return abort(summary, "permutation expansion", e),
        }
    }

    println!("[*] Recon complete. Outputs in: {}", paths.dir.display());
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    // alive output of a resolution pass can never leave the candidate set
    #[tokio::test]
    async fn alive_is_always_a_subset_of_candidates() {
        use async_trait::async_trait;

        struct EvenPool;

        #[async_trait]
        impl ResolvePool for EvenPool {
            async fn resolve_batch(
                &self,
                candidates: &HashSet<String>,
            ) -> Result<HashSet<String>, PipelineError> {
                Ok(candidates
                    .iter()
                    .filter(|c| c.len() % 2 == 0)
                    .cloned()
                    .collect())
            }
        }

        let candidates = normalize(["a.example.com", "bb.example.com", "ccc.example.com"]);
        let alive = EvenPool.resolve_batch(&candidates).await.unwrap();
        assert!(alive.is_subset(&candidates));
    }
}
