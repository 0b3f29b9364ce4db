use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::PipelineError;

/// Cross-products a wordlist against the root domains and merges the
/// result into an existing candidate set. The full product is kept;
/// deciding plausibility is the resolver's job.
pub fn expand_wordlist(
    path: &Path,
    domains: &[String],
    existing: &HashSet<String>,
) -> Result<HashSet<String>, PipelineError> {
    if !path.is_file() {
        return Err(PipelineError::Configuration(format!(
            "wordlist {} not found",
            path.display()
        )));
    }

    let words: Vec<String> = fs::read_to_string(path)?
        .lines()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect();

    let mut merged = existing.clone();
    for domain in domains {
        for word in &words {
            merged.insert(format!("{}.{}", word, domain));
        }
    }

    info!(
        words = words.len(),
        domains = domains.len(),
        total = merged.len(),
        "wordlist expansion merged"
    );
    Ok(merged)
}
