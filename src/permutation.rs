use std::collections::HashSet;

use tracing::info;

use crate::constants::PERMUTATION_WORDS;
use crate::error::PipelineError;
use crate::resolve::ResolvePool;

const LEET_SUBS: &[(char, char)] = &[('o', '0'), ('i', '1'), ('e', '3'), ('a', '4'), ('s', '5')];

/// Produces candidate variants of known-alive hostnames as a finite,
/// lazily iterated sequence.
pub trait PermutationGenerator: Send + Sync {
    fn generate(&self, hosts: &HashSet<String>) -> Box<dyn Iterator<Item = String>>;
}

/// Built-in generator: affix words joined with `-` or prepended as a new
/// label, numeric suffix wiggling, and a small leetspeak table. The affix
/// vocabulary is the built-in word list plus tokens harvested from the
/// input hosts' own labels.
pub struct AffixGenerator;

impl AffixGenerator {
    fn words_for(hosts: &HashSet<String>) -> Vec<String> {
        let mut words: HashSet<String> = PERMUTATION_WORDS.iter().map(|w| w.to_string()).collect();
        for host in hosts {
            for label in host.split('.') {
                for token in label.split('-') {
                    let token = token.trim_matches(|c: char| c.is_ascii_digit());
                    if token.len() >= 2 && token.len() <= 12 {
                        words.insert(token.to_lowercase());
                    }
                }
            }
        }
        let mut words: Vec<String> = words.into_iter().collect();
        words.sort();
        words
    }

    fn variants(host: &str, words: &[String]) -> HashSet<String> {
        let mut out = HashSet::new();
        let Some((label, zone)) = host.split_once('.') else {
            return out;
        };
        if label.is_empty() || zone.is_empty() {
            return out;
        }

        for word in words {
            out.insert(format!("{word}-{label}.{zone}"));
            out.insert(format!("{label}-{word}.{zone}"));
            out.insert(format!("{word}{label}.{zone}"));
            out.insert(format!("{word}.{host}"));
        }

        // dev1 -> dev2, dev0, dev; dev -> dev1, dev2, dev3
        let digits_at = label
            .rfind(|c: char| !c.is_ascii_digit())
            .map(|i| i + 1)
            .unwrap_or(0);
        let (stem, digits) = label.split_at(digits_at);
        if digits.is_empty() {
            for n in 1..=3 {
                out.insert(format!("{label}{n}.{zone}"));
            }
        } else {
            if let Ok(n) = digits.parse::<u64>() {
                out.insert(format!("{stem}{}.{zone}", n + 1));
                if n > 0 {
                    out.insert(format!("{stem}{}.{zone}", n - 1));
                }
            }
            if !stem.is_empty() {
                out.insert(format!("{stem}.{zone}"));
            }
        }

        for (from, to) in LEET_SUBS {
            if label.contains(*from) {
                out.insert(format!("{}.{zone}", label.replace(*from, &to.to_string())));
            }
        }

        out.remove(host);
        out
    }
}

impl PermutationGenerator for AffixGenerator {
    fn generate(&self, hosts: &HashSet<String>) -> Box<dyn Iterator<Item = String>> {
        let words = Self::words_for(hosts);
        let hosts: Vec<String> = hosts.iter().cloned().collect();
        Box::new(
            hosts
                .into_iter()
                .flat_map(move |host| Self::variants(&host, &words).into_iter()),
        )
    }
}

#[derive(Debug)]
pub struct PermutationOutcome {
    pub expanded: HashSet<String>,
    pub added: usize,
    pub generated: HashSet<String>,
    pub resolved: HashSet<String>,
}

/// Resolves generated permutations and unions newly alive hosts into the
/// input set; the input set is never replaced, and an empty delta is
/// success. Wildcard filtering is NOT re-run here; callers needing that
/// guarantee run the wildcard stage again on the result.
pub async fn expand_permutations(
    alive: &HashSet<String>,
    generator: &dyn PermutationGenerator,
    pool: &dyn ResolvePool,
) -> Result<PermutationOutcome, PipelineError> {
    let generated: HashSet<String> = generator
        .generate(alive)
        .filter(|candidate| !alive.contains(candidate))
        .collect();

    if generated.is_empty() {
        return Ok(PermutationOutcome {
            expanded: alive.clone(),
            added: 0,
            generated,
            resolved: HashSet::new(),
        });
    }

    let resolved = pool.resolve_batch(&generated).await?;
    let fresh: HashSet<String> = resolved.difference(alive).cloned().collect();
    let added = fresh.len();

    let mut expanded = alive.clone();
    expanded.extend(fresh);

    info!(
        generated = generated.len(),
        added, "permutation expansion complete"
    );
    Ok(PermutationOutcome {
        expanded,
        added,
        generated,
        resolved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StaticGenerator(Vec<String>);

    impl PermutationGenerator for StaticGenerator {
        fn generate(&self, _hosts: &HashSet<String>) -> Box<dyn Iterator<Item = String>> {
            Box::new(self.0.clone().into_iter())
        }
    }

    struct StubPool {
        alive: HashSet<String>,
    }

    #[async_trait]
    impl ResolvePool for StubPool {
        async fn resolve_batch(
            &self,
            candidates: &HashSet<String>,
        ) -> Result<HashSet<String>, PipelineError> {
            Ok(candidates.intersection(&self.alive).cloned().collect())
        }
    }

    fn hosts(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn new_resolutions_are_unioned_in() {
        let alive = hosts(&["dev.example.com"]);
        let generator = StaticGenerator(vec![
            "dev1.example.com".to_string(),
            "devx.example.com".to_string(),
        ]);
        let pool = StubPool {
            alive: hosts(&["dev1.example.com"]),
        };

        let outcome = expand_permutations(&alive, &generator, &pool).await.unwrap();
        assert_eq!(outcome.added, 1);
        assert_eq!(outcome.expanded, hosts(&["dev.example.com", "dev1.example.com"]));
    }

    #[tokio::test]
    async fn empty_generation_returns_the_input_unchanged() {
        let alive = hosts(&["dev.example.com"]);
        let generator = StaticGenerator(Vec::new());
        let pool = StubPool {
            alive: HashSet::new(),
        };

        let outcome = expand_permutations(&alive, &generator, &pool).await.unwrap();
        assert_eq!(outcome.added, 0);
        assert_eq!(outcome.expanded, alive);
    }

    #[tokio::test]
    async fn already_alive_candidates_are_not_re_resolved() {
        let alive = hosts(&["dev.example.com"]);
        let generator = StaticGenerator(vec!["dev.example.com".to_string()]);
        let pool = StubPool {
            alive: hosts(&["dev.example.com"]),
        };

        let outcome = expand_permutations(&alive, &generator, &pool).await.unwrap();
        assert!(outcome.generated.is_empty());
        assert_eq!(outcome.expanded, alive);
    }

    #[tokio::test]
    async fn expansion_never_drops_confirmed_hosts() {
        let alive = hosts(&["a.example.com", "b.example.com"]);
        let generator = StaticGenerator(vec!["c.example.com".to_string()]);
        let pool = StubPool {
            alive: HashSet::new(),
        };

        let outcome = expand_permutations(&alive, &generator, &pool).await.unwrap();
        assert!(outcome.expanded.is_superset(&alive));
    }

    #[test]
    fn affix_generator_wiggles_numbers_and_affixes() {
        let alive = hosts(&["dev.example.com"]);
        let variants: HashSet<String> = AffixGenerator.generate(&alive).collect();

        assert!(variants.contains("dev1.example.com"));
        assert!(variants.contains("staging-dev.example.com"));
        assert!(variants.contains("api.dev.example.com"));
        assert!(!variants.contains("dev.example.com"));
    }

    #[test]
    fn affix_generator_harvests_words_from_the_input() {
        let alive = hosts(&["grafana.example.com", "db.example.com"]);
        let variants: HashSet<String> = AffixGenerator.generate(&alive).collect();
        assert!(variants.contains("grafana-db.example.com"));
    }

    #[test]
    fn numeric_suffixes_step_in_both_directions() {
        let alive = hosts(&["dev2.example.com"]);
        let variants: HashSet<String> = AffixGenerator.generate(&alive).collect();
        assert!(variants.contains("dev3.example.com"));
        assert!(variants.contains("dev1.example.com"));
        assert!(variants.contains("dev.example.com"));
    }
}
