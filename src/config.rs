use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;

use crate::args::{Args, OutputFormat};

/// Everything the pipeline stages need, passed explicitly to each stage.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub domains: Vec<String>,
    pub concurrency: usize,
    pub source_workers: usize,
    pub http_timeout: Duration,
    pub source_timeout: Duration,
    pub resolve_budget: Duration,
    pub retries: usize,
    pub wordlist: Option<PathBuf>,
    pub resolvers: Option<PathBuf>,
    pub shodan_key: Option<String>,
    pub format: OutputFormat,
    pub output_root: PathBuf,
    pub permutations: bool,
}

impl PipelineConfig {
    pub fn from_args(args: Args) -> Self {
        Self {
            domains: args.domains,
            concurrency: args.concurrency,
            source_workers: args.source_workers,
            http_timeout: Duration::from_secs(args.timeout),
            source_timeout: Duration::from_secs(args.source_timeout),
            resolve_budget: Duration::from_secs(args.resolve_timeout),
            retries: args.retries,
            wordlist: args.wordlist,
            resolvers: args.resolvers,
            shodan_key: args.shodan_key,
            format: args.format,
            output_root: args.output,
            permutations: !args.no_permute,
        }
    }
}

/// Artifact layout under one per-run directory. The directory is owned by
/// this run alone; concurrent runs against the same directory are not
/// supported.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub dir: PathBuf,
}

impl RunPaths {
    pub fn create(root: &Path, primary_domain: &str) -> std::io::Result<Self> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let dir = root.join(format!("{}_{}", primary_domain, timestamp));
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn raw_candidates(&self, format: OutputFormat) -> PathBuf {
        match format {
            OutputFormat::Txt => self.dir.join("subdomains.txt"),
            OutputFormat::Json => self.dir.join("subdomains.json"),
        }
    }

    pub fn cleaned(&self) -> PathBuf {
        self.dir.join("cleaned_subs.txt")
    }

    pub fn alive(&self) -> PathBuf {
        self.dir.join("alive_subs.txt")
    }

    pub fn wildcard_probes(&self) -> PathBuf {
        self.dir.join("wildcard_test.txt")
    }

    pub fn wildcard_hits(&self) -> PathBuf {
        self.dir.join("wildcard_hits.txt")
    }

    pub fn permutations(&self) -> PathBuf {
        self.dir.join("permutations.txt")
    }

    pub fn permutations_resolved(&self) -> PathBuf {
        self.dir.join("permutations_resolved.txt")
    }
}
