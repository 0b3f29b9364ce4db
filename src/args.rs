use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Root domain to enumerate; repeat the flag for multiple domains
    #[arg(short, long = "domain", required = true)]
    pub domains: Vec<String>,

    /// Maximum number of concurrent DNS lookups
    #[arg(short, long, default_value = "50")]
    pub concurrency: usize,

    /// Concurrent source slots during collection
    #[arg(long, default_value = "5")]
    pub source_workers: usize,

    /// HTTP request timeout in seconds
    #[arg(short, long, default_value = "10")]
    pub timeout: u64,

    /// Per-source time budget in seconds
    #[arg(long, default_value = "300")]
    pub source_timeout: u64,

    /// Whole-batch DNS resolution budget in seconds
    #[arg(long, default_value = "600")]
    pub resolve_timeout: u64,

    /// Number of retries for failed certificate-transparency requests
    #[arg(short, long, default_value = "3")]
    pub retries: usize,

    /// Wordlist to cross against the root domains, one word per line
    #[arg(short, long)]
    pub wordlist: Option<PathBuf>,

    /// Upstream resolver list, one IP address per line; enables the
    /// resolution phase
    #[arg(long)]
    pub resolvers: Option<PathBuf>,

    /// Shodan API key for the credentialed source; the source is skipped
    /// entirely when absent
    #[arg(long)]
    pub shodan_key: Option<String>,

    /// Output format for the collected subdomain list
    #[arg(short, long, value_enum, default_value = "txt")]
    pub format: OutputFormat,

    /// Directory that receives per-run result directories
    #[arg(short, long, default_value = "results")]
    pub output: PathBuf,

    /// Skip permutation expansion in the resolution phase
    #[arg(long)]
    pub no_permute: bool,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Txt,
    Json,
}
