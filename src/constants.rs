use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

pub const DNS_TIMEOUT: Duration = Duration::from_secs(5);

pub static USER_AGENTS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15",
    ]
});

/// Permissive hostname shape, not RFC validation: at least one dot and a
/// final label that is purely alphabetic with two or more characters.
pub static HOSTNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

pub static PORT_SUFFIX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r":\d+$").unwrap());

pub static PAGE_PARAM_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"page=(\d+)").unwrap());

/// Affix vocabulary for the built-in permutation generator, merged at run
/// time with word tokens harvested from the alive set itself.
pub const PERMUTATION_WORDS: &[&str] = &[
    "dev", "test", "staging", "stage", "prod", "qa", "uat", "api", "admin", "app", "beta",
    "demo", "internal", "new", "old", "portal", "backup", "web", "mail", "vpn",
];
