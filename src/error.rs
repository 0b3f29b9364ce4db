use std::time::Duration;

use thiserror::Error;

/// Stage-level failures. Per-item failures (a single candidate that does
/// not resolve, a single source that errors) never become one of these.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("DNS resolution exceeded its {budget:?} budget")]
    ResolutionTimeout { budget: Duration },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Why one source failed for one domain. The collector demotes these to
/// [`AdapterFailure`] records; they never abort a batch.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unparseable response: {0}")]
    Parse(String),

    #[error("{command} exited with {status}")]
    Command {
        command: String,
        status: std::process::ExitStatus,
    },

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// One source's failure for one domain, as recorded by the collector.
#[derive(Debug, Clone)]
pub struct AdapterFailure {
    pub source: &'static str,
    pub domain: String,
    pub reason: String,
}
