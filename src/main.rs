use clap::Parser;
use tracing_subscriber::EnvFilter;

use subsweep::{run, Args, PipelineConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let summary = run(PipelineConfig::from_args(args)).await?;

    if let Some(stage) = &summary.aborted {
        eprintln!("[!] Pipeline aborted at {}", stage);
        std::process::exit(1);
    }
    Ok(())
}
