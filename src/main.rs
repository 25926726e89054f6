use anyhow::Result;
use clap::Parser;
use http_probe::cli::Cli;
use http_probe::{AppConfig, Client, Profiler};
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    tracing_subscriber::fmt()
        .with_env_filter(cli.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    info!("HTTP Probe v{}", env!("CARGO_PKG_VERSION"));

    let config = cli.to_config()?;
    run(&config).await
}

/// One-shot mode first, then profiling mode; either may be absent.
async fn run(config: &AppConfig) -> Result<()> {
    let client = Client::new(config);

    if let Some(url) = config.url() {
        match client.get(url).await {
            Ok(measurement) => debug!(
                "Fetched {} in {:?} (status {})",
                url, measurement.elapsed, measurement.status
            ),
            Err(e) if e.is_recoverable() => {
                warn!("Skipping request: {}", e);
                println!("{}", e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    if config.profile > 0 {
        let profiler = Profiler::new(&client, config.size_mode());
        if let Some(report) = profiler.run(config.profile).await? {
            println!("{}", report);
        }
    }

    Ok(())
}
