use clap::Parser;
use anyhow::{Context, Result};
use token_fetch::observability::metrics::get_metrics;
use token_fetch::utils::config_loader;
use token_fetch::utils::constants::DEFAULT_CONFIG_PATH;
use token_fetch::utils::logging;
use token_fetch::utils::logging::LogLevel;
use token_fetch::FetchService;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: String,
    #[arg(long, env = "LOG_LEVEL" , value_enum)]
    log_level: Option<LogLevel>,
    /// print Prometheus metrics after the call
    #[arg(long)]
    metrics: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config
    // -------------------------------

    let args = Args::parse();
    let service_config = config_loader::run(&args.config)?;
    logging::run(&service_config, args.log_level)?;

    // -------------------------------
    // 2. Prepare request and optional refresh cycle
    // -------------------------------

    let request = &service_config.request;
    let params = request.to_parameters();
    let refresh = service_config.refresh.as_ref().map(|refresh| refresh.descriptor());

    // -------------------------------
    // 3. Fetch
    // -------------------------------

    let service = FetchService::new();
    info!("fetching {}", request.url);
    let envelope = service
        .fetch(&request.url, params, refresh.as_ref())
        .await
        .with_context(|| format!("fetch {} failed", request.url))?;
    info!("{} answered {}", envelope.url, envelope.status_code);

    println!("{}", serde_json::to_string_pretty(&envelope)?);

    // -------------------------------
    // 4. Metrics
    // -------------------------------

    if args.metrics || service_config.settings.metrics.is_enabled {
        print!("{}", get_metrics().await?.render()?);
    }

    Ok(())
}
