use alloy_provider::ProviderBuilder;
use anyhow::{anyhow, Result};
use tokio::time::Instant;
use tracing::{error, info};
use tracing_subscriber::{self, EnvFilter};
use url::Url;

use erc721_indexer::indexer;
use erc721_indexer::metrics::Metrics;
use erc721_indexer::storage::csv::write_transfers;
use erc721_indexer::utils::load_config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    println!();
    info!("=========================== INITIALIZING ===========================");

    // Load config
    let config = match load_config("config.yml") {
        Ok(config) => {
            info!("Config loaded successfully");
            config
        }
        Err(e) => {
            error!("Failed to load config: {}", e);
            return Err(anyhow!(e));
        }
    };

    // Parse configs
    let rpc = config.rpc_url.as_str();
    let chunk_size = config.chunk_size;
    let classify_concurrency = config.classify_concurrency;
    let output_path = config.output_path;
    let metrics_enabled = config.metrics.enabled;

    // Initialize optional metrics
    let metrics = if metrics_enabled {
        Some(Metrics::new()?)
    } else {
        info!("Metrics are disabled");
        None
    };

    // Start metrics server if metrics are enabled
    if let Some(metrics_instance) = &metrics {
        metrics_instance
            .start_metrics_server(&config.metrics.address, config.metrics.port)
            .await?;
    }

    // Create RPC provider
    let rpc_url: Url = rpc.parse()?;
    info!("RPC URL: {:?}", rpc);
    let provider = ProviderBuilder::new().connect_http(rpc_url);

    // Resolve the block range. Without explicit bounds, cover the two most
    // recent blocks.
    let (from_block, to_block) = match (config.start_block, config.end_block) {
        (Some(from), Some(to)) => (from, to),
        (from, to) => {
            let latest = indexer::get_latest_block_number(&provider, metrics.as_ref()).await?;
            (
                from.unwrap_or_else(|| latest.saturating_sub(1)),
                to.unwrap_or(latest),
            )
        }
    };

    println!();
    info!("======================== STARTING EXTRACTION =======================");
    info!("Processing blocks {}..={}", from_block, to_block);

    let run_start = Instant::now();

    let transfers = indexer::process_range(
        &provider,
        from_block,
        to_block,
        chunk_size,
        classify_concurrency,
        metrics.as_ref(),
    )
    .await?;

    write_transfers(&output_path, &transfers)?;

    info!(
        "Extraction finished: {} compliant transfers written to {} in {:.2}s",
        transfers.len(),
        output_path,
        run_start.elapsed().as_secs_f64()
    );

    Ok(())
}
