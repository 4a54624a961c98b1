use alloy_eips::BlockNumberOrTag;
use alloy_provider::Provider;
use alloy_rpc_types_eth::{Filter, Log};
use alloy_sol_types::SolEvent;
use opentelemetry::KeyValue;
use tracing::{debug, warn};

use crate::contracts::Transfer;
use crate::metrics::Metrics;
use crate::models::errors::FetchError;
use crate::utils::retry::{retry, RetryConfig};

/// Fetches every transfer log in the inclusive `from_block..=to_block` range.
///
/// The range is validated before any network traffic, then split into
/// `chunk_size`-block windows fetched in ascending order so one oversized
/// eth_getLogs cannot blow a node's response limit. Each window is retried
/// with backoff; a window that still fails is fatal to the whole fetch.
pub async fn fetch_transfer_logs<P: Provider>(
    provider: &P,
    from_block: u64,
    to_block: u64,
    chunk_size: u64,
    metrics: Option<&Metrics>,
) -> Result<Vec<Log>, FetchError> {
    if from_block > to_block {
        warn!(
            "Rejecting inverted block range: {} > {}",
            from_block, to_block
        );
        return Err(FetchError::InvalidRange {
            from_block,
            to_block,
        });
    }

    let chunk_size = chunk_size.max(1);
    let retry_config = RetryConfig::default();
    let mut logs = Vec::new();
    let mut start = from_block;

    loop {
        let end = start.saturating_add(chunk_size - 1).min(to_block);
        let filter = Filter::new()
            .from_block(BlockNumberOrTag::Number(start))
            .to_block(BlockNumberOrTag::Number(end))
            .event_signature(Transfer::SIGNATURE_HASH);

        let chunk = retry(
            || async {
                let request_start = std::time::Instant::now();

                if let Some(metrics) = metrics {
                    metrics
                        .rpc_requests
                        .add(1, &[KeyValue::new("method", "get_logs")]);
                }

                let result = provider.get_logs(&filter).await;

                // Record metrics if enabled
                if let Some(metrics) = metrics {
                    metrics.rpc_latency.record(
                        request_start.elapsed().as_secs_f64(),
                        &[KeyValue::new("method", "get_logs")],
                    );
                    if result.is_err() {
                        metrics
                            .rpc_errors
                            .add(1, &[KeyValue::new("method", "get_logs")]);
                    }
                }

                result.map_err(|e| {
                    warn!(
                        "Failed to get logs for blocks {}..={}. Error details:\n{:#?}",
                        start, end, e
                    );
                    FetchError::Transport(e)
                })
            },
            &retry_config,
            "get_logs",
        )
        .await?;

        debug!(
            "Fetched {} transfer logs for blocks {}..={}",
            chunk.len(),
            start,
            end
        );
        if let Some(metrics) = metrics {
            metrics.logs_fetched.add(chunk.len() as u64, &[]);
        }
        logs.extend(chunk);

        if end == to_block {
            break;
        }
        start = end + 1;
    }

    Ok(logs)
}
