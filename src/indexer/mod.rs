pub mod classification;
pub mod rpc;
pub mod transformations;

use alloy_primitives::Address;
use alloy_provider::Provider;
use anyhow::{anyhow, Result};
use futures::stream::{self, StreamExt};
use opentelemetry::KeyValue;
use std::collections::HashSet;
use tracing::{info, warn};

use crate::indexer::classification::ComplianceClassifier;
use crate::indexer::rpc::logs::fetch_transfer_logs;
use crate::indexer::transformations::transfers::TransferDecoder;
use crate::metrics::Metrics;
use crate::models::datasets::transfers::FilteredTransfer;
use crate::models::errors::FetchError;
use crate::utils::retry::{retry, RetryConfig};

pub async fn get_latest_block_number<P: Provider>(
    provider: &P,
    metrics: Option<&Metrics>,
) -> Result<u64> {
    let retry_config = RetryConfig::default();
    retry(
        || async {
            let start = std::time::Instant::now();

            if let Some(metrics) = metrics {
                metrics.rpc_requests.add(
                    1,
                    &[KeyValue::new("method", "get_latest_block_number")],
                );
            }

            let result = provider.get_block_number().await;

            // Record metrics if enabled
            if let Some(metrics) = metrics {
                metrics.rpc_latency.record(
                    start.elapsed().as_secs_f64(),
                    &[KeyValue::new("method", "get_latest_block_number")],
                );
                if result.is_err() {
                    metrics
                        .rpc_errors
                        .add(1, &[KeyValue::new("method", "get_latest_block_number")]);
                }
            }

            result.map_err(|e| {
                warn!("Failed to get latest block number. Error details:\n{:#?}", e);
                anyhow!("RPC error: {}", e)
            })
        },
        &retry_config,
        "get_latest_block_number",
    )
    .await
}

/// Runs the full extraction over the inclusive `from_block..=to_block`
/// range: fetch transfer logs, decode them, classify each distinct emitting
/// contract, and keep the events whose contract passed.
///
/// Malformed log entries are skipped, classification failures surface only
/// as non-compliant verdicts, and a quiet range is an empty `Ok`. The one
/// fatal failure is the fetch itself, either range validation or the node
/// staying unreachable through every retry.
pub async fn process_range<P: Provider>(
    provider: &P,
    from_block: u64,
    to_block: u64,
    chunk_size: u64,
    classify_concurrency: usize,
    metrics: Option<&Metrics>,
) -> Result<Vec<FilteredTransfer>, FetchError> {
    let logs = fetch_transfer_logs(provider, from_block, to_block, chunk_size, metrics).await?;
    info!(
        "Fetched {} transfer logs for blocks {}..={}",
        logs.len(),
        from_block,
        to_block
    );

    // Decode each entry, dropping malformed ones
    let mut events = Vec::with_capacity(logs.len());
    for log in &logs {
        match log.decode_transfer() {
            Ok(event) => events.push(event),
            Err(e) => {
                warn!("Skipping malformed log entry: {}", e);
                if let Some(metrics) = metrics {
                    metrics.malformed_events.add(1, &[]);
                }
            }
        }
    }
    let decoded = events.len();
    if let Some(metrics) = metrics {
        metrics.transfers_decoded.add(decoded as u64, &[]);
    }

    // Distinct emitting contracts in first-appearance order
    let mut seen = HashSet::new();
    let contracts: Vec<Address> = events
        .iter()
        .map(|event| event.address)
        .filter(|address| seen.insert(*address))
        .collect();
    info!(
        "Classifying {} distinct contracts across {} events",
        contracts.len(),
        decoded
    );

    // Warm the verdict cache with bounded fan-out. Every verdict after this
    // point is a cache hit, so emission below stays in original log order.
    let classifier = ComplianceClassifier::new(provider);
    stream::iter(contracts)
        .for_each_concurrent(Some(classify_concurrency.max(1)), |contract| {
            let classifier = &classifier;
            async move {
                classifier.classify(contract, metrics).await;
            }
        })
        .await;

    // Emit compliant transfers
    let mut filtered = Vec::new();
    for event in events {
        let verdict = classifier.classify(event.address, metrics).await;
        if verdict.is_compliant() {
            filtered.push(FilteredTransfer { event, verdict });
        }
    }

    info!(
        "{} of {} transfer events came from compliant contracts",
        filtered.len(),
        decoded
    );

    Ok(filtered)
}
