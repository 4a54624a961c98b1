use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, Bytes, FixedBytes};
use alloy_provider::Provider;
use alloy_rpc_types_eth::TransactionRequest;
use alloy_sol_types::SolCall;
use alloy_transport::TransportError;
use opentelemetry::KeyValue;
use tracing::debug;

use crate::contracts::{implementationCall, supportsInterfaceCall};
use crate::metrics::Metrics;
use crate::models::errors::CallFailure;

/// Probes ERC-165 `supportsInterface(interface_id)` on `contract`.
///
/// Single-shot by design: a revert or missing method is a signal about the
/// contract, not a transient fault, so there is nothing to retry.
pub async fn supports_interface<P: Provider>(
    provider: &P,
    contract: Address,
    interface_id: FixedBytes<4>,
    metrics: Option<&Metrics>,
) -> Result<bool, CallFailure> {
    let call = supportsInterfaceCall {
        interfaceId: interface_id,
    };
    let raw = eth_call(
        provider,
        contract,
        call.abi_encode().into(),
        "supports_interface",
        metrics,
    )
    .await?;
    let supported = supportsInterfaceCall::abi_decode_returns(&raw)?;
    Ok(supported)
}

/// Asks `contract` for its delegate via the conventional zero-argument
/// `implementation()` accessor. Contracts that are not proxies revert or
/// return garbage; both surface as `CallFailure` for the caller to fold.
pub async fn proxy_implementation<P: Provider>(
    provider: &P,
    contract: Address,
    metrics: Option<&Metrics>,
) -> Result<Address, CallFailure> {
    let raw = eth_call(
        provider,
        contract,
        implementationCall {}.abi_encode().into(),
        "proxy_implementation",
        metrics,
    )
    .await?;
    let implementation = implementationCall::abi_decode_returns(&raw)?;
    Ok(implementation)
}

async fn eth_call<P: Provider>(
    provider: &P,
    to: Address,
    calldata: Bytes,
    method: &'static str,
    metrics: Option<&Metrics>,
) -> Result<Bytes, CallFailure> {
    let start = std::time::Instant::now();

    if let Some(metrics) = metrics {
        metrics
            .rpc_requests
            .add(1, &[KeyValue::new("method", method)]);
    }

    let tx = TransactionRequest::default().with_to(to).with_input(calldata);
    let result = provider.call(tx).await;

    // Record metrics if enabled
    if let Some(metrics) = metrics {
        metrics.rpc_latency.record(
            start.elapsed().as_secs_f64(),
            &[KeyValue::new("method", method)],
        );
        if result.is_err() {
            metrics
                .rpc_errors
                .add(1, &[KeyValue::new("method", method)]);
        }
    }

    result.map_err(|e| {
        debug!("Call to {} on {} failed: {}", method, to, e);
        classify_call_error(e)
    })
}

fn classify_call_error(e: TransportError) -> CallFailure {
    // An error response from the node means the call itself was rejected
    // (revert, missing method). Anything else is a delivery problem.
    let rejection = e.as_error_resp().map(|resp| resp.message.to_string());
    match rejection {
        Some(reason) => CallFailure::Rejected { reason },
        None => CallFailure::Transport(e),
    }
}
