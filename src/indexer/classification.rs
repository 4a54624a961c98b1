use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::Address;
use alloy_provider::Provider;
use tokio::sync::{Mutex, OnceCell};
use tracing::debug;

use crate::contracts::ERC721_INTERFACE_ID;
use crate::indexer::rpc::contracts::{proxy_implementation, supports_interface};
use crate::metrics::Metrics;
use crate::models::datasets::transfers::ComplianceVerdict;

/// Classifies emitting contracts, remembering every verdict for its own
/// lifetime. One classifier instance spans one extraction run; nothing is
/// persisted across runs.
pub struct ComplianceClassifier<'a, P> {
    provider: &'a P,
    cache: Mutex<HashMap<Address, Arc<OnceCell<ComplianceVerdict>>>>,
}

impl<'a, P: Provider> ComplianceClassifier<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the verdict for `contract`, probing at most once per address.
    ///
    /// Concurrent callers asking about the same uncached address coalesce
    /// onto a single in-flight probe sequence and share its result; the
    /// cache lock itself is only held long enough to hand out the cell.
    pub async fn classify(
        &self,
        contract: Address,
        metrics: Option<&Metrics>,
    ) -> ComplianceVerdict {
        let cell = {
            let mut cache = self.cache.lock().await;
            match cache.get(&contract) {
                Some(cell) => {
                    if let Some(metrics) = metrics {
                        metrics.classification_cache_hits.add(1, &[]);
                    }
                    cell.clone()
                }
                None => {
                    let cell = Arc::new(OnceCell::new());
                    cache.insert(contract, cell.clone());
                    cell
                }
            }
        };

        *cell
            .get_or_init(|| self.probe_contract(contract, metrics))
            .await
    }

    async fn probe_contract(
        &self,
        contract: Address,
        metrics: Option<&Metrics>,
    ) -> ComplianceVerdict {
        let verdict = self.run_probes(contract, metrics).await;
        if let Some(metrics) = metrics {
            metrics.contracts_classified.add(1, &[]);
        }
        debug!("Classified {} as {:?}", contract, verdict);
        verdict
    }

    async fn run_probes(&self, contract: Address, metrics: Option<&Metrics>) -> ComplianceVerdict {
        // Tracks whether any probe gave a definitive "no". Without one the
        // contract is indeterminate rather than non-compliant.
        let mut definitive_false = false;

        match supports_interface(self.provider, contract, ERC721_INTERFACE_ID, metrics).await {
            Ok(true) => return ComplianceVerdict::DirectlyCompliant,
            Ok(false) => definitive_false = true,
            Err(e) => debug!("Interface probe on {} failed: {}", contract, e),
        }

        // The contract itself said no or could not answer. It may still be
        // a proxy fronting a compliant implementation.
        match proxy_implementation(self.provider, contract, metrics).await {
            Ok(implementation) => {
                match supports_interface(
                    self.provider,
                    implementation,
                    ERC721_INTERFACE_ID,
                    metrics,
                )
                .await
                {
                    Ok(true) => return ComplianceVerdict::CompliantViaProxy(implementation),
                    Ok(false) => definitive_false = true,
                    Err(e) => debug!(
                        "Interface probe on implementation {} failed: {}",
                        implementation, e
                    ),
                }
            }
            Err(e) => debug!("Proxy resolution on {} failed: {}", contract, e),
        }

        if definitive_false {
            ComplianceVerdict::NotCompliant
        } else {
            ComplianceVerdict::Indeterminate
        }
    }
}
