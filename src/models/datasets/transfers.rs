use alloy_primitives::{Address, FixedBytes, U256};
use serde::Serialize;

///////////////////////////////////// Decoded Data /////////////////////////////////////
// One decoded transfer, positioned within its block. All positional fields
// are required: logs fetched from a confirmed range always carry them, and
// the decoder rejects pending-style entries that do not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferEvent {
    pub address: Address,
    pub from_address: Address,
    pub to_address: Address,
    pub token_id: U256,
    pub block_number: u64,
    pub block_hash: FixedBytes<32>,
    pub tx_hash: FixedBytes<32>,
    pub tx_index: u64,
    pub log_index: u64,
}

//////////////////////////////////// Classification ////////////////////////////////////
// Per-contract probe outcome, computed at most once per run for each
// distinct emitting address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComplianceVerdict {
    DirectlyCompliant,
    CompliantViaProxy(Address),
    NotCompliant,
    // No probe on any path produced a definitive answer
    Indeterminate,
}

impl ComplianceVerdict {
    pub fn is_compliant(&self) -> bool {
        matches!(self, Self::DirectlyCompliant | Self::CompliantViaProxy(_))
    }
}

/////////////////////////////////// Filtered Output ////////////////////////////////////
// Terminal pipeline unit: a transfer whose emitting contract passed
// classification, paired with how it passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilteredTransfer {
    pub event: TransferEvent,
    pub verdict: ComplianceVerdict,
}
