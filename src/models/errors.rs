use alloy_transport::TransportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid block range: from_block {from_block} is greater than to_block {to_block}")]
    InvalidRange { from_block: u64, to_block: u64 },
    #[error("Log fetch failed after retries: {0}")]
    Transport(#[from] TransportError),
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Malformed transfer event: {reason}")]
    MalformedEvent { reason: String },
}

/// Failure of a single read-only contract call. Never propagated out of
/// classification; the classifier folds these into the verdict.
#[derive(Error, Debug)]
pub enum CallFailure {
    #[error("Call rejected by node: {reason}")]
    Rejected { reason: String },
    #[error("Call transport failure: {0}")]
    Transport(#[source] TransportError),
    #[error("Call returned undecodable data: {0}")]
    InvalidReturn(#[from] alloy_sol_types::Error),
}
