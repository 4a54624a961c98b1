use alloy_primitives::{Address, U256};
use alloy_rpc_types_eth::Log;

use crate::models::datasets::transfers::TransferEvent;
use crate::models::errors::DecodeError;

pub trait TransferDecoder {
    fn decode_transfer(&self) -> Result<TransferEvent, DecodeError>;
}

impl TransferDecoder for Log {
    /// Decodes one raw transfer log into a `TransferEvent`.
    ///
    /// Accepts both emission shapes seen on chain: two indexed addresses
    /// with the token id in the data payload, and the fully indexed
    /// three-argument form. Either way the entry must carry the signature
    /// topic plus both address topics, so anything under 3 (or over the
    /// EVM's cap of 4) topic slots is malformed. The token id is read from
    /// the data payload as a big-endian unsigned integer: an empty payload
    /// is id 0, a short payload gains implicit leading zeros, and a payload
    /// past 32 bytes cannot be a uint256 and is rejected.
    fn decode_transfer(&self) -> Result<TransferEvent, DecodeError> {
        let topics = self.inner.data.topics();
        if !(3..=4).contains(&topics.len()) {
            return Err(DecodeError::MalformedEvent {
                reason: format!("expected 3 or 4 topics, got {}", topics.len()),
            });
        }

        let payload = &self.inner.data.data;
        if payload.len() > 32 {
            return Err(DecodeError::MalformedEvent {
                reason: format!("token id payload is {} bytes, max 32", payload.len()),
            });
        }
        let token_id = U256::from_be_slice(payload);

        Ok(TransferEvent {
            address: self.inner.address,
            from_address: Address::from_word(topics[1]),
            to_address: Address::from_word(topics[2]),
            token_id,
            block_number: self.block_number.ok_or_else(|| missing("block_number"))?,
            block_hash: self.block_hash.ok_or_else(|| missing("block_hash"))?,
            tx_hash: self
                .transaction_hash
                .ok_or_else(|| missing("transaction_hash"))?,
            tx_index: self
                .transaction_index
                .ok_or_else(|| missing("transaction_index"))?,
            log_index: self.log_index.ok_or_else(|| missing("log_index"))?,
        })
    }
}

fn missing(field: &str) -> DecodeError {
    DecodeError::MalformedEvent {
        reason: format!("missing {field} on log entry"),
    }
}
