#![allow(dead_code)]

use alloy_primitives::{Address, Bytes, FixedBytes, U256};
use alloy_rpc_types_eth::Log;
use alloy_sol_types::SolEvent;

use erc721_indexer::contracts::Transfer;

/// Builds a transfer log in the two-indexed-address shape: signature topic,
/// from topic, to topic, token id in the data payload.
pub fn transfer_log(
    contract: Address,
    from: Address,
    to: Address,
    payload: Vec<u8>,
    block_number: u64,
    log_index: u64,
) -> Log {
    log_with_topics(
        contract,
        vec![Transfer::SIGNATURE_HASH, from.into_word(), to.into_word()],
        payload,
        block_number,
        log_index,
    )
}

/// Builds a log with arbitrary topic words, for shapes the happy-path
/// builder above cannot express.
pub fn log_with_topics(
    contract: Address,
    topics: Vec<FixedBytes<32>>,
    payload: Vec<u8>,
    block_number: u64,
    log_index: u64,
) -> Log {
    Log {
        inner: alloy_primitives::Log {
            address: contract,
            data: alloy_primitives::LogData::new_unchecked(topics, payload.into()),
        },
        block_hash: Some(FixedBytes::repeat_byte(0xbb)),
        block_number: Some(block_number),
        block_timestamp: None,
        transaction_hash: Some(FixedBytes::repeat_byte(0xcc)),
        transaction_index: Some(0),
        log_index: Some(log_index),
        removed: false,
    }
}

/// ABI-encoded return word for a `bool`.
pub fn bool_word(value: bool) -> Bytes {
    let mut word = [0u8; 32];
    if value {
        word[31] = 1;
    }
    word.to_vec().into()
}

/// ABI-encoded return word for an `address`.
pub fn address_word(address: Address) -> Bytes {
    address.into_word().to_vec().into()
}

/// 32-byte big-endian token id payload.
pub fn token_payload(id: u64) -> Vec<u8> {
    U256::from(id).to_be_bytes::<32>().to_vec()
}
