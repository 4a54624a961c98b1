use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::models::datasets::transfers::FilteredTransfer;

const CSV_HEADER: [&str; 10] = [
    "index",
    "address",
    "blockHash",
    "blockNumber",
    "from_address",
    "to_address",
    "token_id",
    "logIndex",
    "transactionHash",
    "transactionIndex",
];

/// Writes the filtered transfers to `path` as CSV, replacing any existing
/// file. Addresses are EIP-55 checksummed, hashes 0x-prefixed hex, and
/// numbers decimal; `index` is the 0-based row number.
pub fn write_transfers<P: AsRef<Path>>(path: P, transfers: &[FilteredTransfer]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    writer
        .write_record(CSV_HEADER)
        .context("failed to write CSV header")?;

    for (index, transfer) in transfers.iter().enumerate() {
        let event = &transfer.event;
        writer
            .write_record([
                index.to_string(),
                event.address.to_string(),
                event.block_hash.to_string(),
                event.block_number.to_string(),
                event.from_address.to_string(),
                event.to_address.to_string(),
                event.token_id.to_string(),
                event.log_index.to_string(),
                event.tx_hash.to_string(),
                event.tx_index.to_string(),
            ])
            .context("failed to write CSV record")?;
    }

    writer.flush().context("failed to flush CSV output")?;
    info!(
        "Wrote {} transfer rows to {}",
        transfers.len(),
        path.display()
    );
    Ok(())
}
