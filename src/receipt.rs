// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Transaction receipt probe.

use ethers::providers::{JsonRpcClient, Middleware, Provider};
use ethers::types::TxHash;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{ReconcileError, ReconcileResult};
use crate::types::TxReceiptSummary;

/// Fetches the receipt for `tx_hash` and reduces it to the fields needed to
/// locate the transaction's block. `None` means the node does not know the
/// transaction (or it is not yet in a block); transport failures propagate
/// unchanged.
pub async fn fetch_receipt_summary<P>(
    provider: &Provider<P>,
    tx_hash: TxHash,
    cancel: &CancellationToken,
) -> ReconcileResult<Option<TxReceiptSummary>>
where
    P: JsonRpcClient + 'static,
{
    let request = provider.get_transaction_receipt(tx_hash);
    let receipt = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(ReconcileError::Cancelled),
        result = request => result?,
    };

    let Some(receipt) = receipt else {
        return Ok(None);
    };
    let (Some(block_number), Some(block_hash)) = (receipt.block_number, receipt.block_hash) else {
        debug!("receipt for {tx_hash:?} has no block yet, treating as pending");
        return Ok(None);
    };

    Ok(Some(TxReceiptSummary {
        block_number: block_number.as_u64(),
        block_hash: format!("{block_hash:?}"),
        transaction_index: receipt.transaction_index.as_u64(),
        success: receipt.status.map_or(false, |status| status.as_u64() > 0),
    }))
}
