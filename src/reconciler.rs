// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Confirmation reconciliation.
//!
//! One reconcile call cross-checks three views of the chain: the caller's
//! previously stored confirmation list, the listener-maintained canonical
//! view, and fresh RPC data. The canonical view is authoritative inside its
//! covered range; freshly fetched data wins where the view lags; the
//! caller's list is only consulted to detect that its view went stale
//! (`new_fork`). Callers must serialize calls for the same transaction
//! hash; distinct hashes may reconcile concurrently.

use std::sync::Arc;

use ethers::providers::{Http, JsonRpcClient, Provider};
use ethers::types::TxHash;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::canonical::SharedCanonicalChain;
use crate::config::ReconcilerConfig;
use crate::error::{ReconcileError, ReconcileResult};
use crate::fetcher::BlockFetcher;
use crate::receipt::fetch_receipt_summary;
use crate::types::{ConfirmationUpdateResult, MinimalBlockInfo, TxReceiptSummary};
use crate::validator::{validate_existing_confirmations, ExistingListError};

pub struct ConfirmationReconciler<P> {
    chain_name: String,
    provider: Arc<Provider<P>>,
    fetcher: BlockFetcher<P>,
    canonical: SharedCanonicalChain,
}

impl ConfirmationReconciler<Http> {
    /// Connects to an HTTP JSON-RPC endpoint.
    pub fn connect(
        config: &ReconcilerConfig,
        url: &str,
        canonical: SharedCanonicalChain,
    ) -> anyhow::Result<Self> {
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        let provider = Arc::new(Provider::<Http>::try_from(url)?);
        Ok(Self::new(config, provider, canonical))
    }
}

impl<P> ConfirmationReconciler<P>
where
    P: JsonRpcClient + 'static,
{
    pub fn new(
        config: &ReconcilerConfig,
        provider: Arc<Provider<P>>,
        canonical: SharedCanonicalChain,
    ) -> Self {
        let fetcher = BlockFetcher::new(
            config.chain_name.clone(),
            provider.clone(),
            config.block_cache_size,
        );
        Self {
            chain_name: config.chain_name.clone(),
            provider,
            fetcher,
            canonical,
        }
    }

    /// Produces a fresh confirmation list for `tx_hash`, reporting whether
    /// the caller's stored list went stale (`new_fork`) and whether the
    /// target depth is reached (`confirmed`).
    ///
    /// `existing_confirmations` may be empty (no prior knowledge). The
    /// returned list always starts at the transaction's current block and
    /// replaces the caller's stored list wholesale.
    pub async fn reconcile_confirmations_for_transaction(
        &self,
        cancel: &CancellationToken,
        tx_hash: TxHash,
        existing_confirmations: &[MinimalBlockInfo],
        target_confirmation_count: u64,
    ) -> ReconcileResult<ConfirmationUpdateResult> {
        let target = target_confirmation_count;

        // Locate the tx block: receipt first, then a fresh fetch at the
        // receipt's height.
        let receipt = fetch_receipt_summary(&self.provider, tx_hash, cancel)
            .await?
            .ok_or_else(|| ReconcileError::TxNotFound(format!("{tx_hash:?}")))?;
        let tx_block = self.resolve_tx_block(&receipt, tx_hash, cancel).await?;

        // The caller's list must be structurally sound before it can be
        // compared. A broken parent link past the tx block is evidence the
        // caller observed a chain that no longer exists, not a structural
        // fault: it feeds `new_fork` instead of failing the call.
        let mut fork_evidence = false;
        if let Err(violation) = validate_existing_confirmations(existing_confirmations) {
            match violation {
                ExistingListError::BrokenParentLink { number } => {
                    debug!(
                        "[{}] existing confirmations diverge at block {number}, noting fork evidence",
                        self.chain_name
                    );
                    fork_evidence = true;
                }
                violation => {
                    return Err(ReconcileError::InvalidExistingConfirmations(violation));
                }
            }
        }

        // Copy the window we need out of the canonical view. The read lock
        // is released before any further RPC.
        let window = {
            let chain = self.canonical.read().await;
            if chain.is_empty() {
                return Err(ReconcileError::ChainNotReady);
            }
            chain.window(tx_block.block_number, (target as usize).saturating_add(1))
        };

        let Some(anchor) = window.first() else {
            // The listener has not observed this height, or it already fell
            // out of the view; the tx block alone is all we can vouch for.
            debug!(
                "[{}] tx block {} outside canonical view, returning it alone",
                self.chain_name, tx_block.block_number
            );
            return Ok(self.finalize(vec![tx_block], existing_confirmations, target, fork_evidence));
        };

        if anchor.block_hash != tx_block.block_hash {
            // The listener's view disagrees with freshly fetched data. Trust
            // the fresh fetch and let the listener catch up at its own pace;
            // keep the canonical successor only if it links to the fetched
            // block.
            warn!(
                "[{}] tx block {} disagrees with canonical view ({} vs {}), trusting fresh fetch",
                self.chain_name, tx_block.block_number, tx_block.block_hash, anchor.block_hash
            );
            let mut confirmations = vec![tx_block.clone()];
            if let Some(next) = window.get(1) {
                if tx_block.is_parent_of(next) {
                    confirmations.push(next.clone());
                }
            }
            return Ok(self.finalize(confirmations, existing_confirmations, target, fork_evidence));
        }

        // Canonical agrees with the fresh fetch: the snapshot window is the
        // new list, extended past the view if it ends short of the target.
        let mut confirmations = window;
        fork_evidence |= self.fill_gap(&mut confirmations, target, cancel).await?;
        Ok(self.finalize(confirmations, existing_confirmations, target, fork_evidence))
    }

    /// Fetches the block at the receipt's height. The freshly fetched block
    /// is the current tx block even when the receipt's hash lags behind it.
    async fn resolve_tx_block(
        &self,
        receipt: &TxReceiptSummary,
        tx_hash: TxHash,
        cancel: &CancellationToken,
    ) -> ReconcileResult<MinimalBlockInfo> {
        let fetched = self
            .fetcher
            .fetch(receipt.block_number, cancel)
            .await?
            .ok_or_else(|| ReconcileError::TxNotFound(format!("{tx_hash:?}")))?;
        if fetched.block_hash != receipt.block_hash {
            debug!(
                "[{}] receipt for {:?} lags the chain at block {}: receipt {}, fetched {}",
                self.chain_name,
                tx_hash,
                receipt.block_number,
                receipt.block_hash,
                fetched.block_hash
            );
        }
        Ok(fetched)
    }

    /// Extends `confirmations` one block at a time until the target depth is
    /// reached or the node runs out of blocks. Returns `true` when a fetched
    /// block no longer extends the tail (the chain moved mid-call).
    async fn fill_gap(
        &self,
        confirmations: &mut Vec<MinimalBlockInfo>,
        target: u64,
        cancel: &CancellationToken,
    ) -> ReconcileResult<bool> {
        let needed = (target as usize).saturating_add(1);
        while confirmations.len() < needed {
            let Some(tail) = confirmations.last() else {
                break;
            };
            let next_number = tail.block_number + 1;
            let Some(block) = self.fetcher.fetch(next_number, cancel).await? else {
                debug!(
                    "[{}] gap fill stopped at block {next_number}: not available yet",
                    self.chain_name
                );
                return Ok(false);
            };
            if !tail.is_parent_of(&block) {
                warn!(
                    "[{}] gap fill stopped at block {next_number}: does not extend the tail, chain is moving",
                    self.chain_name
                );
                return Ok(true);
            }
            confirmations.push(block);
        }
        Ok(false)
    }

    fn finalize(
        &self,
        mut confirmations: Vec<MinimalBlockInfo>,
        existing: &[MinimalBlockInfo],
        target: u64,
        fork_evidence: bool,
    ) -> ConfirmationUpdateResult {
        if target == 0 {
            confirmations.truncate(1);
        }
        let confirmed = confirmations.len() as u64 >= target + 1;
        let new_fork = fork_evidence || diverges_from(existing, &confirmations);
        ConfirmationUpdateResult {
            confirmations,
            new_fork,
            confirmed,
            target_confirmation_count: target,
        }
    }
}

/// Whether any returned entry differs from the caller's entry at the same
/// height. Caller entries at heights the returned list does not reach are
/// discarded, not compared.
fn diverges_from(existing: &[MinimalBlockInfo], returned: &[MinimalBlockInfo]) -> bool {
    returned.iter().any(|block| {
        existing
            .iter()
            .any(|prior| prior.block_number == block.block_number && prior != block)
    })
}
