// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Block fetching with an LRU cache in front of the JSON-RPC endpoint.

use std::num::NonZeroUsize;
use std::sync::Arc;

use ethers::providers::{JsonRpcClient, Provider, ProviderError};
use ethers::types::{Block, TxHash, U64};
use lru::LruCache;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{ReconcileError, ReconcileResult};
use crate::types::MinimalBlockInfo;

/// Fetches minimal block records by number, serving repeated lookups from a
/// bounded cache. The cache is advisory: only positive results are stored,
/// and callers decide what is authoritative.
pub struct BlockFetcher<P> {
    chain_name: String,
    provider: Arc<Provider<P>>,
    cache: Mutex<LruCache<u64, MinimalBlockInfo>>,
}

impl<P> BlockFetcher<P>
where
    P: JsonRpcClient + 'static,
{
    pub fn new(chain_name: impl Into<String>, provider: Arc<Provider<P>>, cache_size: usize) -> Self {
        let capacity = NonZeroUsize::new(cache_size.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            chain_name: chain_name.into(),
            provider,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Returns the block at `number`, or `None` when the node has no block
    /// at that height. Transport failures propagate unchanged.
    pub async fn fetch(
        &self,
        number: u64,
        cancel: &CancellationToken,
    ) -> ReconcileResult<Option<MinimalBlockInfo>> {
        if let Some(hit) = self.cache.lock().await.get(&number) {
            return Ok(Some(hit.clone()));
        }

        let request = self
            .provider
            .request::<_, Option<Block<TxHash>>>("eth_getBlockByNumber", (U64::from(number), false));
        let block = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ReconcileError::Cancelled),
            result = request => result?,
        };

        let Some(block) = block else {
            debug!(
                "[{}] block {} not present on the node",
                self.chain_name, number
            );
            return Ok(None);
        };

        let info = minimal_from_rpc_block(number, &block)?;
        self.cache.lock().await.put(number, info.clone());
        Ok(Some(info))
    }
}

fn minimal_from_rpc_block(requested: u64, block: &Block<TxHash>) -> ReconcileResult<MinimalBlockInfo> {
    let number = block
        .number
        .ok_or_else(|| ProviderError::CustomError("block response has no number".to_string()))?
        .as_u64();
    let hash = block
        .hash
        .ok_or_else(|| ProviderError::CustomError("block response has no hash".to_string()))?;
    if number != requested {
        return Err(ProviderError::CustomError(format!(
            "requested block {requested} but node returned block {number}"
        ))
        .into());
    }
    Ok(MinimalBlockInfo {
        block_number: number,
        block_hash: format!("{hash:?}"),
        parent_hash: format!("{:?}", block.parent_hash),
    })
}
