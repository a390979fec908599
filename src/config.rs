// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Reconciler configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the confirmation reconciler and its collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Chain identifier used as the log prefix.
    #[serde(default = "default_chain_name")]
    pub chain_name: String,

    /// Capacity of the LRU block cache in front of `eth_getBlockByNumber`.
    #[serde(default = "default_block_cache_size")]
    pub block_cache_size: usize,

    /// Maximum number of blocks retained in the canonical chain view.
    /// Sized at twice the 64-block ETH finality window by default.
    #[serde(default = "default_canonical_capacity")]
    pub canonical_capacity: usize,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            chain_name: default_chain_name(),
            block_cache_size: default_block_cache_size(),
            canonical_capacity: default_canonical_capacity(),
        }
    }
}

fn default_chain_name() -> String {
    "eth".to_string()
}

fn default_block_cache_size() -> usize {
    100
}

fn default_canonical_capacity() -> usize {
    128
}

impl ReconcilerConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.block_cache_size == 0 {
            return Err("block_cache_size must be non-zero".to_string());
        }
        if self.canonical_capacity == 0 {
            return Err("canonical_capacity must be non-zero".to_string());
        }
        Ok(())
    }
}
