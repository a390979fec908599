// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Canonical chain view shared between the block listener and the
//! reconciler.
//!
//! The view is a bounded, contiguous run of recent blocks: adjacent entries
//! always satisfy the parent-hash chain rule. The listener appends at the
//! tip (rewinding the conflicting suffix on a reorg); readers take cheap
//! window copies so no lock is ever held across an RPC.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::ReconcilerConfig;
use crate::types::MinimalBlockInfo;

/// Outcome of feeding one block into the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainUpdate {
    /// The block extended the tip.
    Extended,
    /// The block replaced part of the tracked suffix; `orphaned` entries
    /// were dropped.
    Rewound { orphaned: usize },
    /// The view could not be reconciled with the block and restarted from
    /// it alone.
    Reset,
}

/// Thread-safe handle shared between the listener (writer) and reconciler
/// calls (readers).
pub type SharedCanonicalChain = Arc<RwLock<CanonicalChain>>;

pub struct CanonicalChain {
    chain_name: String,
    blocks: VecDeque<MinimalBlockInfo>,
    capacity: usize,
}

impl CanonicalChain {
    pub fn new(chain_name: impl Into<String>, capacity: usize) -> Self {
        Self {
            chain_name: chain_name.into(),
            blocks: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn from_config(config: &ReconcilerConfig) -> Self {
        Self::new(config.chain_name.clone(), config.canonical_capacity)
    }

    /// Wraps the view in the shared handle handed to the listener and the
    /// reconciler.
    pub fn shared(self) -> SharedCanonicalChain {
        Arc::new(RwLock::new(self))
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn first_block(&self) -> Option<&MinimalBlockInfo> {
        self.blocks.front()
    }

    pub fn last_block(&self) -> Option<&MinimalBlockInfo> {
        self.blocks.back()
    }

    /// Covered height range, `None` when the view is empty.
    pub fn range(&self) -> Option<(u64, u64)> {
        let first = self.blocks.front()?.block_number;
        let last = self.blocks.back()?.block_number;
        Some((first, last))
    }

    fn offset_of(&self, number: u64) -> Option<usize> {
        let first = self.blocks.front()?.block_number;
        if number < first {
            return None;
        }
        let offset = (number - first) as usize;
        (offset < self.blocks.len()).then_some(offset)
    }

    pub fn get_by_number(&self, number: u64) -> Option<&MinimalBlockInfo> {
        self.offset_of(number).map(|i| &self.blocks[i])
    }

    /// Copies up to `max` entries starting exactly at height `from`.
    /// Returns an empty vector when `from` is outside the view.
    pub fn window(&self, from: u64, max: usize) -> Vec<MinimalBlockInfo> {
        match self.offset_of(from) {
            Some(offset) => self.blocks.iter().skip(offset).take(max).cloned().collect(),
            None => Vec::new(),
        }
    }

    /// Feeds one observed block into the view.
    ///
    /// A block that parent-links to the tip extends it. A block at or below
    /// the tip drops the suffix from its height first; if the remaining tail
    /// is not its parent the whole view restarts from the block, since
    /// nothing below can be trusted without re-observation. A gap above the
    /// tip also restarts the view.
    pub fn add_block(&mut self, block: MinimalBlockInfo) -> ChainUpdate {
        let Some(last) = self.blocks.back() else {
            debug!(
                "[{}] canonical view starting at block {}",
                self.chain_name, block.block_number
            );
            self.blocks.push_back(block);
            return ChainUpdate::Extended;
        };

        if block.block_number > last.block_number + 1 {
            warn!(
                "[{}] gap above tip ({} -> {}), resetting canonical view",
                self.chain_name, last.block_number, block.block_number
            );
            self.blocks.clear();
            self.blocks.push_back(block);
            return ChainUpdate::Reset;
        }

        let mut orphaned = 0usize;
        while self
            .blocks
            .back()
            .map_or(false, |b| b.block_number >= block.block_number)
        {
            self.blocks.pop_back();
            orphaned += 1;
        }

        // The remaining tail is exactly one height below the block; if its
        // hash is not the block's parent, the predecessor itself was
        // replaced and the rest of the view is unusable.
        let tail_replaced = self
            .blocks
            .back()
            .map_or(false, |tail| tail.block_hash != block.parent_hash);
        if tail_replaced {
            orphaned += self.blocks.len();
            self.blocks.clear();
        }

        let emptied = self.blocks.is_empty();
        self.blocks.push_back(block);
        self.prune_to_capacity();

        match orphaned {
            0 => ChainUpdate::Extended,
            n if emptied => {
                warn!(
                    "[{}] canonical view reset at block {} ({} entries dropped)",
                    self.chain_name,
                    self.blocks.back().map(|b| b.block_number).unwrap_or(0),
                    n
                );
                ChainUpdate::Reset
            }
            n => {
                info!(
                    "[{}] canonical view rewound, {} entries replaced from block {}",
                    self.chain_name,
                    n,
                    self.blocks.back().map(|b| b.block_number).unwrap_or(0)
                );
                ChainUpdate::Rewound { orphaned: n }
            }
        }
    }

    fn prune_to_capacity(&mut self) {
        while self.blocks.len() > self.capacity {
            self.blocks.pop_front();
        }
    }
}
