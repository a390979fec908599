// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Minimal block records and the result shape returned to callers.

use serde::{Deserialize, Serialize};

/// Minimal identity of a block: its height, its hash and the hash of its
/// parent. Hashes are `0x…` hex strings compared as opaque values.
///
/// Two adjacent entries `a, b` of any confirmation list or canonical view
/// satisfy `b.block_number == a.block_number + 1` and
/// `b.parent_hash == a.block_hash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinimalBlockInfo {
    pub block_number: u64,
    pub block_hash: String,
    pub parent_hash: String,
}

impl MinimalBlockInfo {
    /// Whether `child` directly extends this block (next height, chained
    /// parent hash).
    pub fn is_parent_of(&self, child: &MinimalBlockInfo) -> bool {
        child.block_number == self.block_number + 1 && child.parent_hash == self.block_hash
    }
}

/// Result of one reconcile call.
///
/// `confirmations[0]` is the transaction's block; positions `1..` are its
/// successors on the canonical chain. `confirmed` is set once the list
/// covers the tx block plus `target_confirmation_count` successors.
/// `new_fork` reports that the caller's previously stored list no longer
/// matches the chain. Callers are expected to overwrite their stored list
/// with the returned one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationUpdateResult {
    pub confirmations: Vec<MinimalBlockInfo>,
    pub new_fork: bool,
    pub confirmed: bool,
    pub target_confirmation_count: u64,
}

/// Minimal receipt view used to locate a transaction's block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceiptSummary {
    pub block_number: u64,
    pub block_hash: String,
    pub transaction_index: u64,
    pub success: bool,
}
