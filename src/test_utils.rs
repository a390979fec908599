// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Deterministic builders shared across test modules.

use ethers::types::{Block, TransactionReceipt, TxHash, H256, U64};

use crate::canonical::CanonicalChain;
use crate::mock_provider::EthMockProvider;
use crate::types::MinimalBlockInfo;

/// Predictable 32-byte hash for a numeric seed, formatted the way RPC
/// hashes render (`0x` + 64 hex digits).
pub fn test_hash(seed: u64) -> String {
    format!("{:?}", H256::from_low_u64_be(seed))
}

/// Block record at `number` whose hashes follow the `test_hash` scheme.
pub fn test_block(number: u64) -> MinimalBlockInfo {
    MinimalBlockInfo {
        block_number: number,
        block_hash: test_hash(number),
        parent_hash: test_hash(number - 1),
    }
}

/// Canonical view covering `start..=end` with `test_hash`-linked entries.
pub fn test_chain(start: u64, end: u64) -> CanonicalChain {
    let mut chain = CanonicalChain::new("eth-test", (end - start + 1) as usize);
    for number in start..=end {
        chain.add_block(test_block(number));
    }
    chain
}

/// Registers `eth_getBlockByNumber(number, false)` returning the
/// `test_hash`-linked block.
pub fn mock_block(provider: &EthMockProvider, number: u64) {
    mock_block_with_hashes(
        provider,
        number,
        H256::from_low_u64_be(number),
        H256::from_low_u64_be(number - 1),
    );
}

/// Registers `eth_getBlockByNumber(number, false)` with explicit hashes.
pub fn mock_block_with_hashes(provider: &EthMockProvider, number: u64, hash: H256, parent: H256) {
    provider
        .add_response(
            "eth_getBlockByNumber",
            (U64::from(number), false),
            Block::<TxHash> {
                number: Some(U64::from(number)),
                hash: Some(hash),
                parent_hash: parent,
                ..Default::default()
            },
        )
        .unwrap();
}

/// Registers `eth_getBlockByNumber(number, false)` returning null.
pub fn mock_block_missing(provider: &EthMockProvider, number: u64) {
    provider
        .add_response(
            "eth_getBlockByNumber",
            (U64::from(number), false),
            serde_json::Value::Null,
        )
        .unwrap();
}

/// Registers a successful receipt placing `tx_hash` in the
/// `test_hash`-linked block at `block_number`.
pub fn mock_receipt(provider: &EthMockProvider, tx_hash: TxHash, block_number: u64) {
    provider
        .add_response(
            "eth_getTransactionReceipt",
            [tx_hash],
            TransactionReceipt {
                transaction_hash: tx_hash,
                transaction_index: U64::from(0),
                block_number: Some(U64::from(block_number)),
                block_hash: Some(H256::from_low_u64_be(block_number)),
                status: Some(U64::from(1)),
                ..Default::default()
            },
        )
        .unwrap();
}

/// Registers `eth_getTransactionReceipt` returning null.
pub fn mock_receipt_missing(provider: &EthMockProvider, tx_hash: TxHash) {
    provider
        .add_response(
            "eth_getTransactionReceipt",
            [tx_hash],
            serde_json::Value::Null,
        )
        .unwrap();
}
