// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Transaction confirmation reconciliation for Ethereum connectors.
//!
//! Given a transaction hash and the caller's previously observed
//! confirmation blocks, [`ConfirmationReconciler`] decides whether the
//! transaction is still on the canonical chain, whether a reorganization
//! replaced any previously observed block, and whether the configured
//! confirmation depth has been reached. The canonical view is maintained by
//! a background block listener and consumed here as a shared snapshot; the
//! caller owns persistence of the returned confirmation list.

pub mod canonical;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod receipt;
pub mod reconciler;
pub mod types;
pub mod validator;

#[cfg(test)]
pub mod mock_provider;
#[cfg(test)]
pub mod test_utils;

pub use canonical::{CanonicalChain, ChainUpdate, SharedCanonicalChain};
pub use config::ReconcilerConfig;
pub use error::{ReconcileError, ReconcileResult};
pub use reconciler::ConfirmationReconciler;
pub use types::{ConfirmationUpdateResult, MinimalBlockInfo, TxReceiptSummary};
pub use validator::{validate_existing_confirmations, ExistingListError};
