// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

use ethers::providers::ProviderError;

use crate::validator::ExistingListError;

/// Classified errors surfaced by the reconciler. Each fatal outcome maps to
/// exactly one variant; an RPC transport failure is never reported as
/// "not found" and vice versa.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// The transaction is not known to the node: the receipt was null, or no
    /// block exists at the receipt's height.
    #[error("transaction {0} not found")]
    TxNotFound(String),

    /// The canonical chain view has no blocks yet (listener not started or
    /// not caught up).
    #[error("canonical chain view is empty; chain not ready")]
    ChainNotReady,

    /// The caller-supplied confirmation list is structurally invalid. The
    /// list is rejected, never repaired.
    #[error("invalid existing confirmations: {0}")]
    InvalidExistingConfirmations(ExistingListError),

    /// An RPC transport failure, propagated unchanged.
    #[error("RPC failure: {0}")]
    FetchFailure(#[from] ProviderError),

    /// The caller's cancellation token fired; no further RPCs were issued.
    #[error("operation cancelled")]
    Cancelled,
}

impl ReconcileError {
    /// Stable lowercase label identifying the error kind, suitable for
    /// metric label values.
    pub fn error_type(&self) -> &'static str {
        match self {
            ReconcileError::TxNotFound(_) => "tx_not_found",
            ReconcileError::ChainNotReady => "chain_not_ready",
            ReconcileError::InvalidExistingConfirmations(_) => "invalid_existing_confirmations",
            ReconcileError::FetchFailure(_) => "fetch_failure",
            ReconcileError::Cancelled => "cancelled",
        }
    }
}

pub type ReconcileResult<T> = Result<T, ReconcileError>;
