// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Consistency checks for caller-supplied confirmation lists.

use crate::types::MinimalBlockInfo;

/// A violation found while walking a confirmation list in order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExistingListError {
    /// Block numbers must increase by exactly one.
    #[error("gap in confirmation list: block {next} follows block {prev}")]
    Gap { prev: u64, next: u64 },

    /// Block numbers must be strictly increasing.
    #[error("non-monotonic confirmation list: block {next} follows block {prev}")]
    NonMonotonic { prev: u64, next: u64 },

    /// Each entry's parent hash must equal the previous entry's block hash.
    #[error("broken parent link at block {number}")]
    BrokenParentLink { number: u64 },
}

/// Validates a caller's confirmation list: contiguous, strictly increasing
/// block numbers and chained parent hashes. Empty and single-element lists
/// are valid (no prior knowledge).
///
/// Number-structure violations take precedence over parent-link breaks, so
/// a caller that only needs structural soundness can classify on the
/// returned variant.
pub fn validate_existing_confirmations(
    list: &[MinimalBlockInfo],
) -> Result<(), ExistingListError> {
    for pair in list.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.block_number <= prev.block_number {
            return Err(ExistingListError::NonMonotonic {
                prev: prev.block_number,
                next: next.block_number,
            });
        }
        if next.block_number != prev.block_number + 1 {
            return Err(ExistingListError::Gap {
                prev: prev.block_number,
                next: next.block_number,
            });
        }
    }
    for pair in list.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.parent_hash != prev.block_hash {
            return Err(ExistingListError::BrokenParentLink {
                number: next.block_number,
            });
        }
    }
    Ok(())
}
