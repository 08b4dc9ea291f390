// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    EmptySelection,
    MissingTarget,
    InvalidAmount,
    EmptyUpdate,
    InvalidGrowthRate,
    DateOutOfRange,
}

/// Validation failures raised before any record is touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("Filter matched no records; nothing to {operation}")]
    EmptySelection { operation: &'static str },
    #[error("Target scenario is blank")]
    MissingTarget,
    #[error("Invalid amount {amount}: {reason}")]
    InvalidAmount { amount: String, reason: &'static str },
    #[error("Update changes nothing; give a value adjustment, scenario or date")]
    EmptyUpdate,
    #[error("Invalid growth rate {0}; must be a finite number >= -1")]
    InvalidGrowthRate(f64),
    #[error("Forecast date out of range ({months} months after {anchor})")]
    DateOutOfRange { anchor: String, months: u64 },
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::EmptySelection { .. } => ErrorKind::EmptySelection,
            EngineError::MissingTarget => ErrorKind::MissingTarget,
            EngineError::InvalidAmount { .. } => ErrorKind::InvalidAmount,
            EngineError::EmptyUpdate => ErrorKind::EmptyUpdate,
            EngineError::InvalidGrowthRate(_) => ErrorKind::InvalidGrowthRate,
            EngineError::DateOutOfRange { .. } => ErrorKind::DateOutOfRange,
        }
    }

    pub(crate) fn invalid_amount(amount: impl ToString, reason: &'static str) -> Self {
        EngineError::InvalidAmount {
            amount: amount.to_string(),
            reason,
        }
    }
}
