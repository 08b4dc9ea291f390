// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Two-phase preview/execute protocol over a borrowed record snapshot.

use crate::error::EngineError;
use crate::filter::matches;
use crate::models::{BatchOperation, BatchOutcome, FilterSpec, Preview, ValueRecord};
use crate::operations;
use rust_decimal::Decimal;
use uuid::Uuid;

/// What `execute` would touch for this filter, with the summed value.
pub fn preview(records: &[ValueRecord], filter: &FilterSpec) -> Preview {
    let affected = matches(records, filter);
    let total = affected
        .iter()
        .try_fold(Decimal::ZERO, |acc, r| acc.checked_add(r.value));
    Preview {
        affected_count: affected.len(),
        affected_total_value: total,
        affected_records: affected,
    }
}

/// Recomputes the affected set from `records` and applies `op` to it.
///
/// Copies get random UUID v4 ids. Re-running an `Update` with `Set` gives the
/// same values; `Add`, `Multiply` and `Copy` compound on every run.
pub fn execute(
    records: &[ValueRecord],
    filter: &FilterSpec,
    op: &BatchOperation,
) -> Result<BatchOutcome, EngineError> {
    execute_with_ids(records, filter, op, || Uuid::new_v4().to_string())
}

/// `execute` with a caller-supplied id source for copied records.
pub fn execute_with_ids<F>(
    records: &[ValueRecord],
    filter: &FilterSpec,
    op: &BatchOperation,
    next_id: F,
) -> Result<BatchOutcome, EngineError>
where
    F: FnMut() -> String,
{
    let affected = matches(records, filter);
    operations::apply(&affected, records, op, next_id)
}
