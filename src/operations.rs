// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The three batch strategies. Each one reads the caller's snapshot and
//! builds a fresh `Vec`; nothing here mutates its inputs.

use crate::error::EngineError;
use crate::models::{BatchOperation, BatchOutcome, CopyTarget, UpdateSpec, ValueAdjustment, ValueRecord};
use rust_decimal::Decimal;
use std::collections::HashSet;

/// An adjustment whose amount already passed the finiteness check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum CheckedAdjustment {
    Set(Decimal),
    Multiply(Decimal),
    Add(Decimal),
}

impl CheckedAdjustment {
    pub(crate) fn check(adj: &ValueAdjustment) -> Result<Self, EngineError> {
        let raw = adj.amount();
        if !raw.is_finite() {
            return Err(EngineError::invalid_amount(raw, "amount must be a finite number"));
        }
        // Display gives the shortest text that round-trips, so 1.1 stays 1.1.
        let amount = raw
            .to_string()
            .parse::<Decimal>()
            .map_err(|_| EngineError::invalid_amount(raw, "amount is outside the decimal range"))?;
        Ok(match adj {
            ValueAdjustment::Set(_) => CheckedAdjustment::Set(amount),
            ValueAdjustment::Multiply(_) => CheckedAdjustment::Multiply(amount),
            ValueAdjustment::Add(_) => CheckedAdjustment::Add(amount),
        })
    }

    pub(crate) fn adjust(&self, value: Decimal) -> Result<Decimal, EngineError> {
        match *self {
            CheckedAdjustment::Set(a) => Ok(a),
            CheckedAdjustment::Multiply(f) => value
                .checked_mul(f)
                .ok_or_else(|| EngineError::invalid_amount(f, "multiplication overflows")),
            CheckedAdjustment::Add(a) => value
                .checked_add(a)
                .ok_or_else(|| EngineError::invalid_amount(a, "addition overflows")),
        }
    }
}

fn check_optional(adj: &Option<ValueAdjustment>) -> Result<Option<CheckedAdjustment>, EngineError> {
    adj.as_ref().map(CheckedAdjustment::check).transpose()
}

/// Checks operation parameters, then the selection size. Fails on the first
/// problem found.
pub fn validate(op: &BatchOperation, affected: usize) -> Result<(), EngineError> {
    match op {
        BatchOperation::Update(spec) => {
            if spec.is_noop() {
                return Err(EngineError::EmptyUpdate);
            }
            if spec.scenario_id.as_deref().is_some_and(|s| s.trim().is_empty()) {
                return Err(EngineError::MissingTarget);
            }
            check_optional(&spec.adjustment)?;
        }
        BatchOperation::Delete => {}
        BatchOperation::Copy(target) => {
            if target.scenario_id.trim().is_empty() {
                return Err(EngineError::MissingTarget);
            }
            check_optional(&target.adjustment)?;
        }
    }
    if affected == 0 {
        return Err(EngineError::EmptySelection {
            operation: op.label(),
        });
    }
    Ok(())
}

/// Applies `op` to the records of `all` whose id appears in `affected`.
///
/// `next_id` is only called by `Copy`, once per copied record.
pub fn apply<F>(
    affected: &[ValueRecord],
    all: &[ValueRecord],
    op: &BatchOperation,
    next_id: F,
) -> Result<BatchOutcome, EngineError>
where
    F: FnMut() -> String,
{
    validate(op, affected.len())?;
    match op {
        BatchOperation::Update(spec) => update(affected, all, spec),
        BatchOperation::Delete => Ok(delete(affected, all)),
        BatchOperation::Copy(target) => copy(affected, all, target, next_id),
    }
}

fn id_set(records: &[ValueRecord]) -> HashSet<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

fn update(affected: &[ValueRecord], all: &[ValueRecord], spec: &UpdateSpec) -> Result<BatchOutcome, EngineError> {
    let adj = check_optional(&spec.adjustment)?;
    let ids = id_set(affected);
    let mut touched = 0;
    let mut out = Vec::with_capacity(all.len());
    for r in all {
        if !ids.contains(r.id.as_str()) {
            out.push(r.clone());
            continue;
        }
        let mut next = r.clone();
        if let Some(adj) = &adj {
            next.value = adj.adjust(r.value)?;
        }
        if let Some(scenario) = &spec.scenario_id {
            next.scenario_id = scenario.trim().to_string();
        }
        if let Some(at) = spec.recorded_at {
            next.recorded_at = at;
        }
        touched += 1;
        out.push(next);
    }
    Ok(BatchOutcome {
        records: out,
        affected: touched,
        created: Vec::new(),
    })
}

fn delete(affected: &[ValueRecord], all: &[ValueRecord]) -> BatchOutcome {
    let ids = id_set(affected);
    let records: Vec<ValueRecord> = all
        .iter()
        .filter(|r| !ids.contains(r.id.as_str()))
        .cloned()
        .collect();
    BatchOutcome {
        affected: all.len() - records.len(),
        records,
        created: Vec::new(),
    }
}

// Copies keep the source timestamp.
fn copy<F>(
    affected: &[ValueRecord],
    all: &[ValueRecord],
    target: &CopyTarget,
    mut next_id: F,
) -> Result<BatchOutcome, EngineError>
where
    F: FnMut() -> String,
{
    let adj = check_optional(&target.adjustment)?;
    let scenario = target.scenario_id.trim();
    let mut copies = Vec::with_capacity(affected.len());
    for r in affected {
        let value = match &adj {
            Some(adj) => adj.adjust(r.value)?,
            None => r.value,
        };
        copies.push(ValueRecord {
            id: String::new(),
            scenario_id: scenario.to_string(),
            value,
            ..r.clone()
        });
    }
    let mut created = Vec::with_capacity(copies.len());
    for c in copies.iter_mut() {
        c.id = next_id();
        created.push(c.id.clone());
    }
    let mut records = Vec::with_capacity(all.len() + copies.len());
    records.extend_from_slice(all);
    records.extend(copies);
    Ok(BatchOutcome {
        records,
        affected: affected.len(),
        created,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_finite_amounts() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = CheckedAdjustment::check(&ValueAdjustment::Add(bad)).unwrap_err();
            assert_eq!(err.kind(), crate::error::ErrorKind::InvalidAmount);
        }
    }

    #[test]
    fn rejects_amounts_outside_decimal_range() {
        let err = CheckedAdjustment::check(&ValueAdjustment::Set(1e40)).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidAmount);
    }

    #[test]
    fn multiply_overflow_is_invalid_amount() {
        let adj = CheckedAdjustment::Multiply(Decimal::from(1_000_000));
        let err = adj.adjust(Decimal::MAX).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidAmount);
    }

    #[test]
    fn parameters_are_checked_before_selection() {
        let op = BatchOperation::copy_to("   ", None);
        assert_eq!(validate(&op, 0), Err(EngineError::MissingTarget));
        let op = BatchOperation::Update(UpdateSpec::default());
        assert_eq!(validate(&op, 3), Err(EngineError::EmptyUpdate));
        let op = BatchOperation::Update(UpdateSpec {
            scenario_id: Some(" \t".into()),
            ..Default::default()
        });
        assert_eq!(validate(&op, 0), Err(EngineError::MissingTarget));
        assert!(validate(&BatchOperation::Delete, 1).is_ok());
    }
}
