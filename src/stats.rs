// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only summaries of a record selection. Sums saturate at the
//! `Decimal` bounds rather than failing.

use crate::models::ValueRecord;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Average month length in days, used to normalise irregular spacing.
pub const AVG_MONTH_DAYS: f64 = 30.44;

fn by_date(records: &[ValueRecord]) -> Vec<&ValueRecord> {
    let mut v: Vec<&ValueRecord> = records.iter().collect();
    v.sort_by_key(|r| r.recorded_at);
    v
}

fn pct(change: Decimal, base: Decimal) -> f64 {
    if base.is_zero() {
        return 0.0;
    }
    change
        .checked_div(base)
        .and_then(|q| q.to_f64())
        .map(|q| q * 100.0)
        .unwrap_or_default()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueStats {
    pub count: usize,
    pub initial: Decimal,
    pub current: Decimal,
    pub absolute_change: Decimal,
    pub percentage_change: f64,
    pub min: Decimal,
    pub max: Decimal,
    pub average: Decimal,
    pub total: Decimal,
}

impl ValueStats {
    /// Initial and current are the earliest and latest records by date.
    pub fn compute(records: &[ValueRecord]) -> Self {
        let sorted = by_date(records);
        let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
            return ValueStats::default();
        };
        let total = records
            .iter()
            .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.value));
        let min = records.iter().map(|r| r.value).min().unwrap_or_default();
        let max = records.iter().map(|r| r.value).max().unwrap_or_default();
        let average = total
            .checked_div(Decimal::from(records.len()))
            .unwrap_or_default();
        let change = last.value.saturating_sub(first.value);
        ValueStats {
            count: records.len(),
            initial: first.value,
            current: last.value,
            absolute_change: change,
            percentage_change: pct(change, first.value),
            min,
            max,
            average,
            total,
        }
    }
}

/// Mean of per-month change between consecutive records. Records sharing a
/// timestamp contribute nothing.
pub fn average_monthly_change(records: &[ValueRecord]) -> f64 {
    let sorted = by_date(records);
    let changes: Vec<f64> = sorted
        .windows(2)
        .filter_map(|w| {
            let secs = (w[1].recorded_at - w[0].recorded_at).num_seconds() as f64;
            if secs <= 0.0 {
                return None;
            }
            let months = secs / (AVG_MONTH_DAYS * 24.0 * 3600.0);
            let delta = w[1].value.saturating_sub(w[0].value).to_f64()?;
            Some(delta / months)
        })
        .collect();
    if changes.is_empty() {
        return 0.0;
    }
    changes.iter().sum::<f64>() / changes.len() as f64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioValue {
    pub scenario_id: String,
    pub value: Decimal,
    pub recorded_at: DateTime<Utc>,
    /// Distance below the highest scenario (zero for the leader).
    pub gap_to_top: Decimal,
    /// Signed difference from the leader as a percentage of its value; zero
    /// when the leader is zero.
    pub percent_difference: f64,
}

/// Latest value per scenario, highest first.
pub fn compare_scenarios(records: &[ValueRecord]) -> Vec<ScenarioValue> {
    let mut latest: HashMap<&str, &ValueRecord> = HashMap::new();
    for r in records {
        latest
            .entry(r.scenario_id.as_str())
            .and_modify(|cur| {
                if r.recorded_at > cur.recorded_at {
                    *cur = r;
                }
            })
            .or_insert(r);
    }
    let mut rows: Vec<&ValueRecord> = latest.into_values().collect();
    rows.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.scenario_id.cmp(&b.scenario_id)));
    let top = rows.first().map(|r| r.value).unwrap_or_default();
    rows.into_iter()
        .map(|r| ScenarioValue {
            scenario_id: r.scenario_id.clone(),
            value: r.value,
            recorded_at: r.recorded_at,
            gap_to_top: top.saturating_sub(r.value),
            percent_difference: pct(r.value.saturating_sub(top), top),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub entity_type: String,
    pub total: Decimal,
    pub share_percent: f64,
}

/// Sum of values per entity type, largest first, with each type's share of
/// the grand total.
pub fn contributions(records: &[ValueRecord]) -> Vec<Contribution> {
    let mut totals: HashMap<&str, Decimal> = HashMap::new();
    for r in records {
        let t = totals.entry(r.entity_type.as_str()).or_default();
        *t = t.saturating_add(r.value);
    }
    let grand = totals
        .values()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v));
    let mut rows: Vec<Contribution> = totals
        .into_iter()
        .map(|(ty, total)| Contribution {
            entity_type: ty.to_string(),
            total,
            share_percent: pct(total, grand),
        })
        .collect();
    rows.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.entity_type.cmp(&b.entity_type)));
    rows
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownRow {
    pub entity_type: String,
    pub entity_id: String,
    pub value: Decimal,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub rows: Vec<BreakdownRow>,
    pub total: Decimal,
}

/// Latest value of every entity, highest first, and their sum.
pub fn breakdown(records: &[ValueRecord]) -> Breakdown {
    let mut latest: HashMap<(&str, &str), &ValueRecord> = HashMap::new();
    for r in records {
        latest
            .entry((r.entity_type.as_str(), r.entity_id.as_str()))
            .and_modify(|cur| {
                if r.recorded_at > cur.recorded_at {
                    *cur = r;
                }
            })
            .or_insert(r);
    }
    let mut rows: Vec<BreakdownRow> = latest
        .into_values()
        .map(|r| BreakdownRow {
            entity_type: r.entity_type.clone(),
            entity_id: r.entity_id.clone(),
            value: r.value,
            recorded_at: r.recorded_at,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.value
            .cmp(&a.value)
            .then_with(|| a.entity_type.cmp(&b.entity_type))
            .then_with(|| a.entity_id.cmp(&b.entity_id))
    });
    let total = rows
        .iter()
        .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.value));
    Breakdown { rows, total }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertThresholds {
    /// Percent change between the last two records that counts as notable.
    pub significant_change: f64,
    pub warning: Decimal,
    pub critical: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub title: String,
    pub message: String,
}

pub fn alerts(records: &[ValueRecord], t: &AlertThresholds) -> Vec<Alert> {
    let sorted = by_date(records);
    let [.., prev, last] = sorted.as_slice() else {
        return vec![Alert {
            level: AlertLevel::Info,
            title: "Insufficient Data".into(),
            message: "At least two data points are required for trend analysis".into(),
        }];
    };
    let mut out = Vec::new();
    let change = last.value.saturating_sub(prev.value);
    let change_pct = pct(change, prev.value);
    if !prev.value.is_zero() && change_pct.abs() >= t.significant_change {
        let up = change_pct > 0.0;
        out.push(Alert {
            level: if up { AlertLevel::Success } else { AlertLevel::Info },
            title: if up { "Significant Increase" } else { "Significant Decrease" }.into(),
            message: format!(
                "Value has {} by {:.1}% ({:.2})",
                if up { "increased" } else { "decreased" },
                change_pct.abs(),
                change.abs()
            ),
        });
    }
    if last.value <= t.warning {
        out.push(Alert {
            level: AlertLevel::Warning,
            title: "Warning Threshold".into(),
            message: format!(
                "Current value ({:.2}) is below the warning threshold ({:.2})",
                last.value, t.warning
            ),
        });
    }
    if last.value <= t.critical {
        out.push(Alert {
            level: AlertLevel::Error,
            title: "Critical Threshold".into(),
            message: format!(
                "Current value ({:.2}) is below the critical threshold ({:.2})",
                last.value, t.critical
            ),
        });
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goals {
    pub short_term: Decimal,
    pub medium_term: Decimal,
    pub long_term: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub label: &'static str,
    pub target: Decimal,
    pub progress_percent: f64,
    pub achieved: bool,
}

pub fn goal_progress(records: &[ValueRecord], goals: &Goals) -> Vec<GoalProgress> {
    let current = by_date(records).last().map(|r| r.value).unwrap_or_default();
    [
        ("Short Term Goal", goals.short_term),
        ("Medium Term Goal", goals.medium_term),
        ("Long Term Goal", goals.long_term),
    ]
    .into_iter()
    .map(|(label, target)| {
        let progress = if target > Decimal::ZERO {
            pct(current, target)
        } else {
            0.0
        };
        GoalProgress {
            label,
            target,
            progress_percent: progress,
            achieved: target > Decimal::ZERO && current >= target,
        }
    })
    .collect()
}
