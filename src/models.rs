// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One observed value of a tracked entity at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRecord {
    pub id: String,
    pub entity_type: String,
    pub entity_id: String,
    pub scenario_id: String,
    pub value: Decimal,
    pub recorded_at: DateTime<Utc>,
}

/// Inclusive window on `recorded_at`. Either bound may be open.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Inclusive window on `value`. Either bound may be open.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

/// Conjunction of optional constraints. `None` and `Some(vec![])` both mean
/// "unconstrained" for the list fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_range: Option<ValueRange>,
}

impl FilterSpec {
    pub fn with_entity_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entity_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_entity_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entity_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_scenario_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scenario_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn between(mut self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        self.date_range = Some(DateRange { start, end });
        self
    }

    pub fn value_within(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.value_range = Some(ValueRange { min, max });
        self
    }
}

/// How a record's value changes. Amounts come in as plain floats (form input)
/// and are checked before any record is touched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "amount", rename_all = "lowercase")]
pub enum ValueAdjustment {
    Set(f64),
    Multiply(f64),
    Add(f64),
}

impl ValueAdjustment {
    pub fn amount(&self) -> f64 {
        match self {
            ValueAdjustment::Set(a) | ValueAdjustment::Multiply(a) | ValueAdjustment::Add(a) => *a,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSpec {
    #[serde(default)]
    pub adjustment: Option<ValueAdjustment>,
    #[serde(default)]
    pub scenario_id: Option<String>,
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl UpdateSpec {
    pub fn value(adjustment: ValueAdjustment) -> Self {
        UpdateSpec {
            adjustment: Some(adjustment),
            ..Default::default()
        }
    }

    pub fn is_noop(&self) -> bool {
        self.adjustment.is_none() && self.scenario_id.is_none() && self.recorded_at.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyTarget {
    pub scenario_id: String,
    #[serde(default)]
    pub adjustment: Option<ValueAdjustment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BatchOperation {
    Update(UpdateSpec),
    Delete,
    Copy(CopyTarget),
}

impl BatchOperation {
    pub fn update(adjustment: ValueAdjustment) -> Self {
        BatchOperation::Update(UpdateSpec::value(adjustment))
    }

    pub fn copy_to(scenario_id: impl Into<String>, adjustment: Option<ValueAdjustment>) -> Self {
        BatchOperation::Copy(CopyTarget {
            scenario_id: scenario_id.into(),
            adjustment,
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            BatchOperation::Update(_) => "update",
            BatchOperation::Delete => "delete",
            BatchOperation::Copy(_) => "copy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub date: DateTime<Utc>,
    pub actual_value: Option<f64>,
    pub forecast_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub affected_count: usize,
    /// `None` when the sum does not fit in a `Decimal`.
    pub affected_total_value: Option<Decimal>,
    pub affected_records: Vec<ValueRecord>,
}

/// Result of a committed batch: the full collection the caller should persist.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub records: Vec<ValueRecord>,
    pub affected: usize,
    /// Ids minted by a copy, in the order the copies were appended.
    pub created: Vec<String>,
}
