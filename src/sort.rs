// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::ValueRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordField {
    RecordedAt,
    Value,
    EntityType,
    EntityId,
    ScenarioId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

type Comparator = fn(&ValueRecord, &ValueRecord) -> Ordering;

impl RecordField {
    pub const ALL: [RecordField; 5] = [
        RecordField::RecordedAt,
        RecordField::Value,
        RecordField::EntityType,
        RecordField::EntityId,
        RecordField::ScenarioId,
    ];

    /// Wire name of the field, as used in store files and CLI flags.
    pub fn key(&self) -> &'static str {
        match self {
            RecordField::RecordedAt => "recordedAt",
            RecordField::Value => "value",
            RecordField::EntityType => "entityType",
            RecordField::EntityId => "entityId",
            RecordField::ScenarioId => "scenarioId",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecordField::RecordedAt => "Date",
            RecordField::Value => "Value",
            RecordField::EntityType => "Entity Type",
            RecordField::EntityId => "Entity ID",
            RecordField::ScenarioId => "Scenario",
        }
    }

    fn comparator(&self) -> Comparator {
        match self {
            RecordField::RecordedAt => |a, b| a.recorded_at.cmp(&b.recorded_at),
            RecordField::Value => |a, b| a.value.cmp(&b.value),
            RecordField::EntityType => |a, b| a.entity_type.cmp(&b.entity_type),
            RecordField::EntityId => |a, b| a.entity_id.cmp(&b.entity_id),
            RecordField::ScenarioId => |a, b| a.scenario_id.cmp(&b.scenario_id),
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for RecordField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        let field = match norm.as_str() {
            "recordedat" | "date" => RecordField::RecordedAt,
            "value" => RecordField::Value,
            "entitytype" | "type" => RecordField::EntityType,
            "entityid" | "entity" => RecordField::EntityId,
            "scenarioid" | "scenario" => RecordField::ScenarioId,
            _ => return Err(format!("Unknown field '{}'", s.trim())),
        };
        Ok(field)
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("Unknown sort order '{}' (use asc|desc)", other)),
        }
    }
}

/// Stable sort into a new `Vec`.
pub fn sort_records(records: &[ValueRecord], field: RecordField, order: SortOrder) -> Vec<ValueRecord> {
    let cmp = field.comparator();
    let mut out = records.to_vec();
    match order {
        SortOrder::Asc => out.sort_by(cmp),
        SortOrder::Desc => out.sort_by(|a, b| cmp(b, a)),
    }
    out
}

/// Column-header click: same field flips the order, a new field starts
/// ascending.
pub fn next_sort(current: (RecordField, SortOrder), clicked: RecordField) -> (RecordField, SortOrder) {
    let (field, order) = current;
    if field != clicked {
        return (clicked, SortOrder::Asc);
    }
    match order {
        SortOrder::Asc => (field, SortOrder::Desc),
        SortOrder::Desc => (field, SortOrder::Asc),
    }
}

/// Zero-based page of `per_page` records; empty past the end.
pub fn paginate(records: &[ValueRecord], page: usize, per_page: usize) -> &[ValueRecord] {
    if per_page == 0 {
        return &[];
    }
    let start = page.saturating_mul(per_page).min(records.len());
    let end = start.saturating_add(per_page).min(records.len());
    &records[start..end]
}
