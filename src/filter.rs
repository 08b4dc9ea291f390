// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{FilterSpec, ValueRecord};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

/// A `FilterSpec` reduced to the constraints that actually bind.
///
/// Empty id lists are dropped here, so a multi-select with nothing ticked
/// behaves like no selection at all.
#[derive(Debug, Clone, Default)]
pub struct FilterPredicate<'a> {
    entity_types: Option<HashSet<&'a str>>,
    entity_ids: Option<HashSet<&'a str>>,
    scenario_ids: Option<HashSet<&'a str>>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    min: Option<Decimal>,
    max: Option<Decimal>,
}

fn id_set(list: &Option<Vec<String>>) -> Option<HashSet<&str>> {
    list.as_ref()
        .filter(|l| !l.is_empty())
        .map(|l| l.iter().map(String::as_str).collect())
}

impl<'a> FilterPredicate<'a> {
    pub fn compile(filter: &'a FilterSpec) -> Self {
        let (start, end) = filter
            .date_range
            .as_ref()
            .map(|r| (r.start, r.end))
            .unwrap_or((None, None));
        let (min, max) = filter
            .value_range
            .as_ref()
            .map(|r| (r.min, r.max))
            .unwrap_or((None, None));
        FilterPredicate {
            entity_types: id_set(&filter.entity_types),
            entity_ids: id_set(&filter.entity_ids),
            scenario_ids: id_set(&filter.scenario_ids),
            start,
            end,
            min,
            max,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.entity_types.is_none()
            && self.entity_ids.is_none()
            && self.scenario_ids.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.min.is_none()
            && self.max.is_none()
    }

    pub fn test(&self, r: &ValueRecord) -> bool {
        if let Some(set) = &self.entity_types {
            if !set.contains(r.entity_type.as_str()) {
                return false;
            }
        }
        if let Some(set) = &self.entity_ids {
            if !set.contains(r.entity_id.as_str()) {
                return false;
            }
        }
        if let Some(set) = &self.scenario_ids {
            if !set.contains(r.scenario_id.as_str()) {
                return false;
            }
        }
        if self.start.is_some_and(|s| r.recorded_at < s) {
            return false;
        }
        if self.end.is_some_and(|e| r.recorded_at > e) {
            return false;
        }
        if self.min.is_some_and(|m| r.value < m) {
            return false;
        }
        if self.max.is_some_and(|m| r.value > m) {
            return false;
        }
        true
    }
}

/// Records satisfying every present constraint, in input order.
pub fn matches(records: &[ValueRecord], filter: &FilterSpec) -> Vec<ValueRecord> {
    let pred = FilterPredicate::compile(filter);
    records.iter().filter(|r| pred.test(r)).cloned().collect()
}

/// Distinct values present in a snapshot, used to offer filter choices.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    pub entity_types: Vec<String>,
    pub entity_ids: Vec<String>,
    pub scenario_ids: Vec<String>,
}

pub fn facets(records: &[ValueRecord]) -> Facets {
    let mut types = BTreeSet::new();
    let mut ids = BTreeSet::new();
    let mut scenarios = BTreeSet::new();
    for r in records {
        types.insert(r.entity_type.as_str());
        ids.insert(r.entity_id.as_str());
        scenarios.insert(r.scenario_id.as_str());
    }
    let own = |s: BTreeSet<&str>| s.into_iter().map(str::to_string).collect();
    Facets {
        entity_types: own(types),
        entity_ids: own(ids),
        scenario_ids: own(scenarios),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn rec(id: &str, ty: &str, scenario: &str, value: &str, day: u32) -> ValueRecord {
        ValueRecord {
            id: id.into(),
            entity_type: ty.into(),
            entity_id: format!("{}-1", ty),
            scenario_id: scenario.into(),
            value: Decimal::from_str(value).unwrap(),
            recorded_at: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn predicate_drops_empty_lists() {
        let f = FilterSpec::default()
            .with_entity_types(Vec::<String>::new())
            .with_scenario_ids(Vec::<String>::new());
        assert!(FilterPredicate::compile(&f).is_identity());
    }

    #[test]
    fn bounds_are_inclusive() {
        let records = vec![
            rec("1", "ASSET", "A", "10", 1),
            rec("2", "ASSET", "A", "20", 2),
            rec("3", "ASSET", "A", "30", 3),
        ];
        let f = FilterSpec::default()
            .between(
                Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()),
                Some(Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap()),
            )
            .value_within(Some(Decimal::from(20)), Some(Decimal::from(30)));
        let ids: Vec<_> = matches(&records, &f).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn facets_are_sorted_and_unique() {
        let records = vec![
            rec("1", "ASSET", "B", "1", 1),
            rec("2", "EXPENSE", "A", "1", 1),
            rec("3", "ASSET", "A", "1", 1),
        ];
        let f = facets(&records);
        assert_eq!(f.entity_types, vec!["ASSET", "EXPENSE"]);
        assert_eq!(f.scenario_ids, vec!["A", "B"]);
        assert_eq!(f.entity_ids, vec!["ASSET-1", "EXPENSE-1"]);
    }
}
