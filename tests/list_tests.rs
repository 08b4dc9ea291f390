// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use valuebatch::sort::{RecordField, SortOrder, paginate, sort_records};
use valuebatch::{ValueRecord, cli, commands::list};

fn setup() -> Vec<ValueRecord> {
    let start: DateTime<Utc> = valuebatch::utils::parse_timestamp("2024-01-01").unwrap();
    (0..25)
        .map(|i| ValueRecord {
            id: format!("r{:02}", i),
            entity_type: if i % 2 == 0 { "ASSET" } else { "LIABILITY" }.into(),
            entity_id: format!("e{}", i % 3),
            scenario_id: "base".into(),
            value: Decimal::from((i * 7) % 11),
            recorded_at: start + Duration::days(i),
        })
        .collect()
}

fn ids(records: &[ValueRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

#[test]
fn list_defaults_to_newest_first_ten() {
    let matches = cli::build_cli().get_matches_from(["valuebatch", "list"]);
    if let Some(("list", sub)) = matches.subcommand() {
        let rows = list::query_rows(&setup(), sub).unwrap();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].id, "r24");
        assert_eq!(rows[9].id, "r15");
    } else {
        panic!("no list subcommand");
    }
}

#[test]
fn list_pages_past_the_end_are_empty() {
    let matches = cli::build_cli().get_matches_from([
        "valuebatch", "list", "--order", "asc", "--page", "3", "--per-page", "10",
    ]);
    if let Some(("list", sub)) = matches.subcommand() {
        let rows = list::query_rows(&setup(), sub).unwrap();
        assert_eq!(ids(&rows), vec!["r20", "r21", "r22", "r23", "r24"]);
    } else {
        panic!("no list subcommand");
    }

    let matches = cli::build_cli().get_matches_from(["valuebatch", "list", "--page", "9"]);
    if let Some(("list", sub)) = matches.subcommand() {
        assert!(list::query_rows(&setup(), sub).unwrap().is_empty());
    } else {
        panic!("no list subcommand");
    }
}

#[test]
fn list_filters_before_paging() {
    let matches = cli::build_cli().get_matches_from([
        "valuebatch", "list", "--entity-type", "ASSET", "--per-page", "100",
    ]);
    if let Some(("list", sub)) = matches.subcommand() {
        let rows = list::query_rows(&setup(), sub).unwrap();
        assert_eq!(rows.len(), 13);
        assert!(rows.iter().all(|r| r.entity_type == "ASSET"));
    } else {
        panic!("no list subcommand");
    }
}

#[test]
fn list_rejects_unknown_sort_field() {
    let matches = cli::build_cli().get_matches_from(["valuebatch", "list", "--sort", "colour"]);
    if let Some(("list", sub)) = matches.subcommand() {
        assert!(list::query_rows(&setup(), sub).is_err());
    } else {
        panic!("no list subcommand");
    }
}

#[test]
fn sort_is_stable_for_equal_keys() {
    let records = setup();
    let sorted = sort_records(&records, RecordField::EntityId, SortOrder::Asc);
    let e0: Vec<&str> = sorted
        .iter()
        .filter(|r| r.entity_id == "e0")
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(e0, vec!["r00", "r03", "r06", "r09", "r12", "r15", "r18", "r21", "r24"]);
    assert!(sorted.windows(2).all(|w| w[0].entity_id <= w[1].entity_id));
}

#[test]
fn sort_by_value_both_ways() {
    let records = setup();
    let asc = sort_records(&records, RecordField::Value, SortOrder::Asc);
    let desc = sort_records(&records, RecordField::Value, SortOrder::Desc);
    assert!(asc.windows(2).all(|w| w[0].value <= w[1].value));
    assert!(desc.windows(2).all(|w| w[0].value >= w[1].value));
    assert_eq!(asc.len(), records.len());
}

#[test]
fn paginate_handles_edges() {
    let records = setup();
    assert_eq!(paginate(&records, 0, 0).len(), 0);
    assert_eq!(paginate(&records, 2, 12).len(), 1);
    assert_eq!(paginate(&records, usize::MAX, 10).len(), 0);
}
