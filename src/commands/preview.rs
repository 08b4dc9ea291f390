// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::filter_from_matches;
use crate::config::Settings;
use crate::engine;
use crate::filter::facets;
use crate::models::{Preview, ValueRecord};
use crate::store;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    let records = store::load_or_empty(&settings.store_path)?;
    let preview = engine::preview(&records, &filter_from_matches(m)?);
    if !maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &preview)? {
        print_preview(&preview);
    }
    Ok(())
}

pub fn handle_facets(settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    let records = store::load_or_empty(&settings.store_path)?;
    let f = facets(&records);
    if !maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &f)? {
        let rows = vec![
            vec!["Entity types".to_string(), f.entity_types.join(", ")],
            vec!["Entities".to_string(), f.entity_ids.join(", ")],
            vec!["Scenarios".to_string(), f.scenario_ids.join(", ")],
        ];
        println!("{}", pretty_table(&["Facet", "Values"], rows));
    }
    Ok(())
}

pub fn record_rows(records: &[ValueRecord]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|r| {
            vec![
                r.recorded_at.format("%Y-%m-%d").to_string(),
                r.entity_type.clone(),
                r.entity_id.clone(),
                r.scenario_id.clone(),
                fmt_money(&r.value),
                r.id.clone(),
            ]
        })
        .collect()
}

pub const RECORD_HEADERS: [&str; 6] = ["Date", "Type", "Entity", "Scenario", "Value", "Id"];

pub fn print_preview(p: &Preview) {
    if p.affected_count == 0 {
        println!("Operation preview: no records match this filter.");
        return;
    }
    let total = p
        .affected_total_value
        .map(|t| fmt_money(&t))
        .unwrap_or_else(|| "out of range".into());
    println!(
        "Operation preview: {} records with a total value of {}",
        p.affected_count, total
    );
    println!("{}", pretty_table(&RECORD_HEADERS, record_rows(&p.affected_records)));
}
