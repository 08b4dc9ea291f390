// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::filter_from_matches;
use super::preview::{RECORD_HEADERS, record_rows};
use crate::config::Settings;
use crate::filter::matches;
use crate::models::ValueRecord;
use crate::sort::{RecordField, SortOrder, paginate, sort_records};
use crate::store;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, anyhow};

/// Filtered, sorted page of records. Pages are 1-based on the command line.
pub fn query_rows(records: &[ValueRecord], m: &clap::ArgMatches) -> Result<Vec<ValueRecord>> {
    let field: RecordField = m
        .get_one::<String>("sort")
        .map(String::as_str)
        .unwrap_or("recordedAt")
        .parse()
        .map_err(|e: String| anyhow!(e))?;
    let order: SortOrder = m
        .get_one::<String>("order")
        .map(String::as_str)
        .unwrap_or("desc")
        .parse()
        .map_err(|e: String| anyhow!(e))?;
    let page = m.get_one::<usize>("page").copied().unwrap_or(1).max(1);
    let per_page = m.get_one::<usize>("per-page").copied().unwrap_or(10);

    let selected = matches(records, &filter_from_matches(m)?);
    let sorted = sort_records(&selected, field, order);
    Ok(paginate(&sorted, page - 1, per_page).to_vec())
}

pub fn handle(settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    let records = store::load_or_empty(&settings.store_path)?;
    let data = query_rows(&records, m)?;
    if !maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &data)? {
        println!("{}", pretty_table(&RECORD_HEADERS, record_rows(&data)));
    }
    Ok(())
}
