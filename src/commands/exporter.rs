// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::filter_from_matches;
use crate::config::Settings;
use crate::filter::matches;
use crate::sort::{RecordField, SortOrder};
use crate::store::{self, ExportOptions, Format};
use anyhow::{Context, Result, anyhow};
use std::fs::File;
use std::io::BufWriter;
use tracing::info;

fn parse_fields(s: &str) -> Result<Vec<RecordField>> {
    s.split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(|f| f.parse::<RecordField>().map_err(|e| anyhow!(e)))
        .collect()
}

pub fn options_from_matches(m: &clap::ArgMatches) -> Result<ExportOptions> {
    let format = Format::parse(m.get_one::<String>("format").map(String::as_str).unwrap_or("csv"))?;
    let fields = match m.get_one::<String>("fields") {
        Some(s) => parse_fields(s)?,
        None => Vec::new(),
    };
    let sort = match m.get_one::<String>("sort") {
        Some(s) => {
            let field: RecordField = s.parse().map_err(|e: String| anyhow!(e))?;
            let order: SortOrder = m
                .get_one::<String>("order")
                .map(String::as_str)
                .unwrap_or("asc")
                .parse()
                .map_err(|e: String| anyhow!(e))?;
            Some((field, order))
        }
        None => None,
    };
    Ok(ExportOptions {
        format,
        fields,
        include_id: false,
        sort,
    })
}

pub fn handle(settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    // Options are checked before the output file is created.
    let opts = options_from_matches(m)?;
    let out = m.get_one::<String>("out").map(|s| s.trim()).unwrap_or_default();
    let records = store::load_or_empty(&settings.store_path)?;
    let selected = matches(&records, &filter_from_matches(m)?);
    let file = File::create(out).with_context(|| format!("Create {}", out))?;
    store::export(&selected, &opts, BufWriter::new(file))?;
    info!(out, count = selected.len(), "export written");
    println!("Exported {} records to {}", selected.len(), out);
    Ok(())
}
