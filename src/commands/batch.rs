// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::filter_from_matches;
use super::preview::print_preview;
use crate::config::Settings;
use crate::engine;
use crate::models::{BatchOperation, BatchOutcome, CopyTarget, UpdateSpec, ValueAdjustment, ValueRecord};
use crate::store;
use crate::utils::{parse_amount, parse_timestamp};
use anyhow::{Result, anyhow};
use tracing::info;

fn adjustment(m: &clap::ArgMatches) -> Result<Option<ValueAdjustment>> {
    let has = |id: &str| m.try_get_one::<String>(id).ok().flatten();
    if let Some(s) = has("set") {
        return Ok(Some(ValueAdjustment::Set(parse_amount(s)?)));
    }
    if let Some(s) = has("multiply") {
        return Ok(Some(ValueAdjustment::Multiply(parse_amount(s)?)));
    }
    if let Some(s) = has("add") {
        return Ok(Some(ValueAdjustment::Add(parse_amount(s)?)));
    }
    Ok(None)
}

/// Translates an `update`, `delete` or `copy` subcommand into an operation.
pub fn operation_from_matches(name: &str, m: &clap::ArgMatches) -> Result<BatchOperation> {
    let op = match name {
        "update" => BatchOperation::Update(UpdateSpec {
            adjustment: adjustment(m)?,
            scenario_id: m
                .get_one::<String>("new-scenario")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            recorded_at: m
                .get_one::<String>("recorded-at")
                .map(|s| parse_timestamp(s))
                .transpose()?,
        }),
        "delete" => BatchOperation::Delete,
        "copy" => BatchOperation::Copy(CopyTarget {
            scenario_id: m
                .get_one::<String>("target")
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
            adjustment: adjustment(m)?,
        }),
        other => return Err(anyhow!("Unknown batch operation '{}'", other)),
    };
    Ok(op)
}

/// Runs the batch against an in-memory snapshot without touching disk.
pub fn run(records: &[ValueRecord], name: &str, m: &clap::ArgMatches) -> Result<BatchOutcome> {
    let filter = filter_from_matches(m)?;
    let op = operation_from_matches(name, m)?;
    Ok(engine::execute(records, &filter, &op)?)
}

pub fn handle(settings: &Settings, name: &str, m: &clap::ArgMatches) -> Result<()> {
    let records = store::load_or_empty(&settings.store_path)?;
    let filter = filter_from_matches(m)?;
    let op = operation_from_matches(name, m)?;
    let preview = engine::preview(&records, &filter);
    print_preview(&preview);
    if !m.get_flag("yes") {
        println!("Dry run; re-run with --yes to {} these records.", op.label());
        return Ok(());
    }
    let outcome = engine::execute(&records, &filter, &op)?;
    store::save(&settings.store_path, &outcome.records)?;
    info!(
        operation = op.label(),
        affected = outcome.affected,
        created = outcome.created.len(),
        "batch committed"
    );
    match op {
        BatchOperation::Update(_) => println!("Updated {} records", outcome.affected),
        BatchOperation::Delete => println!("Deleted {} records", outcome.affected),
        BatchOperation::Copy(t) => println!(
            "Copied {} records to scenario '{}'",
            outcome.created.len(),
            t.scenario_id
        ),
    }
    Ok(())
}
