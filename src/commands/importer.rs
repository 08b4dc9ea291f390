// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::models::ValueRecord;
use crate::store::{self, ImportOptions, ImportReport};
use anyhow::{Result, bail};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

/// Appends imported records, skipping ids the store already holds.
pub fn merge(existing: &[ValueRecord], incoming: &[ValueRecord]) -> (Vec<ValueRecord>, usize) {
    let mut seen: HashSet<&str> = existing.iter().map(|r| r.id.as_str()).collect();
    let mut out = existing.to_vec();
    let mut skipped = 0;
    for r in incoming {
        if seen.insert(r.id.as_str()) {
            out.push(r.clone());
        } else {
            skipped += 1;
        }
    }
    (out, skipped)
}

pub fn handle(settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    let path = m.get_one::<String>("path").map(|s| s.trim()).unwrap_or_default();
    let opts = ImportOptions {
        default_scenario: m
            .get_one::<String>("default-scenario")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
    };
    let report = store::import_file(Path::new(path), &opts)?;
    print_report(&report);
    if m.get_flag("dry-run") {
        return Ok(());
    }
    if report.valid == 0 {
        bail!("No valid records in {}", path);
    }
    let existing = store::load_or_empty(&settings.store_path)?;
    let (merged, skipped) = merge(&existing, &report.records);
    if skipped > 0 {
        warn!(skipped, "import skipped records with ids already in the store");
    }
    store::save(&settings.store_path, &merged)?;
    info!(path, imported = report.valid - skipped, "import committed");
    println!(
        "Imported {} records from {} ({} duplicates skipped)",
        report.valid - skipped,
        path,
        skipped
    );
    Ok(())
}

fn print_report(r: &ImportReport) {
    println!(
        "{} rows: {} valid, {} invalid",
        r.total, r.valid, r.invalid
    );
    for e in &r.errors {
        println!("  {}", e);
    }
}
