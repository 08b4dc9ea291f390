// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod preview;
pub mod batch;
pub mod forecast;
pub mod stats;
pub mod list;
pub mod importer;
pub mod exporter;

use crate::models::FilterSpec;
use crate::utils::{parse_decimal, parse_end_timestamp, parse_timestamp};
use anyhow::Result;

fn many(m: &clap::ArgMatches, id: &str) -> Option<Vec<String>> {
    m.get_many::<String>(id).map(|vals| {
        vals.map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

/// Builds a `FilterSpec` from the shared filter flags of a subcommand.
pub fn filter_from_matches(m: &clap::ArgMatches) -> Result<FilterSpec> {
    let mut f = FilterSpec {
        entity_types: many(m, "entity-type"),
        entity_ids: many(m, "entity-id"),
        scenario_ids: many(m, "scenario"),
        ..Default::default()
    };
    let from = m.get_one::<String>("from").map(|s| parse_timestamp(s)).transpose()?;
    let to = m.get_one::<String>("to").map(|s| parse_end_timestamp(s)).transpose()?;
    if from.is_some() || to.is_some() {
        f = f.between(from, to);
    }
    let min = m.get_one::<String>("min").map(|s| parse_decimal(s)).transpose()?;
    let max = m.get_one::<String>("max").map(|s| parse_decimal(s)).transpose()?;
    if min.is_some() || max.is_some() {
        f = f.value_within(min, max);
    }
    Ok(f)
}
