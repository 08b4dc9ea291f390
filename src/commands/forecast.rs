// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::filter_from_matches;
use crate::config::Settings;
use crate::filter::matches;
use crate::forecast::{milestones, project};
use crate::models::{ForecastPoint, ValueRecord};
use crate::store;
use crate::utils::{maybe_print_json, parse_amount, pretty_table};
use anyhow::Result;

pub fn run(records: &[ValueRecord], m: &clap::ArgMatches) -> Result<Vec<ForecastPoint>> {
    let history = matches(records, &filter_from_matches(m)?);
    let rate = parse_amount(m.get_one::<String>("rate").map(String::as_str).unwrap_or("0"))?;
    let years = m.get_one::<i32>("years").copied().unwrap_or(5);
    Ok(project(&history, rate, years)?)
}

fn cell(v: Option<f64>) -> String {
    v.map(|x| format!("{:.2}", x)).unwrap_or_default()
}

pub fn handle(settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    let records = store::load_or_empty(&settings.store_path)?;
    let points = run(&records, m)?;
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &points)? {
        return Ok(());
    }
    let rows = points
        .iter()
        .map(|p| {
            vec![
                p.date.format("%Y-%m-%d").to_string(),
                cell(p.actual_value),
                cell(p.forecast_value),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Date", "Actual", "Forecast"], rows));

    let marks = milestones(&points);
    if !marks.is_empty() {
        let rows = marks
            .iter()
            .map(|ms| {
                vec![
                    format!("{} yr", ms.years),
                    format!("{:.2}", ms.projected_value),
                    format!("{:.2}", ms.growth),
                    ms.growth_percent
                        .map(|g| format!("{:.1}%", g))
                        .unwrap_or_else(|| "-".into()),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Horizon", "Projected", "Growth", "Growth %"], rows)
        );
    }
    Ok(())
}
