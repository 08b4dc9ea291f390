// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::filter_from_matches;
use crate::config::Settings;
use crate::filter::matches;
use crate::models::ValueRecord;
use crate::stats::{
    Alert, AlertThresholds, Breakdown, Contribution, GoalProgress, Goals, ScenarioValue,
    ValueStats, alerts, average_monthly_change, breakdown, compare_scenarios, contributions,
    goal_progress,
};
use crate::store;
use crate::utils::{fmt_money, maybe_print_json, parse_amount, parse_decimal, pretty_table};
use anyhow::{Result, bail};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub summary: ValueStats,
    pub average_monthly_change: f64,
    pub scenarios: Vec<ScenarioValue>,
    pub contributions: Vec<Contribution>,
    pub breakdown: Breakdown,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alerts: Vec<Alert>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub goals: Vec<GoalProgress>,
}

fn parse_goals(s: &str) -> Result<Goals> {
    let parts: Vec<&str> = s.split(',').collect();
    let [short, medium, long] = parts.as_slice() else {
        bail!("Invalid goals '{}', expected SHORT,MEDIUM,LONG", s);
    };
    Ok(Goals {
        short_term: parse_decimal(short)?,
        medium_term: parse_decimal(medium)?,
        long_term: parse_decimal(long)?,
    })
}

fn thresholds(m: &clap::ArgMatches) -> Result<Option<AlertThresholds>> {
    let significant = m.get_one::<String>("significant");
    let warning = m.get_one::<String>("warning");
    let critical = m.get_one::<String>("critical");
    if significant.is_none() && warning.is_none() && critical.is_none() {
        return Ok(None);
    }
    // Unset levels sit at Decimal::MIN so they never fire.
    let level = |v: Option<&String>| -> Result<Decimal> {
        v.map(|s| parse_decimal(s)).transpose().map(|d| d.unwrap_or(Decimal::MIN))
    };
    Ok(Some(AlertThresholds {
        significant_change: significant
            .map(|s| parse_amount(s))
            .transpose()?
            .unwrap_or(f64::INFINITY),
        warning: level(warning)?,
        critical: level(critical)?,
    }))
}

pub fn run(records: &[ValueRecord], m: &clap::ArgMatches) -> Result<StatsReport> {
    let selected = matches(records, &filter_from_matches(m)?);
    let raised = match thresholds(m)? {
        Some(t) => alerts(&selected, &t),
        None => Vec::new(),
    };
    let goals = match m.get_one::<String>("goals") {
        Some(s) => goal_progress(&selected, &parse_goals(s)?),
        None => Vec::new(),
    };
    Ok(StatsReport {
        summary: ValueStats::compute(&selected),
        average_monthly_change: average_monthly_change(&selected),
        scenarios: compare_scenarios(&selected),
        contributions: contributions(&selected),
        breakdown: breakdown(&selected),
        alerts: raised,
        goals,
    })
}

pub fn handle(settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    let records = store::load_or_empty(&settings.store_path)?;
    let report = run(&records, m)?;
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let s = &report.summary;
    let rows = vec![
        vec!["Records".into(), s.count.to_string()],
        vec!["Current value".into(), fmt_money(&s.current)],
        vec!["Initial value".into(), fmt_money(&s.initial)],
        vec![
            "Change".into(),
            format!("{} ({:.1}%)", fmt_money(&s.absolute_change), s.percentage_change),
        ],
        vec!["Minimum".into(), fmt_money(&s.min)],
        vec!["Maximum".into(), fmt_money(&s.max)],
        vec!["Average".into(), fmt_money(&s.average)],
        vec!["Total".into(), fmt_money(&s.total)],
        vec![
            "Avg monthly change".into(),
            format!("{:.2}", report.average_monthly_change),
        ],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], rows));

    if !report.scenarios.is_empty() {
        let rows = report
            .scenarios
            .iter()
            .map(|sv| {
                vec![
                    sv.scenario_id.clone(),
                    fmt_money(&sv.value),
                    sv.recorded_at.format("%Y-%m-%d").to_string(),
                    fmt_money(&sv.gap_to_top),
                    format!("{:.2}%", sv.percent_difference),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Scenario", "Latest", "As of", "Gap to top", "% Difference"], rows)
        );
    }
    if !report.contributions.is_empty() {
        let rows = report
            .contributions
            .iter()
            .map(|c| {
                vec![
                    c.entity_type.clone(),
                    fmt_money(&c.total),
                    format!("{:.1}%", c.share_percent),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Entity Type", "Total", "Share"], rows));
    }
    if !report.breakdown.rows.is_empty() {
        let mut rows: Vec<Vec<String>> = report
            .breakdown
            .rows
            .iter()
            .map(|b| {
                vec![
                    b.entity_type.clone(),
                    b.entity_id.clone(),
                    fmt_money(&b.value),
                    b.recorded_at.format("%Y-%m-%d").to_string(),
                ]
            })
            .collect();
        rows.push(vec![
            "Total".into(),
            String::new(),
            fmt_money(&report.breakdown.total),
            String::new(),
        ]);
        println!(
            "{}",
            pretty_table(&["Entity Type", "Entity", "Latest", "As of"], rows)
        );
    }
    for a in &report.alerts {
        println!("[{:?}] {}: {}", a.level, a.title, a.message);
    }
    if !report.goals.is_empty() {
        let rows = report
            .goals
            .iter()
            .map(|g| {
                vec![
                    g.label.to_string(),
                    fmt_money(&g.target),
                    format!("{:.1}%", g.progress_percent),
                    if g.achieved { "Achieved" } else { "In Progress" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Goal", "Target", "Progress", "Status"], rows)
        );
    }
    Ok(())
}
