// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::EngineError;
use crate::models::{ForecastPoint, ValueRecord};
use chrono::{DateTime, Months, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

/// Horizons reported by `milestones`, in years.
pub const MILESTONE_YEARS: [u32; 4] = [1, 2, 5, 10];

pub fn monthly_rate(annual_growth_rate: f64) -> f64 {
    (1.0 + annual_growth_rate).powf(1.0 / 12.0) - 1.0
}

/// Historical series followed by `years * 12` compounded monthly points.
///
/// With no history the projection starts at zero from the current time.
pub fn project(
    history: &[ValueRecord],
    annual_growth_rate: f64,
    years: i32,
) -> Result<Vec<ForecastPoint>, EngineError> {
    project_from(history, annual_growth_rate, years, Utc::now())
}

/// Like `project`, but `fallback_anchor` dates the projection when history
/// is empty.
pub fn project_from(
    history: &[ValueRecord],
    annual_growth_rate: f64,
    years: i32,
    fallback_anchor: DateTime<Utc>,
) -> Result<Vec<ForecastPoint>, EngineError> {
    if !annual_growth_rate.is_finite() || annual_growth_rate < -1.0 {
        return Err(EngineError::InvalidGrowthRate(annual_growth_rate));
    }
    let mut sorted: Vec<&ValueRecord> = history.iter().collect();
    sorted.sort_by_key(|r| r.recorded_at);
    let anchor = sorted.last().map_or(fallback_anchor, |r| r.recorded_at);

    let months = if years > 0 { years as u64 * 12 } else { 0 };
    // The last date bounds every earlier one, so check it before allocating.
    let months = u32::try_from(months)
        .ok()
        .filter(|&m| m == 0 || anchor.checked_add_months(Months::new(m)).is_some())
        .ok_or_else(|| EngineError::DateOutOfRange {
            anchor: anchor.to_rfc3339(),
            months,
        })?;
    let mut points = Vec::with_capacity(sorted.len() + months as usize);
    for r in &sorted {
        points.push(ForecastPoint {
            date: r.recorded_at,
            actual_value: Some(r.value.to_f64().unwrap_or_default()),
            forecast_value: None,
        });
    }

    let mut current = sorted
        .last()
        .and_then(|r| r.value.to_f64())
        .unwrap_or_default();
    let growth = 1.0 + monthly_rate(annual_growth_rate);
    for i in 1..=months {
        // Offsets are taken from the anchor so a month-end clamp (Jan 31 ->
        // Feb 29) does not carry into later months.
        let date = anchor
            .checked_add_months(Months::new(i))
            .ok_or_else(|| EngineError::DateOutOfRange {
                anchor: anchor.to_rfc3339(),
                months: u64::from(i),
            })?;
        current *= growth;
        points.push(ForecastPoint {
            date,
            actual_value: None,
            forecast_value: Some(current),
        });
    }
    Ok(points)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub years: u32,
    pub date: DateTime<Utc>,
    pub projected_value: f64,
    pub growth: f64,
    /// `None` when the starting value is zero.
    pub growth_percent: Option<f64>,
}

/// Projected value at each of `MILESTONE_YEARS` that falls inside the
/// forecast segment of `points`.
pub fn milestones(points: &[ForecastPoint]) -> Vec<Milestone> {
    let forecast: Vec<&ForecastPoint> = points.iter().filter(|p| p.forecast_value.is_some()).collect();
    let start = points
        .iter()
        .rev()
        .find_map(|p| p.actual_value)
        .unwrap_or_default();
    MILESTONE_YEARS
        .iter()
        .filter_map(|&y| {
            let p = forecast.get((y * 12) as usize - 1)?;
            let projected = p.forecast_value?;
            let growth = projected - start;
            Some(Milestone {
                years: y,
                date: p.date,
                projected_value: projected,
                growth,
                growth_percent: (start != 0.0).then(|| growth / start * 100.0),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monthly_rate_compounds_back_to_annual() {
        let m = monthly_rate(0.12);
        assert!(((1.0 + m).powi(12) - 1.12).abs() < 1e-12);
        assert_eq!(monthly_rate(0.0), 0.0);
        assert_eq!(monthly_rate(-1.0), -1.0);
    }

    #[test]
    fn empty_history_projects_zero_from_anchor() {
        let anchor = DateTime::parse_from_rfc3339("2024-03-31T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let pts = project_from(&[], 0.05, 1, anchor).unwrap();
        assert_eq!(pts.len(), 12);
        assert!(pts.iter().all(|p| p.forecast_value == Some(0.0)));
        // Apr 30, then back to the 31st in May.
        assert_eq!(pts[0].date.to_rfc3339(), "2024-04-30T00:00:00+00:00");
        assert_eq!(pts[1].date.to_rfc3339(), "2024-05-31T00:00:00+00:00");
    }
}
