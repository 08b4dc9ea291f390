// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Flat snapshot files: a JSON array of records, or CSV with a header row
//! using the wire field names.

use crate::models::ValueRecord;
use crate::sort::{RecordField, SortOrder, sort_records};
use crate::utils::{is_valid_entity_type, parse_decimal, parse_timestamp};
use anyhow::{Context, Result, anyhow, bail};
use csv::ReaderBuilder;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

pub const REQUIRED_FIELDS: [&str; 4] = ["entityType", "entityId", "value", "recordedAt"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Csv,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        Self::parse(&ext).with_context(|| format!("Cannot infer format of {}", path.display()))
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "csv" => Ok(Format::Csv),
            other => Err(anyhow!("Unknown format: {} (use csv|json)", other)),
        }
    }
}

/// Reads a whole snapshot. Any malformed row fails the load.
pub fn load(path: &Path) -> Result<Vec<ValueRecord>> {
    let format = Format::from_path(path)?;
    let file = File::open(path).with_context(|| format!("Open store {}", path.display()))?;
    let records = match format {
        Format::Json => serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Parse JSON store {}", path.display()))?,
        Format::Csv => {
            let report = import_rows(file, Format::Csv, &ImportOptions::default())?;
            if let Some(first) = report.errors.first() {
                bail!("{} invalid rows in {}; first: {}", report.invalid, path.display(), first);
            }
            report.records
        }
    };
    debug!(path = %path.display(), count = records.len(), "loaded store");
    Ok(records)
}

/// Same as `load`, but a missing file is an empty store.
pub fn load_or_empty(path: &Path) -> Result<Vec<ValueRecord>> {
    if !path.exists() {
        debug!(path = %path.display(), "store missing, starting empty");
        return Ok(Vec::new());
    }
    load(path)
}

/// Writes next to the target and renames over it.
pub fn save(path: &Path, records: &[ValueRecord]) -> Result<()> {
    let format = Format::from_path(path)?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("Create {}", dir.display()))?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);
    {
        let file = File::create(tmp).with_context(|| format!("Create {}", tmp.display()))?;
        let mut w = BufWriter::new(file);
        let opts = ExportOptions {
            format,
            fields: Vec::new(),
            include_id: true,
            sort: None,
        };
        export(records, &opts, &mut w)?;
        w.flush()?;
    }
    fs::rename(tmp, path).with_context(|| format!("Replace {}", path.display()))?;
    info!(path = %path.display(), count = records.len(), "saved store");
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Scenario for rows that do not name one.
    pub default_scenario: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub errors: Vec<String>,
    pub records: Vec<ValueRecord>,
}

// "entity_type", "Entity Type" and "entityType" all name the same column.
fn norm_key(k: &str) -> String {
    k.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

type Row = HashMap<String, String>;

fn cell<'a>(row: &'a Row, key: &str) -> Option<&'a str> {
    row.get(&norm_key(key))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

fn json_scalar(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn read_rows<R: Read>(reader: R, format: Format) -> Result<Vec<Row>> {
    match format {
        Format::Csv => {
            let mut rdr = ReaderBuilder::new()
                .has_headers(true)
                .trim(csv::Trim::All)
                .from_reader(reader);
            let headers: Vec<String> = rdr.headers()?.iter().map(norm_key).collect();
            let mut rows = Vec::new();
            for result in rdr.records() {
                let rec = result?;
                rows.push(
                    headers
                        .iter()
                        .cloned()
                        .zip(rec.iter().map(str::to_string))
                        .collect(),
                );
            }
            Ok(rows)
        }
        Format::Json => {
            let items: Vec<Map<String, Value>> =
                serde_json::from_reader(reader).context("Expected a JSON array of objects")?;
            Ok(items
                .into_iter()
                .map(|obj| {
                    obj.iter()
                        .filter_map(|(k, v)| Some((norm_key(k), json_scalar(v)?)))
                        .collect()
                })
                .collect())
        }
    }
}

fn row_to_record(row: &Row, opts: &ImportOptions) -> Result<ValueRecord> {
    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|f| cell(row, f).is_none())
        .collect();
    if !missing.is_empty() {
        bail!("missing {}", missing.join(", "));
    }
    let entity_type = cell(row, "entityType").unwrap_or_default();
    if !is_valid_entity_type(entity_type) {
        bail!("invalid entity type '{}'", entity_type);
    }
    let scenario_id = cell(row, "scenarioId")
        .map(str::to_string)
        .or_else(|| opts.default_scenario.clone())
        .ok_or_else(|| anyhow!("missing scenarioId and no default scenario"))?;
    Ok(ValueRecord {
        id: cell(row, "id")
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        entity_type: entity_type.to_string(),
        entity_id: cell(row, "entityId").unwrap_or_default().to_string(),
        scenario_id,
        value: parse_decimal(cell(row, "value").unwrap_or_default())?,
        recorded_at: parse_timestamp(cell(row, "recordedAt").unwrap_or_default())?,
    })
}

/// Validates every row and keeps the good ones. Row numbers in `errors` are
/// 1-based data rows.
pub fn import_rows<R: Read>(reader: R, format: Format, opts: &ImportOptions) -> Result<ImportReport> {
    let rows = read_rows(reader, format)?;
    let mut report = ImportReport {
        total: rows.len(),
        ..Default::default()
    };
    for (i, row) in rows.iter().enumerate() {
        match row_to_record(row, opts) {
            Ok(r) => report.records.push(r),
            Err(e) => report.errors.push(format!("row {}: {:#}", i + 1, e)),
        }
    }
    report.valid = report.records.len();
    report.invalid = report.errors.len();
    debug!(total = report.total, valid = report.valid, "import validated");
    Ok(report)
}

pub fn import_file(path: &Path, opts: &ImportOptions) -> Result<ImportReport> {
    let format = Format::from_path(path)?;
    let file = File::open(path).with_context(|| format!("Open {}", path.display()))?;
    import_rows(file, format, opts)
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub format: Format,
    /// Columns to write; empty means all of them.
    pub fields: Vec<RecordField>,
    pub include_id: bool,
    pub sort: Option<(RecordField, SortOrder)>,
}

fn field_text(r: &ValueRecord, f: RecordField) -> String {
    match f {
        RecordField::RecordedAt => r.recorded_at.to_rfc3339(),
        RecordField::Value => r.value.to_string(),
        RecordField::EntityType => r.entity_type.clone(),
        RecordField::EntityId => r.entity_id.clone(),
        RecordField::ScenarioId => r.scenario_id.clone(),
    }
}

// JSON fields reuse the record's serde encoding.
fn field_json(r: &ValueRecord, f: RecordField) -> serde_json::Result<Value> {
    match f {
        RecordField::RecordedAt => serde_json::to_value(r.recorded_at),
        RecordField::Value => serde_json::to_value(r.value),
        RecordField::EntityType => serde_json::to_value(&r.entity_type),
        RecordField::EntityId => serde_json::to_value(&r.entity_id),
        RecordField::ScenarioId => serde_json::to_value(&r.scenario_id),
    }
}

/// Writes the selected columns as CSV, or as a JSON array of objects.
///
/// JSON objects carry the same encoding as a serialized `ValueRecord`:
/// `value` is a decimal string (`"1234.50"`) so no precision is lost, and
/// `recordedAt` is RFC 3339.
pub fn export<W: Write>(records: &[ValueRecord], opts: &ExportOptions, mut out: W) -> Result<()> {
    let fields: Vec<RecordField> = if opts.fields.is_empty() {
        vec![
            RecordField::EntityType,
            RecordField::EntityId,
            RecordField::ScenarioId,
            RecordField::Value,
            RecordField::RecordedAt,
        ]
    } else {
        opts.fields.clone()
    };
    let sorted;
    let rows = match opts.sort {
        Some((field, order)) => {
            sorted = sort_records(records, field, order);
            &sorted[..]
        }
        None => records,
    };
    match opts.format {
        Format::Csv => {
            let mut wtr = csv::Writer::from_writer(&mut out);
            let mut header: Vec<&str> = Vec::with_capacity(fields.len() + 1);
            if opts.include_id {
                header.push("id");
            }
            header.extend(fields.iter().map(|f| f.key()));
            wtr.write_record(&header)?;
            for r in rows {
                let mut line = Vec::with_capacity(header.len());
                if opts.include_id {
                    line.push(r.id.clone());
                }
                line.extend(fields.iter().map(|f| field_text(r, *f)));
                wtr.write_record(&line)?;
            }
            wtr.flush()?;
        }
        Format::Json => {
            let mut items: Vec<Map<String, Value>> = Vec::with_capacity(rows.len());
            for r in rows {
                let mut obj = Map::new();
                if opts.include_id {
                    obj.insert("id".into(), Value::String(r.id.clone()));
                }
                for f in &fields {
                    obj.insert(f.key().into(), field_json(r, *f)?);
                }
                items.push(obj);
            }
            serde_json::to_writer_pretty(&mut out, &items)?;
        }
    }
    out.flush()?;
    Ok(())
}
