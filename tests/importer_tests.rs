// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::io::Write;
use tempfile::{Builder, NamedTempFile, TempDir};
use valuebatch::config::Settings;
use valuebatch::store::{self, Format, ImportOptions};
use valuebatch::{cli, commands::importer};

fn temp_with(suffix: &str, body: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    write!(file, "{}", body).unwrap();
    file.flush().unwrap();
    file
}

fn settings_in(dir: &TempDir) -> Settings {
    Settings {
        store_path: dir.path().join("values.json"),
        log_filter: "off".into(),
    }
}

#[test]
fn csv_rows_are_validated_one_by_one() {
    let body = "id,entity_type,entity_id,scenario_id,value,recorded_at\n\
                a1,ASSET,house,base,350000,2024-01-01\n\
                a2,ASSET,,base,10,2024-01-01\n\
                a3,9bad,car,base,10,2024-01-01\n\
                a4,ASSET,car,base,ten,2024-01-01\n\
                a5,ASSET,car,base,12.5,2024-02-30\n\
                a6,EXPENSE,rent,,1800,2024-03-01T12:00:00Z\n";
    let report = store::import_rows(body.as_bytes(), Format::Csv, &ImportOptions::default()).unwrap();
    assert_eq!(report.total, 6);
    assert_eq!(report.valid, 1);
    assert_eq!(report.invalid, 5);
    assert_eq!(report.records[0].id, "a1");
    assert!(report.errors[0].starts_with("row 2:"));
    assert!(report.errors[0].contains("entityId"));
    assert!(report.errors[1].contains("invalid entity type"));
    assert!(report.errors[4].contains("scenarioId"));
}

#[test]
fn default_scenario_fills_blank_cells() {
    let body = "Entity Type,Entity ID,Value,Recorded At\nASSET,house,100,2024-01-01\n";
    let opts = ImportOptions {
        default_scenario: Some("imported".into()),
    };
    let report = store::import_rows(body.as_bytes(), Format::Csv, &opts).unwrap();
    assert_eq!(report.valid, 1);
    let r = &report.records[0];
    assert_eq!(r.scenario_id, "imported");
    assert!(uuid::Uuid::parse_str(&r.id).is_ok());
}

#[test]
fn json_rows_accept_numbers_and_strings() {
    let body = r#"[
        {"entityType":"ASSET","entityId":"car","scenarioId":"base","value":12.5,"recordedAt":"2024-01-01"},
        {"entityType":"ASSET","entityId":"car","scenarioId":"base","value":"13","recordedAt":"2024-02-01T00:00:00Z"},
        {"entityType":"ASSET","scenarioId":"base","value":1,"recordedAt":"2024-03-01"}
    ]"#;
    let report = store::import_rows(body.as_bytes(), Format::Json, &ImportOptions::default()).unwrap();
    assert_eq!(report.valid, 2);
    assert_eq!(report.invalid, 1);
    assert_eq!(report.records[0].value.to_string(), "12.5");
    assert!(report.errors[0].starts_with("row 3:"));
}

#[test]
fn json_that_is_not_an_array_fails() {
    let res = store::import_rows(&b"{\"value\":1}"[..], Format::Json, &ImportOptions::default());
    assert!(res.is_err());
}

#[test]
fn import_command_merges_and_skips_known_ids() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(&dir);
    let file = temp_with(
        ".csv",
        "id,entityType,entityId,scenarioId,value,recordedAt\n\
         r1,ASSET,house,base,100,2024-01-01\n\
         r2,ASSET,house,base,110,2024-02-01\n\
         r3,ASSET,house,,120,2024-03-01\n",
    );
    let path = file.path().to_str().unwrap().to_string();
    let padded = format!("  {}  ", path);
    let matches = cli::build_cli().get_matches_from([
        "valuebatch", "import", "--path", &padded, "--default-scenario", "base",
    ]);
    if let Some(("import", sub)) = matches.subcommand() {
        importer::handle(&settings, sub).unwrap();
        importer::handle(&settings, sub).unwrap();
    } else {
        panic!("no import subcommand");
    }
    let stored = store::load(&settings.store_path).unwrap();
    let ids: Vec<&str> = stored.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["r1", "r2", "r3"]);
    assert_eq!(stored[2].scenario_id, "base");
}

#[test]
fn dry_run_leaves_the_store_alone() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(&dir);
    let file = temp_with(
        ".json",
        r#"[{"entityType":"ASSET","entityId":"car","scenarioId":"base","value":5,"recordedAt":"2024-01-01"}]"#,
    );
    let path = file.path().to_str().unwrap().to_string();
    let matches = cli::build_cli().get_matches_from(["valuebatch", "import", "--path", &path, "--dry-run"]);
    if let Some(("import", sub)) = matches.subcommand() {
        importer::handle(&settings, sub).unwrap();
    } else {
        panic!("no import subcommand");
    }
    assert!(!settings.store_path.exists());
}

#[test]
fn import_without_valid_rows_fails() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(&dir);
    let file = temp_with(".csv", "entityType,entityId,value,recordedAt\nASSET,car,x,2024-01-01\n");
    let path = file.path().to_str().unwrap().to_string();
    let matches = cli::build_cli().get_matches_from(["valuebatch", "import", "--path", &path]);
    if let Some(("import", sub)) = matches.subcommand() {
        assert!(importer::handle(&settings, sub).is_err());
    } else {
        panic!("no import subcommand");
    }
    assert!(!settings.store_path.exists());
}

#[test]
fn merge_reports_skipped_duplicates() {
    let body = "id,entityType,entityId,scenarioId,value,recordedAt\n\
                x,ASSET,a,base,1,2024-01-01\n\
                x,ASSET,a,base,2,2024-01-02\n";
    let report = store::import_rows(body.as_bytes(), Format::Csv, &ImportOptions::default()).unwrap();
    let (merged, skipped) = importer::merge(&[], &report.records);
    assert_eq!(merged.len(), 1);
    assert_eq!(skipped, 1);
    assert_eq!(merged[0].value.to_string(), "1");
}
