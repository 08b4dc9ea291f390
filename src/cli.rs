// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, ArgGroup, Command, value_parser};

fn filter_args() -> Vec<Arg> {
    vec![
        Arg::new("entity-type")
            .long("entity-type")
            .action(ArgAction::Append)
            .help("Entity type to include (repeatable)"),
        Arg::new("entity-id")
            .long("entity-id")
            .action(ArgAction::Append)
            .help("Entity id to include (repeatable)"),
        Arg::new("scenario")
            .long("scenario")
            .action(ArgAction::Append)
            .help("Scenario id to include (repeatable)"),
        Arg::new("from")
            .long("from")
            .help("Earliest recorded date, inclusive (YYYY-MM-DD or RFC 3339)"),
        Arg::new("to")
            .long("to")
            .help("Latest recorded date, inclusive (YYYY-MM-DD covers the whole day)"),
        Arg::new("min").long("min").allow_negative_numbers(true).help("Minimum value, inclusive"),
        Arg::new("max").long("max").allow_negative_numbers(true).help("Maximum value, inclusive"),
    ]
}

fn json_args() -> Vec<Arg> {
    vec![
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    ]
}

fn confirm_arg() -> Arg {
    Arg::new("yes")
        .long("yes")
        .short('y')
        .action(ArgAction::SetTrue)
        .help("Write the result; without it only the preview is shown")
}

fn adjustment_args(with_set: bool) -> Vec<Arg> {
    let mut args = Vec::new();
    if with_set {
        args.push(Arg::new("set").long("set").allow_negative_numbers(true).help("Set every value to this amount"));
    }
    args.push(Arg::new("multiply").long("multiply").allow_negative_numbers(true).help("Multiply values by this factor"));
    args.push(Arg::new("add").long("add").allow_negative_numbers(true).help("Add this amount to values"));
    args
}

pub fn build_cli() -> Command {
    Command::new("valuebatch")
        .about("Filter, preview and bulk-edit time-stamped value records")
        .version(clap::crate_version!())
        .arg(
            Arg::new("store")
                .long("store")
                .global(true)
                .help("Record store file (.json or .csv)"),
        )
        .subcommand(
            Command::new("preview")
                .about("Show the records a filter selects")
                .args(filter_args())
                .args(json_args()),
        )
        .subcommand(
            Command::new("facets")
                .about("List the entity types, entities and scenarios in the store")
                .args(json_args()),
        )
        .subcommand(
            Command::new("update")
                .about("Change value, scenario or date of the selected records")
                .args(filter_args())
                .args(adjustment_args(true))
                .group(ArgGroup::new("adjustment").args(["set", "multiply", "add"]))
                .arg(Arg::new("new-scenario").long("new-scenario").help("Move records to this scenario"))
                .arg(Arg::new("recorded-at").long("recorded-at").help("New recorded timestamp"))
                .arg(confirm_arg()),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete the selected records")
                .args(filter_args())
                .arg(confirm_arg()),
        )
        .subcommand(
            Command::new("copy")
                .about("Copy the selected records into another scenario")
                .args(filter_args())
                .arg(Arg::new("target").long("target").required(true).help("Target scenario id"))
                .args(adjustment_args(false))
                .group(ArgGroup::new("adjustment").args(["multiply", "add"]))
                .arg(confirm_arg()),
        )
        .subcommand(
            Command::new("forecast")
                .about("Project the selected series forward with monthly compounding")
                .args(filter_args())
                .arg(
                    Arg::new("rate")
                        .long("rate")
                        .required(true)
                        .allow_negative_numbers(true)
                        .help("Annual growth rate as a fraction (0.07 = 7%)"),
                )
                .arg(
                    Arg::new("years")
                        .long("years")
                        .default_value("5")
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(i32)),
                )
                .args(json_args()),
        )
        .subcommand(
            Command::new("stats")
                .about("Summary statistics, scenario comparison, alerts and goals")
                .args(filter_args())
                .arg(Arg::new("significant").long("significant").help("Percent change worth an alert"))
                .arg(Arg::new("warning").long("warning").allow_negative_numbers(true).help("Warning threshold"))
                .arg(Arg::new("critical").long("critical").allow_negative_numbers(true).help("Critical threshold"))
                .arg(Arg::new("goals").long("goals").help("Short,medium,long term targets"))
                .args(json_args()),
        )
        .subcommand(
            Command::new("list")
                .about("List records, sorted and paged")
                .args(filter_args())
                .arg(Arg::new("sort").long("sort").default_value("recordedAt"))
                .arg(Arg::new("order").long("order").default_value("desc"))
                .arg(
                    Arg::new("page")
                        .long("page")
                        .default_value("1")
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("per-page")
                        .long("per-page")
                        .default_value("10")
                        .value_parser(value_parser!(usize)),
                )
                .args(json_args()),
        )
        .subcommand(
            Command::new("import")
                .about("Validate a CSV/JSON file and merge its valid rows into the store")
                .arg(Arg::new("path").long("path").required(true))
                .arg(Arg::new("default-scenario").long("default-scenario"))
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Only report what would be imported"),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export the selected records")
                .args(filter_args())
                .arg(Arg::new("format").long("format").default_value("csv"))
                .arg(Arg::new("out").long("out").required(true))
                .arg(Arg::new("fields").long("fields").help("Comma-separated columns"))
                .arg(Arg::new("sort").long("sort"))
                .arg(Arg::new("order").long("order").default_value("asc")),
        )
}
