//! Tests for the JSON and SARIF report structures built from a real run.

#![cfg(feature = "tree-sitter")]

use std::path::{Path, PathBuf};

use litguard::config::Config;
use litguard::detect::{DetectionResult, Runner};
use litguard::parser;
use litguard::report::{json_report, sarif_report, JsonReport};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn run() -> DetectionResult {
    parser::init();
    let testdata = testdata_path();
    let config = Config::parse_file(testdata.join("litguard.yaml")).unwrap();
    let files = vec![testdata.join("api_client.ts"), testdata.join("suppressed.ts")];
    Runner::new(&testdata, config.rule_set().unwrap()).run(&files)
}

#[test]
fn test_json_structure() {
    let result = run();
    let report = json_report("testdata", "testdata/litguard.yaml", &result, true);

    assert_eq!(report.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(report.config, "testdata/litguard.yaml");
    assert!(!report.passed);
    assert_eq!(report.files_scanned, 2);
    assert_eq!(report.violations.len(), 8);
    assert_eq!(report.suppressed_count, 5);
    assert_eq!(report.suppressed.len(), 5);

    let first = &report.violations[0];
    assert_eq!(first.rule, "no-magic-numbers");
    assert_eq!(first.kind, "must-use-const");
    assert_eq!(first.severity, "error");
    assert_eq!(first.file, "api_client.ts");
    assert_eq!(first.line, 4);

    let kinds: Vec<(&str, usize)> = report
        .summary
        .iter()
        .map(|s| (s.kind.as_str(), s.violations))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("duplicate-string", 3),
            ("magic-number", 1),
            ("must-use-const", 2),
            ("missing-explicit-type", 2),
        ]
    );
}

#[test]
fn test_json_round_trips_through_serde() {
    let result = run();
    let report = json_report("testdata", "litguard.yaml", &result, false);
    let text = serde_json::to_string_pretty(&report).unwrap();

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(value.get("suppressed").is_none());
    assert_eq!(value["suppressed_count"], 5);

    let parsed: JsonReport = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed.violations.len(), report.violations.len());
}

#[test]
fn test_sarif_structure() {
    let result = run();
    let report = sarif_report(Path::new(""), &result);
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["version"], "2.1.0");
    let run = &value["runs"][0];
    assert_eq!(run["tool"]["driver"]["name"], "litguard");

    let rule_ids: Vec<&str> = run["tool"]["driver"]["rules"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        rule_ids,
        vec![
            "no-duplicate-string",
            "no-magic-numbers",
            "no-implicit-complex-object"
        ]
    );

    let results = run["results"].as_array().unwrap();
    assert_eq!(results.len(), 8);
    let location = &results[0]["locations"][0]["physicalLocation"];
    assert_eq!(location["artifactLocation"]["uri"], "api_client.ts");
    assert_eq!(location["region"]["startLine"], 4);
    assert_eq!(location["region"]["startColumn"], 15);
}
