//! Output formatting for litguard results.
//!
//! Supports three output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration

use colored::*;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::detect::{DetectionResult, Severity, SuppressedViolation, SuppressionType, Violation};
use crate::engine::DiagnosticKind;
use crate::rules::RuleId;

// =============================================================================
// JSON Format
// =============================================================================

/// Top-level JSON report.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    pub config: String,
    pub passed: bool,
    pub files_scanned: usize,
    #[serde(default)]
    pub files_failed: usize,
    pub violations: Vec<JsonViolation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suppressed: Vec<JsonSuppressedViolation>,
    pub suppressed_count: usize,
    pub summary: Vec<SummaryEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonViolation {
    pub rule: String,
    pub kind: String,
    pub severity: String,
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Violation count per diagnostic kind.
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub kind: String,
    pub violations: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonSuppressedViolation {
    pub violation: JsonViolation,
    pub suppression: JsonSuppression,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonSuppression {
    pub rule: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    pub file: String,
    pub line: usize,
    #[serde(rename = "type")]
    pub suppression_type: String,
}

/// Build the JSON report. Suppressed violations are only listed when
/// `show_suppressed` is set; the count is always present.
pub fn json_report(
    path: &str,
    config_path: &str,
    result: &DetectionResult,
    show_suppressed: bool,
) -> JsonReport {
    let suppressed = if show_suppressed {
        result.suppressed.iter().map(suppressed_to_json).collect()
    } else {
        Vec::new()
    };

    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        path: path.to_string(),
        config: config_path.to_string(),
        passed: !result.has_errors(),
        files_scanned: result.scanned,
        files_failed: result.failed,
        violations: result.violations.iter().map(violation_to_json).collect(),
        suppressed,
        suppressed_count: result.suppressed_count(),
        summary: summarize(&result.violations)
            .into_iter()
            .map(|(kind, violations)| SummaryEntry {
                kind: kind.as_str().to_string(),
                violations,
            })
            .collect(),
    }
}

/// Write results in JSON format.
pub fn write_json(
    path: &str,
    config_path: &str,
    result: &DetectionResult,
    show_suppressed: bool,
) -> anyhow::Result<()> {
    let report = json_report(path, config_path, result, show_suppressed);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn violation_to_json(v: &Violation) -> JsonViolation {
    JsonViolation {
        rule: v.rule.as_str().to_string(),
        kind: v.kind.as_str().to_string(),
        severity: v.severity.to_string(),
        file: v.file.clone(),
        line: v.line,
        column: v.column,
        message: v.message.clone(),
    }
}

fn suppressed_to_json(sv: &SuppressedViolation) -> JsonSuppressedViolation {
    JsonSuppressedViolation {
        violation: violation_to_json(&sv.violation),
        suppression: JsonSuppression {
            rule: sv.suppression.rule.clone(),
            reason: sv.suppression.reason.clone(),
            file: sv.suppression.file.clone(),
            line: sv.suppression.line,
            suppression_type: suppression_type_name(sv.suppression.suppression_type).to_string(),
        },
    }
}

fn suppression_type_name(t: SuppressionType) -> &'static str {
    match t {
        SuppressionType::Line => "line",
        SuppressionType::NextLine => "nextline",
        SuppressionType::File => "file",
    }
}

/// Violation counts per kind, in `DiagnosticKind::ALL` order, zero counts
/// omitted.
pub fn summarize(violations: &[Violation]) -> IndexMap<DiagnosticKind, usize> {
    let mut counts: IndexMap<DiagnosticKind, usize> = DiagnosticKind::ALL
        .into_iter()
        .map(|kind| (kind, 0))
        .collect();
    for v in violations {
        *counts.entry(v.kind).or_insert(0) += 1;
    }
    counts.retain(|_, count| *count > 0);
    counts
}

// =============================================================================
// SARIF Format
// =============================================================================

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";
const TOOL_NAME: &str = "litguard";

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifReport {
    pub version: String,
    #[serde(rename = "$schema")]
    pub schema: String,
    pub runs: Vec<SarifRun>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifRun {
    pub tool: SarifTool,
    pub results: Vec<SarifResult>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifTool {
    pub driver: SarifDriver,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifDriver {
    pub name: String,
    pub version: String,
    pub rules: Vec<SarifRule>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifRule {
    pub id: String,
    #[serde(rename = "shortDescription")]
    pub short_description: SarifMessage,
    #[serde(rename = "defaultConfiguration")]
    pub default_config: SarifRuleConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifRuleConfig {
    pub level: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifResult {
    #[serde(rename = "ruleId")]
    pub rule_id: String,
    pub level: String,
    pub message: SarifMessage,
    pub locations: Vec<SarifLocation>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifMessage {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    pub physical_location: SarifPhysicalLocation,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    pub artifact_location: SarifArtifact,
    pub region: SarifRegion,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifArtifact {
    pub uri: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifRegion {
    #[serde(rename = "startLine")]
    pub start_line: usize,
    #[serde(rename = "startColumn")]
    pub start_column: usize,
}

fn map_severity_to_level(severity: &Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "note",
    }
}

fn make_relative_path(file_path: &str, base_path: &Path) -> String {
    if base_path.as_os_str().is_empty() {
        return file_path.to_string();
    }
    Path::new(file_path)
        .strip_prefix(base_path)
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_else(|_| file_path.replace('\\', "/"))
}

/// Build the SARIF log. Every rule unit is listed in the driver, whether or
/// not it produced results.
pub fn sarif_report(base_path: &Path, result: &DetectionResult) -> SarifReport {
    let rules = RuleId::ALL
        .iter()
        .map(|id| SarifRule {
            id: id.as_str().to_string(),
            short_description: SarifMessage {
                text: id.description().to_string(),
            },
            default_config: SarifRuleConfig {
                level: "error".to_string(),
            },
        })
        .collect();

    let results = result
        .violations
        .iter()
        .map(|v| SarifResult {
            rule_id: v.rule.as_str().to_string(),
            level: map_severity_to_level(&v.severity).to_string(),
            message: SarifMessage {
                text: v.message.clone(),
            },
            locations: vec![SarifLocation {
                physical_location: SarifPhysicalLocation {
                    artifact_location: SarifArtifact {
                        uri: make_relative_path(&v.file, base_path),
                    },
                    region: SarifRegion {
                        start_line: v.line.max(1),
                        start_column: v.column.max(1),
                    },
                },
            }],
        })
        .collect();

    SarifReport {
        version: SARIF_VERSION.to_string(),
        schema: SARIF_SCHEMA.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: TOOL_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    rules,
                },
            },
            results,
        }],
    }
}

/// Write results in SARIF format.
pub fn write_sarif(base_path: &Path, result: &DetectionResult) -> anyhow::Result<()> {
    let report = sarif_report(base_path, result);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in pretty (human-readable) format.
pub fn write_pretty(path: &str, config_path: &str, result: &DetectionResult, show_suppressed: bool) {
    println!();
    print!("  ");
    print!("{}", "litguard".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Linting: ".dimmed());
    println!("{}", path);
    print!("  {}", "Config:  ".dimmed());
    println!("{}", config_path);
    println!();

    if !result.violations.is_empty() {
        write_violations(&result.violations);
        println!();
    }

    if !result.suppressed.is_empty() {
        write_suppressed_summary(&result.suppressed, show_suppressed);
        println!();
    }

    let summary = summarize(&result.violations);
    if !summary.is_empty() {
        println!("  {}", "Summary:".bold());
        for (kind, count) in &summary {
            let plural = if *count != 1 { "s" } else { "" };
            println!("    {:<22} {} violation{}", kind.as_str(), count, plural);
        }
        println!();
    }

    write_final_status(result);
    println!();
}

fn write_violations(violations: &[Violation]) {
    println!("  {} ({}):", "Violations".bold(), violations.len());
    println!();

    for v in violations {
        write_severity_tag(&v.severity);
        print!("   ");
        print!("{:<22}", v.kind.as_str().dimmed());
        print!("{}", v.file.blue());
        print!("{}", format!(":{}:{}", v.line, v.column).dimmed());
        println!();
        println!("            {}", v.message);
        println!();
    }
}

fn write_severity_tag(severity: &Severity) {
    match severity {
        Severity::Error => print!("    {} ", "ERROR".red()),
        Severity::Warning => print!("    {} ", "WARN ".yellow()),
        Severity::Info => print!("    {} ", "INFO ".blue()),
    }
}

fn write_suppressed_summary(suppressed: &[SuppressedViolation], show_details: bool) {
    println!("  {} ({}):", "Suppressed".dimmed(), suppressed.len());

    if !show_details {
        println!("    {}", "(use --show-suppressed to see details)".dimmed());
        return;
    }

    println!();
    for sv in suppressed {
        let v = &sv.violation;
        let s = &sv.suppression;

        print!("    {:<22}", v.kind.as_str().dimmed());
        print!("{}", v.file.blue());
        if s.suppression_type == SuppressionType::File {
            print!("{}", ":* (file)".dimmed());
        } else {
            print!("{}", format!(":{}", v.line).dimmed());
        }
        println!();

        if !s.reason.is_empty() {
            println!("            {}", format!("reason: {:?}", s.reason).dimmed());
        }
    }
}

fn write_final_status(result: &DetectionResult) {
    let errors = result.count_severity(Severity::Error);
    let warnings = result.count_severity(Severity::Warning);

    print!(
        "  {}",
        format!("{} file(s) linted", result.scanned).dimmed()
    );
    if result.failed > 0 {
        print!("{}", format!(", {} skipped", result.failed).yellow());
    }
    print!("  ");
    print!("{} error(s), {} warning(s)  ", errors, warnings);

    if errors == 0 {
        print!("{}", "PASSED".green());
    } else {
        print!("{}", "FAILED".red());
    }
    println!();
}
