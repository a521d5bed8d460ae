//! Inline suppression of violations via comments.
//!
//! Supports suppression comments like:
//! - `// litguard:ignore <rule> - <reason>`
//! - `// litguard:ignore-next-line <rule> - <reason>`
//! - `// litguard:ignore-file <rule> - <reason>`
//!
//! `<rule>` is a diagnostic kind (`magic-number`), a rule id
//! (`no-magic-numbers`) or `*`. Block comments (`/* ... */`, and
//! `{/* ... */}` in JSX) work the same way.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::Violation;
use crate::engine::DiagnosticKind;
use crate::rules::RuleId;

/// File-level directives are only honored within this many header lines.
const FILE_DIRECTIVE_MAX_LINE: usize = 10;

/// How a suppression applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuppressionType {
    /// Applies to the same line
    Line,
    /// Applies to the next line
    NextLine,
    /// Applies to the entire file
    File,
}

/// An inline suppression directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suppression {
    /// Kind or rule to suppress, or "*" for all
    pub rule: String,
    /// Human-readable reason
    pub reason: String,
    /// File containing the suppression
    pub file: String,
    /// Line number (0 for file-level)
    pub line: usize,
    /// How the suppression applies
    pub suppression_type: SuppressionType,
}

/// A violation that was suppressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuppressedViolation {
    pub violation: Violation,
    pub suppression: Suppression,
}

static SUPPRESSION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Line comment: // litguard:...
        r"//\s*litguard:(ignore(?:-file|-next-line)?)\s+(\S+)\s*(?:-\s*(.*))?",
        // Block comment: /* litguard:... */
        r"/\*\s*litguard:(ignore(?:-file|-next-line)?)\s+(\S+?)\s*(?:-\s*(.*?))?\s*\*/",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

/// Parse suppression directives from file content.
pub fn parse_suppressions(file_path: &str, content: &str) -> Vec<Suppression> {
    let mut suppressions = Vec::new();
    let mut in_header = true;

    for (line_num, line) in content.lines().enumerate() {
        let line_number = line_num + 1;
        let trimmed = line.trim();

        if in_header && !is_comment_or_empty(trimmed) {
            in_header = false;
        }

        for pattern in SUPPRESSION_PATTERNS.iter() {
            let Some(caps) = pattern.captures(line) else {
                continue;
            };
            let directive = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let rule = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            let reason = caps
                .get(3)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();

            let suppression_type = match directive {
                "ignore-file" => {
                    if !in_header && line_number > FILE_DIRECTIVE_MAX_LINE {
                        continue;
                    }
                    SuppressionType::File
                }
                "ignore-next-line" => SuppressionType::NextLine,
                "ignore" => {
                    // Alone on its line: applies to the next one.
                    let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
                    let before = line[..start].trim().trim_start_matches('{').trim();
                    if before.is_empty() {
                        SuppressionType::NextLine
                    } else {
                        SuppressionType::Line
                    }
                }
                _ => continue,
            };

            suppressions.push(Suppression {
                rule: rule.to_string(),
                reason,
                file: file_path.to_string(),
                line: if suppression_type == SuppressionType::File {
                    0
                } else {
                    line_number
                },
                suppression_type,
            });
            break; // Only one suppression per line
        }
    }

    suppressions
}

/// Check if a line is a comment, a shebang or empty.
fn is_comment_or_empty(line: &str) -> bool {
    line.is_empty()
        || ["//", "/*", "*", "#!"]
            .iter()
            .any(|prefix| line.starts_with(prefix))
}

/// Check if a violation matches a suppression.
pub fn matches_suppression(violation: &Violation, suppression: &Suppression) -> bool {
    if violation.file != suppression.file {
        return false;
    }

    if suppression.rule != "*" {
        let by_kind = DiagnosticKind::parse(&suppression.rule) == Some(violation.kind);
        let by_rule = RuleId::parse(&suppression.rule) == Some(violation.rule);
        if !by_kind && !by_rule {
            return false;
        }
    }

    match suppression.suppression_type {
        SuppressionType::File => true,
        SuppressionType::Line => violation.line == suppression.line,
        SuppressionType::NextLine => violation.line == suppression.line + 1,
    }
}

/// Separate violations into active and suppressed based on suppressions.
pub fn filter_suppressed(
    violations: Vec<Violation>,
    suppressions: &[Suppression],
) -> (Vec<Violation>, Vec<SuppressedViolation>) {
    let mut active = Vec::new();
    let mut suppressed = Vec::new();

    for violation in violations {
        match suppressions
            .iter()
            .find(|s| matches_suppression(&violation, s))
        {
            Some(suppression) => suppressed.push(SuppressedViolation {
                violation,
                suppression: suppression.clone(),
            }),
            None => active.push(violation),
        }
    }

    (active, suppressed)
}
