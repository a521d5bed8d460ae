//! Findings produced by the rules and the sink they are reported to.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::rules::RuleId;
use crate::syntax::{NodeId, Position};

/// Longest value preview shown in a duplicate-string message.
pub const PREVIEW_CHARS: usize = 20;

/// The kinds of finding the engine can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    DuplicateString,
    MagicNumber,
    MustUseConst,
    MissingExplicitType,
}

impl DiagnosticKind {
    pub const ALL: [DiagnosticKind; 4] = [
        DiagnosticKind::DuplicateString,
        DiagnosticKind::MagicNumber,
        DiagnosticKind::MustUseConst,
        DiagnosticKind::MissingExplicitType,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::DuplicateString => "duplicate-string",
            DiagnosticKind::MagicNumber => "magic-number",
            DiagnosticKind::MustUseConst => "must-use-const",
            DiagnosticKind::MissingExplicitType => "missing-explicit-type",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    /// The rule unit that emits this kind.
    pub fn rule(&self) -> RuleId {
        match self {
            DiagnosticKind::DuplicateString => RuleId::DuplicateString,
            DiagnosticKind::MagicNumber | DiagnosticKind::MustUseConst => RuleId::MagicNumbers,
            DiagnosticKind::MissingExplicitType => RuleId::ImplicitComplexObject,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Interpolation data of a finding; the variant determines its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageData {
    DuplicateString {
        preview: String,
        count: usize,
        threshold: usize,
        lines: Vec<usize>,
    },
    MagicNumber {
        raw: String,
    },
    MustUseConst {
        raw: String,
    },
    MissingExplicitType {
        name: String,
        props: usize,
    },
}

/// One finding, anchored at a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub node: NodeId,
    pub position: Position,
    pub data: MessageData,
}

impl Diagnostic {
    pub fn kind(&self) -> DiagnosticKind {
        match self.data {
            MessageData::DuplicateString { .. } => DiagnosticKind::DuplicateString,
            MessageData::MagicNumber { .. } => DiagnosticKind::MagicNumber,
            MessageData::MustUseConst { .. } => DiagnosticKind::MustUseConst,
            MessageData::MissingExplicitType { .. } => DiagnosticKind::MissingExplicitType,
        }
    }

    /// Human-readable message.
    pub fn message(&self) -> String {
        match &self.data {
            MessageData::DuplicateString {
                preview,
                count,
                threshold,
                lines,
            } => {
                let lines = lines
                    .iter()
                    .map(|l| l.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "string '{}' is repeated {} times (threshold: {}); lines: {}",
                    preview, count, threshold, lines
                )
            }
            MessageData::MagicNumber { raw } => format!("no magic number: {}", raw),
            MessageData::MustUseConst { raw } => format!(
                "number constant {} must be declared with 'const'",
                raw
            ),
            MessageData::MissingExplicitType { name, props } => format!(
                "complex object '{}' ({} properties) has no explicit type; declare an interface or type alias for it",
                name, props
            ),
        }
    }
}

/// Truncate `value` to [`PREVIEW_CHARS`] characters, appending `...` when cut.
pub fn preview(value: &str) -> String {
    if value.chars().count() > PREVIEW_CHARS {
        let head: String = value.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        value.to_string()
    }
}

/// Receives findings as they are produced. Reporting never fails and never
/// feeds back into the rules.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_long_values() {
        assert_eq!(preview("short"), "short");
        assert_eq!(preview("exactly twenty chars"), "exactly twenty chars");
        assert_eq!(
            preview("this value is longer than twenty"),
            "this value is longer..."
        );
    }

    #[test]
    fn test_kind_round_trip_names() {
        for kind in DiagnosticKind::ALL {
            assert_eq!(DiagnosticKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(DiagnosticKind::parse("magic_number"), None);
    }

    #[test]
    fn test_duplicate_message_lists_lines() {
        let d = Diagnostic {
            node: crate::syntax::NodeId(3),
            position: Position::new(2, 5),
            data: MessageData::DuplicateString {
                preview: "/users/list".to_string(),
                count: 3,
                threshold: 2,
                lines: vec![2, 4, 9],
            },
        };
        assert_eq!(d.kind(), DiagnosticKind::DuplicateString);
        assert_eq!(
            d.message(),
            "string '/users/list' is repeated 3 times (threshold: 2); lines: 2, 4, 9"
        );
    }

    #[test]
    fn test_kinds_map_to_rules() {
        assert_eq!(DiagnosticKind::MustUseConst.rule(), RuleId::MagicNumbers);
        assert_eq!(DiagnosticKind::MagicNumber.rule(), RuleId::MagicNumbers);
        assert_eq!(
            DiagnosticKind::MissingExplicitType.rule(),
            RuleId::ImplicitComplexObject
        );
    }
}
