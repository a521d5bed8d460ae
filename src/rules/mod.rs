//! The three rule units and the set they are instantiated from.
//!
//! A [`RuleSet`] is compiled once per run from the configuration; every
//! configuration problem surfaces there. Each analyzed file then gets its
//! own rule instances from [`RuleSet::instantiate`], so aggregator state
//! never leaks from one file into the next.

pub mod complex_object;
pub mod duplicate_string;
pub mod magic_numbers;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::RulesConfig;
use crate::detect::Severity;
use crate::engine::DiagnosticSink;
use crate::error::ConfigurationError;
use crate::syntax::{NodeId, NodeKind, SyntaxTree};

pub use complex_object::{ComplexObjectConfig, ComplexObjectRule};
pub use duplicate_string::{DuplicateStringConfig, DuplicateStringRule};
pub use magic_numbers::{Exemption, MagicNumberConfig, MagicNumberPolicy, MagicNumberRule, Verdict};

/// Identifier of a rule unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RuleId {
    #[serde(rename = "no-duplicate-string")]
    DuplicateString,
    #[serde(rename = "no-magic-numbers")]
    MagicNumbers,
    #[serde(rename = "no-implicit-complex-object")]
    ImplicitComplexObject,
}

impl RuleId {
    pub const ALL: [RuleId; 3] = [
        RuleId::DuplicateString,
        RuleId::MagicNumbers,
        RuleId::ImplicitComplexObject,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::DuplicateString => "no-duplicate-string",
            RuleId::MagicNumbers => "no-magic-numbers",
            RuleId::ImplicitComplexObject => "no-implicit-complex-object",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == s)
    }

    pub fn description(&self) -> &'static str {
        match self {
            RuleId::DuplicateString => "Disallow repeating the same string literal",
            RuleId::MagicNumbers => "Disallow numeric literals without a named constant",
            RuleId::ImplicitComplexObject => {
                "Require an explicit type for object-shaped bindings and parameters"
            }
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One rule unit: callbacks for the node kinds it is interested in, plus an
/// optional end-of-traversal callback.
pub trait Rule {
    fn id(&self) -> RuleId;

    /// Node kinds [`Rule::check`] is called for.
    fn interests(&self) -> &'static [NodeKind];

    fn check(&mut self, tree: &SyntaxTree, node: NodeId, sink: &mut dyn DiagnosticSink);

    /// Called once after every node has been visited.
    fn finish(&mut self, _tree: &SyntaxTree, _sink: &mut dyn DiagnosticSink) {}
}

/// Compiled configuration of every enabled rule, each with its severity.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    duplicate_string: Option<(DuplicateStringConfig, Severity)>,
    magic_numbers: Option<(MagicNumberConfig, Severity)>,
    complex_object: Option<(ComplexObjectConfig, Severity)>,
}

impl RuleSet {
    /// Validate and compile the rule sections. Disabled sections are skipped
    /// entirely and are not validated.
    pub fn from_config(rules: &RulesConfig) -> Result<Self, ConfigurationError> {
        let mut set = RuleSet::default();

        if let Some(opts) = rules.duplicate_string.as_ref().filter(|o| o.enabled) {
            set.duplicate_string = Some((DuplicateStringConfig::from_options(opts)?, opts.severity));
        }
        if let Some(opts) = rules.magic_numbers.as_ref().filter(|o| o.enabled) {
            set.magic_numbers = Some((MagicNumberConfig::from_options(opts)?, opts.severity));
        }
        if let Some(opts) = rules.complex_object.as_ref().filter(|o| o.enabled) {
            set.complex_object = Some((ComplexObjectConfig::from_options(opts)?, opts.severity));
        }

        Ok(set)
    }

    /// Fresh rule instances for one analyzed file.
    pub fn instantiate(&self) -> Vec<Box<dyn Rule>> {
        let mut rules: Vec<Box<dyn Rule>> = Vec::new();
        if let Some((config, _)) = &self.duplicate_string {
            rules.push(Box::new(DuplicateStringRule::new(config.clone())));
        }
        if let Some((config, _)) = &self.magic_numbers {
            rules.push(Box::new(MagicNumberRule::new(config.clone())));
        }
        if let Some((config, _)) = &self.complex_object {
            rules.push(Box::new(ComplexObjectRule::new(config.clone())));
        }
        rules
    }

    pub fn enabled(&self) -> Vec<RuleId> {
        RuleId::ALL
            .into_iter()
            .filter(|id| self.severity_of(*id).is_some())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.enabled().is_empty()
    }

    fn severity_of(&self, id: RuleId) -> Option<Severity> {
        match id {
            RuleId::DuplicateString => self.duplicate_string.as_ref().map(|(_, s)| *s),
            RuleId::MagicNumbers => self.magic_numbers.as_ref().map(|(_, s)| *s),
            RuleId::ImplicitComplexObject => self.complex_object.as_ref().map(|(_, s)| *s),
        }
    }

    /// Configured severity of `id`; a disabled rule reports the default.
    pub fn severity(&self, id: RuleId) -> Severity {
        self.severity_of(id).unwrap_or_default()
    }
}
