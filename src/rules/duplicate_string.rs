//! Duplicate strings: the same text literal repeated across a file.
//!
//! Occurrences are collected during the traversal and only judged in
//! [`Rule::finish`], once the whole file has been seen.

use indexmap::IndexMap;

use crate::config::DuplicateStringOptions;
use crate::engine::{
    enclosing_call_names, preview, Diagnostic, DiagnosticSink, LiteralSet, MessageData, PatternSet,
};
use crate::error::ConfigurationError;
use crate::syntax::{NodeId, NodeKind, Position, Slot, SyntaxTree};

use super::{Rule, RuleId};

pub const DEFAULT_THRESHOLD: usize = 2;
pub const DEFAULT_MIN_LENGTH: usize = 5;

/// Compiled options of the duplicate-string rule.
#[derive(Debug, Clone)]
pub struct DuplicateStringConfig {
    pub threshold: usize,
    pub min_length: usize,
    pub ignore_values: LiteralSet,
    /// Matched against the text itself and against enclosing callee names.
    pub ignore_patterns: PatternSet,
    pub ignore_type_literal_positions: bool,
}

impl Default for DuplicateStringConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            min_length: DEFAULT_MIN_LENGTH,
            ignore_values: LiteralSet::default(),
            ignore_patterns: PatternSet::default(),
            ignore_type_literal_positions: true,
        }
    }
}

impl DuplicateStringConfig {
    pub fn from_options(opts: &DuplicateStringOptions) -> Result<Self, ConfigurationError> {
        if opts.threshold < 2 {
            return Err(ConfigurationError::OutOfRange {
                option: "threshold",
                value: opts.threshold,
                minimum: 2,
            });
        }
        if opts.min_length < 2 {
            return Err(ConfigurationError::OutOfRange {
                option: "min_length",
                value: opts.min_length,
                minimum: 2,
            });
        }
        Ok(Self {
            threshold: opts.threshold,
            min_length: opts.min_length,
            ignore_values: LiteralSet::from_texts(opts.ignore_values.iter().cloned()),
            ignore_patterns: PatternSet::compile("ignore_patterns", &opts.ignore_patterns)?,
            ignore_type_literal_positions: opts.ignore_type_literal_positions,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct Occurrence {
    node: NodeId,
    position: Position,
}

/// Groups qualifying text literals by value, in first-seen order.
pub struct DuplicateStringRule {
    config: DuplicateStringConfig,
    occurrences: IndexMap<String, Vec<Occurrence>>,
}

impl DuplicateStringRule {
    pub fn new(config: DuplicateStringConfig) -> Self {
        Self {
            config,
            occurrences: IndexMap::new(),
        }
    }

    /// Import/re-export sources and property keys are never counted;
    /// literal types (including the index of `T['key']`) only when
    /// configured.
    fn in_excluded_position(&self, tree: &SyntaxTree, node: NodeId) -> bool {
        let Some(parent) = tree.parent(node) else {
            return false;
        };
        let slot = tree.node(node).slot;
        match tree.kind(parent) {
            NodeKind::Import | NodeKind::Export => slot == Slot::Source,
            NodeKind::LiteralType => self.config.ignore_type_literal_positions,
            NodeKind::IndexedAccessType => {
                slot == Slot::Index && self.config.ignore_type_literal_positions
            }
            NodeKind::Property => slot == Slot::Key,
            _ => false,
        }
    }

    fn is_exempt(&self, tree: &SyntaxTree, node: NodeId, value: &str) -> bool {
        let cfg = &self.config;
        if value.chars().count() < cfg.min_length {
            return true;
        }
        if cfg.ignore_values.contains_text(value) {
            return true;
        }
        if cfg.ignore_patterns.matches_any(value) {
            return true;
        }
        enclosing_call_names(tree, node).any(|name| cfg.ignore_patterns.matches_any(name))
    }

    fn record(&mut self, tree: &SyntaxTree, node: NodeId, value: &str) {
        if self.is_exempt(tree, node, value) {
            return;
        }
        let occurrence = Occurrence {
            node,
            position: tree.node(node).position,
        };
        match self.occurrences.get_mut(value) {
            Some(group) => group.push(occurrence),
            None => {
                self.occurrences.insert(value.to_string(), vec![occurrence]);
            }
        }
    }
}

/// Text of a template with no substitutions and a single non-empty quasi.
fn plain_template_text(tree: &SyntaxTree, template: NodeId) -> Option<&str> {
    if tree.children_in(template, Slot::Expression).next().is_some() {
        return None;
    }
    let mut quasis = tree.children_in(template, Slot::Quasi);
    let quasi = quasis.next()?;
    if quasis.next().is_some() {
        return None;
    }
    tree.node(quasi)
        .raw
        .as_deref()
        .filter(|text| !text.is_empty())
}

impl Rule for DuplicateStringRule {
    fn id(&self) -> RuleId {
        RuleId::DuplicateString
    }

    fn interests(&self) -> &'static [NodeKind] {
        &[NodeKind::Literal, NodeKind::TemplateLiteral]
    }

    fn check(&mut self, tree: &SyntaxTree, node: NodeId, _sink: &mut dyn DiagnosticSink) {
        match tree.kind(node) {
            NodeKind::Literal => {
                let Some(value) = tree.node(node).literal_str() else {
                    return;
                };
                if self.in_excluded_position(tree, node) {
                    return;
                }
                self.record(tree, node, value);
            }
            NodeKind::TemplateLiteral => {
                if let Some(text) = plain_template_text(tree, node) {
                    self.record(tree, node, text);
                }
            }
            _ => {}
        }
    }

    fn finish(&mut self, _tree: &SyntaxTree, sink: &mut dyn DiagnosticSink) {
        let threshold = self.config.threshold;
        for (value, group) in std::mem::take(&mut self.occurrences) {
            if group.len() < threshold {
                continue;
            }
            let mut lines: Vec<usize> = group.iter().map(|o| o.position.line).collect();
            lines.sort_unstable();
            let preview = preview(&value);
            tracing::debug!(value = %preview, count = group.len(), "duplicate string group");

            for occurrence in &group {
                sink.report(Diagnostic {
                    node: occurrence.node,
                    position: occurrence.position,
                    data: MessageData::DuplicateString {
                        preview: preview.clone(),
                        count: group.len(),
                        threshold,
                        lines: lines.clone(),
                    },
                });
            }
        }
    }
}
