//! Object-shaped bindings and parameters without a named type.

use crate::config::ComplexObjectOptions;
use crate::engine::{Diagnostic, DiagnosticSink, MessageData, PatternSet};
use crate::error::ConfigurationError;
use crate::syntax::{NodeId, NodeKind, Slot, SyntaxTree};

use super::{Rule, RuleId};

pub const DEFAULT_PROPERTY_THRESHOLD: usize = 2;

/// Compiled options of the complex-object rule.
#[derive(Debug, Clone)]
pub struct ComplexObjectConfig {
    pub property_threshold: usize,
    /// When set, `ref({...})`-style wrapper calls are not looked into.
    pub ignore_wrapper_calls: bool,
    pub wrapper_calls: Vec<String>,
    pub ignore_name_patterns: PatternSet,
}

impl Default for ComplexObjectConfig {
    fn default() -> Self {
        Self {
            property_threshold: DEFAULT_PROPERTY_THRESHOLD,
            ignore_wrapper_calls: false,
            wrapper_calls: vec!["ref".to_string(), "reactive".to_string()],
            ignore_name_patterns: PatternSet::default(),
        }
    }
}

impl ComplexObjectConfig {
    pub fn from_options(opts: &ComplexObjectOptions) -> Result<Self, ConfigurationError> {
        if opts.property_threshold < 1 {
            return Err(ConfigurationError::OutOfRange {
                option: "property_threshold",
                value: opts.property_threshold,
                minimum: 1,
            });
        }
        Ok(Self {
            property_threshold: opts.property_threshold,
            ignore_wrapper_calls: opts.ignore_wrapper_calls,
            wrapper_calls: opts.wrapper_calls.clone(),
            ignore_name_patterns: PatternSet::compile(
                "ignore_name_patterns",
                &opts.ignore_name_patterns,
            )?,
        })
    }
}

pub struct ComplexObjectRule {
    config: ComplexObjectConfig,
}

impl ComplexObjectRule {
    pub fn new(config: ComplexObjectConfig) -> Self {
        Self { config }
    }

    fn is_ignored_name(&self, name: Option<&str>) -> bool {
        name.is_some_and(|n| self.config.ignore_name_patterns.matches_any(n))
    }

    fn is_wrapper_call(&self, tree: &SyntaxTree, call: NodeId) -> bool {
        let Some(callee) = tree.child(call, Slot::Callee) else {
            return false;
        };
        let callee = tree.node(callee);
        callee.kind == NodeKind::Identifier
            && callee
                .name
                .as_deref()
                .is_some_and(|n| self.config.wrapper_calls.iter().any(|w| w == n))
    }

    /// Report an inline `{ ... }` type on `binding` with enough members.
    /// Returns whether a finding was reported.
    fn check_inline_type(
        &self,
        tree: &SyntaxTree,
        binding: NodeId,
        name: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> bool {
        let Some(ty) = tree
            .child(binding, Slot::TypeAnnotation)
            .and_then(|annotation| tree.child(annotation, Slot::Type))
        else {
            return false;
        };
        if tree.kind(ty) != NodeKind::TypeLiteral {
            return false;
        }
        let members = tree.children_in(ty, Slot::Member).count();
        if members < self.config.property_threshold {
            return false;
        }
        self.report(tree, binding, name, members, sink);
        true
    }

    fn check_declarator(&self, tree: &SyntaxTree, declarator: NodeId, sink: &mut dyn DiagnosticSink) {
        let Some(id) = tree.child(declarator, Slot::Id) else {
            return;
        };
        let name = tree.node(id).name.as_deref();
        if self.is_ignored_name(name) {
            return;
        }
        let name = name.unwrap_or("variable");
        if self.check_inline_type(tree, id, name, sink) {
            return;
        }

        let Some(init) = tree.child(declarator, Slot::Init) else {
            return;
        };
        let object = match tree.kind(init) {
            NodeKind::Object => init,
            NodeKind::Call if !self.config.ignore_wrapper_calls && self.is_wrapper_call(tree, init) => {
                if tree.child(init, Slot::TypeArguments).is_some() {
                    return;
                }
                match tree.child(init, Slot::Argument) {
                    Some(arg) if tree.kind(arg) == NodeKind::Object => arg,
                    _ => return,
                }
            }
            _ => return,
        };

        if tree.child(id, Slot::TypeAnnotation).is_some() {
            return;
        }
        let properties = tree.children_in(object, Slot::Property).count();
        if properties >= self.config.property_threshold {
            self.report(tree, id, name, properties, sink);
        }
    }

    fn check_params(&self, tree: &SyntaxTree, function: NodeId, sink: &mut dyn DiagnosticSink) {
        for param in tree.children_in(function, Slot::Param) {
            let binding = match tree.kind(param) {
                NodeKind::AssignmentPattern => match tree.child(param, Slot::Left) {
                    Some(left) => left,
                    None => continue,
                },
                _ => param,
            };
            let name = match tree.node(binding) {
                n if n.kind == NodeKind::Identifier => n.name.as_deref(),
                _ => None,
            };
            if self.is_ignored_name(name) {
                continue;
            }
            self.check_inline_type(tree, binding, name.unwrap_or("parameter"), sink);
        }
    }

    fn report(
        &self,
        tree: &SyntaxTree,
        node: NodeId,
        name: &str,
        props: usize,
        sink: &mut dyn DiagnosticSink,
    ) {
        sink.report(Diagnostic {
            node,
            position: tree.node(node).position,
            data: MessageData::MissingExplicitType {
                name: name.to_string(),
                props,
            },
        });
    }
}

impl Rule for ComplexObjectRule {
    fn id(&self) -> RuleId {
        RuleId::ImplicitComplexObject
    }

    fn interests(&self) -> &'static [NodeKind] {
        &[NodeKind::VariableDeclarator, NodeKind::Function]
    }

    fn check(&mut self, tree: &SyntaxTree, node: NodeId, sink: &mut dyn DiagnosticSink) {
        match tree.kind(node) {
            NodeKind::VariableDeclarator => self.check_declarator(tree, node, sink),
            NodeKind::Function => self.check_params(tree, node, sink),
            _ => {}
        }
    }
}
