//! Magic numbers: numeric literals used without a named constant.
//!
//! Each numeric literal goes through an ordered list of exemptions; the
//! first one that applies ends the evaluation. The order is:
//!
//! 1. ignored values
//! 2. structural allow-list: array index, default value, class field,
//!    enum member, literal type, readonly class property, type index
//! 3. object property values (only while object detection is off)
//! 4. property-name patterns, then callee-name patterns
//! 5. initializers of `const` bindings (deep, through object/array nesting)
//!
//! Name patterns come after the structural checks so that they can never
//! stand in for a disabled structural exemption, and the constant walk is
//! last because it is the only unbounded one. A literal that survives is
//! either a `must-use-const` (a plain binding initializer while
//! `enforce_constant` is on) or a `magic-number`, never both.

use crate::config::MagicNumberOptions;
use crate::engine::{
    callee_name, classify, find_enclosing_call, is_part_of_constant_declaration, property_name,
    Diagnostic, DiagnosticSink, LiteralSet, MessageData, PatternSet, Sign, StructuralRole,
};
use crate::error::ConfigurationError;
use crate::syntax::{NodeId, NodeKind, SyntaxTree};

use super::{Rule, RuleId};

/// Compiled options of the magic-number rule.
#[derive(Debug, Clone, Default)]
pub struct MagicNumberConfig {
    pub detect_objects: bool,
    pub enforce_constant: bool,
    pub ignore: LiteralSet,
    pub ignore_array_indexes: bool,
    pub ignore_default_values: bool,
    pub ignore_class_field_initial_values: bool,
    pub ignore_enums: bool,
    pub ignore_numeric_literal_types: bool,
    pub ignore_readonly_class_properties: bool,
    pub ignore_type_indexes: bool,
    pub ignore_property_patterns: PatternSet,
    pub ignore_callee_patterns: PatternSet,
}

impl MagicNumberConfig {
    pub fn from_options(opts: &MagicNumberOptions) -> Result<Self, ConfigurationError> {
        Ok(Self {
            detect_objects: opts.detect_objects,
            enforce_constant: opts.enforce_constant,
            ignore: LiteralSet::from_numbers(opts.ignore.iter().copied()),
            ignore_array_indexes: opts.ignore_array_indexes,
            ignore_default_values: opts.ignore_default_values,
            ignore_class_field_initial_values: opts.ignore_class_field_initial_values,
            ignore_enums: opts.ignore_enums,
            ignore_numeric_literal_types: opts.ignore_numeric_literal_types,
            ignore_readonly_class_properties: opts.ignore_readonly_class_properties,
            ignore_type_indexes: opts.ignore_type_indexes,
            ignore_property_patterns: PatternSet::compile(
                "ignore_property_patterns",
                &opts.ignore_property_patterns,
            )?,
            ignore_callee_patterns: PatternSet::compile(
                "ignore_callee_patterns",
                &opts.ignore_callee_patterns,
            )?,
        })
    }
}

/// Which check exempted a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exemption {
    IgnoredValue,
    ArrayIndex,
    DefaultValue,
    ClassFieldInitializer,
    EnumMember,
    NumericLiteralType,
    ReadonlyClassProperty,
    TypeIndex,
    ObjectProperty,
    PropertyPattern,
    CalleePattern,
    ConstantDeclaration,
}

/// Outcome of evaluating one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Not a numeric literal.
    NotApplicable,
    Exempt(Exemption),
    MustUseConst,
    MagicNumber,
}

/// The ordered exemption checks.
#[derive(Debug, Clone, Default)]
pub struct MagicNumberPolicy {
    config: MagicNumberConfig,
}

impl MagicNumberPolicy {
    pub fn new(config: MagicNumberConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MagicNumberConfig {
        &self.config
    }

    pub fn evaluate(&self, tree: &SyntaxTree, node: NodeId) -> Verdict {
        let Some(value) = tree.node(node).literal_number() else {
            return Verdict::NotApplicable;
        };
        let cfg = &self.config;
        let role = classify(tree, node);

        if self.is_ignored_value(value, role.sign()) {
            return Verdict::Exempt(Exemption::IgnoredValue);
        }

        if let Some(exemption) = self.structural_exemption(role.unsigned()) {
            return Verdict::Exempt(exemption);
        }

        if !cfg.detect_objects && *role.unsigned() == StructuralRole::ObjectPropertyValue {
            return Verdict::Exempt(Exemption::ObjectProperty);
        }

        if !cfg.ignore_property_patterns.is_empty() {
            if let Some(name) = property_name(tree, node) {
                if cfg.ignore_property_patterns.matches_any(&name) {
                    return Verdict::Exempt(Exemption::PropertyPattern);
                }
            }
        }

        if !cfg.ignore_callee_patterns.is_empty() {
            let callee = find_enclosing_call(tree, node).and_then(|call| callee_name(tree, call));
            if callee.is_some_and(|name| cfg.ignore_callee_patterns.matches_any(name)) {
                return Verdict::Exempt(Exemption::CalleePattern);
            }
        }

        if is_part_of_constant_declaration(tree, node) {
            return Verdict::Exempt(Exemption::ConstantDeclaration);
        }

        if cfg.enforce_constant && *role.unsigned() == StructuralRole::BindingInitializer {
            return Verdict::MustUseConst;
        }

        Verdict::MagicNumber
    }

    /// `ignore` matches the literal's own value; under a unary minus the
    /// negated value matches as well, so both `1` and `-1` cover `-1`.
    fn is_ignored_value(&self, value: f64, sign: Option<Sign>) -> bool {
        let ignore = &self.config.ignore;
        ignore.contains_number(value) || (sign == Some(Sign::Minus) && ignore.contains_number(-value))
    }

    fn structural_exemption(&self, role: &StructuralRole) -> Option<Exemption> {
        let cfg = &self.config;
        let checks = [
            (
                cfg.ignore_array_indexes,
                matches!(role, StructuralRole::ArrayIndexAccess),
                Exemption::ArrayIndex,
            ),
            (
                cfg.ignore_default_values,
                matches!(role, StructuralRole::DefaultValue),
                Exemption::DefaultValue,
            ),
            (
                cfg.ignore_class_field_initial_values,
                matches!(
                    role,
                    StructuralRole::ClassFieldInitializer | StructuralRole::ReadonlyClassProperty
                ),
                Exemption::ClassFieldInitializer,
            ),
            (
                cfg.ignore_enums,
                matches!(role, StructuralRole::EnumMember),
                Exemption::EnumMember,
            ),
            (
                cfg.ignore_numeric_literal_types,
                matches!(role, StructuralRole::NumericLiteralType),
                Exemption::NumericLiteralType,
            ),
            (
                cfg.ignore_readonly_class_properties,
                matches!(role, StructuralRole::ReadonlyClassProperty),
                Exemption::ReadonlyClassProperty,
            ),
            (
                cfg.ignore_type_indexes,
                matches!(role, StructuralRole::TypeIndex),
                Exemption::TypeIndex,
            ),
        ];
        checks
            .into_iter()
            .find(|(enabled, applies, _)| *enabled && *applies)
            .map(|(_, _, exemption)| exemption)
    }
}

/// Reports magic numbers as soon as they are visited.
pub struct MagicNumberRule {
    policy: MagicNumberPolicy,
}

impl MagicNumberRule {
    pub fn new(config: MagicNumberConfig) -> Self {
        Self {
            policy: MagicNumberPolicy::new(config),
        }
    }
}

impl Rule for MagicNumberRule {
    fn id(&self) -> RuleId {
        RuleId::MagicNumbers
    }

    fn interests(&self) -> &'static [NodeKind] {
        &[NodeKind::Literal]
    }

    fn check(&mut self, tree: &SyntaxTree, node: NodeId, sink: &mut dyn DiagnosticSink) {
        let literal = tree.node(node);
        let raw = || {
            literal
                .raw
                .clone()
                .or_else(|| literal.literal_number().map(|n| n.to_string()))
                .unwrap_or_default()
        };

        let data = match self.policy.evaluate(tree, node) {
            Verdict::NotApplicable => return,
            Verdict::Exempt(exemption) => {
                tracing::debug!(at = %literal.position, ?exemption, "numeric literal exempt");
                return;
            }
            Verdict::MustUseConst => MessageData::MustUseConst { raw: raw() },
            Verdict::MagicNumber => MessageData::MagicNumber { raw: raw() },
        };

        sink.report(Diagnostic {
            node,
            position: literal.position,
            data,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DiagnosticKind;
    use crate::syntax::{DeclarationKind, Slot, SyntaxNode};

    fn program() -> SyntaxTree {
        SyntaxTree::new(SyntaxNode::new(NodeKind::Program))
    }

    fn declarator(tree: &mut SyntaxTree, kind: DeclarationKind, name: &str) -> NodeId {
        let decl = tree.add(
            tree.root(),
            Slot::Body,
            SyntaxNode::new(NodeKind::VariableDeclaration).with_declaration_kind(kind),
        );
        let declarator = tree.add(decl, Slot::Declaration, SyntaxNode::new(NodeKind::VariableDeclarator));
        tree.add(declarator, Slot::Id, SyntaxNode::identifier(name));
        declarator
    }

    /// `arr[<n>]` as an expression statement.
    fn index_access(tree: &mut SyntaxTree, n: f64) -> NodeId {
        let member = tree.add(tree.root(), Slot::Body, SyntaxNode::new(NodeKind::Member));
        tree.add(member, Slot::Object, SyntaxNode::identifier("arr"));
        tree.add(member, Slot::Property, SyntaxNode::number(n, &n.to_string()).at(1, 5))
    }

    fn policy(config: MagicNumberConfig) -> MagicNumberPolicy {
        MagicNumberPolicy::new(config)
    }

    fn run(config: MagicNumberConfig, tree: &SyntaxTree) -> Vec<Diagnostic> {
        let mut rule = MagicNumberRule::new(config);
        let mut sink = Vec::new();
        for id in tree.preorder() {
            if rule.interests().contains(&tree.kind(id)) {
                rule.check(tree, id, &mut sink);
            }
        }
        sink
    }

    #[test]
    fn test_plain_literal_is_magic() {
        let mut tree = program();
        let five = index_access(&mut tree, 5.0);
        assert_eq!(policy(MagicNumberConfig::default()).evaluate(&tree, five), Verdict::MagicNumber);
    }

    #[test]
    fn test_non_numbers_are_not_applicable() {
        let mut tree = program();
        let s = tree.add(tree.root(), Slot::Body, SyntaxNode::string("five"));
        assert_eq!(
            policy(MagicNumberConfig::default()).evaluate(&tree, s),
            Verdict::NotApplicable
        );
    }

    #[test]
    fn test_ignored_values_match_signed_form() {
        let mut tree = program();
        let neg = tree.add(tree.root(), Slot::Body, SyntaxNode::new(NodeKind::Unary).with_operator("-"));
        let one = tree.add(neg, Slot::Argument, SyntaxNode::number(1.0, "1"));
        let two = tree.add(tree.root(), Slot::Body, SyntaxNode::number(2.0, "2"));

        let only_negative = MagicNumberConfig {
            ignore: LiteralSet::from_numbers([-1.0]),
            ..Default::default()
        };
        assert_eq!(
            policy(only_negative.clone()).evaluate(&tree, one),
            Verdict::Exempt(Exemption::IgnoredValue)
        );
        assert_eq!(policy(only_negative).evaluate(&tree, two), Verdict::MagicNumber);

        let only_positive = MagicNumberConfig {
            ignore: LiteralSet::from_numbers([1.0]),
            ..Default::default()
        };
        assert_eq!(
            policy(only_positive).evaluate(&tree, one),
            Verdict::Exempt(Exemption::IgnoredValue)
        );
    }

    #[test]
    fn test_array_index_beats_enforce_constant() {
        let mut tree = program();
        let five = index_access(&mut tree, 5.0);
        let config = MagicNumberConfig {
            ignore_array_indexes: true,
            enforce_constant: true,
            ..Default::default()
        };
        assert_eq!(
            policy(config.clone()).evaluate(&tree, five),
            Verdict::Exempt(Exemption::ArrayIndex)
        );
        assert!(run(config, &tree).is_empty());
    }

    #[test]
    fn test_signed_index_exempt_like_unsigned() {
        let mut tree = program();
        let member = tree.add(tree.root(), Slot::Body, SyntaxNode::new(NodeKind::Member));
        tree.add(member, Slot::Object, SyntaxNode::identifier("arr"));
        let neg = tree.add(member, Slot::Property, SyntaxNode::new(NodeKind::Unary).with_operator("-"));
        let five = tree.add(neg, Slot::Argument, SyntaxNode::number(5.0, "5"));

        let config = MagicNumberConfig {
            ignore_array_indexes: true,
            ..Default::default()
        };
        assert_eq!(
            policy(config).evaluate(&tree, five),
            Verdict::Exempt(Exemption::ArrayIndex)
        );
    }

    #[test]
    fn test_structural_checks_disabled_by_default() {
        let mut tree = program();
        let five = index_access(&mut tree, 5.0);
        let enum_member = tree.add(tree.root(), Slot::Member, SyntaxNode::new(NodeKind::EnumMember));
        let member_value = tree.add(enum_member, Slot::Init, SyntaxNode::number(1.0, "1"));

        let p = policy(MagicNumberConfig::default());
        assert_eq!(p.evaluate(&tree, five), Verdict::MagicNumber);
        assert_eq!(p.evaluate(&tree, member_value), Verdict::MagicNumber);

        let enums = policy(MagicNumberConfig {
            ignore_enums: true,
            ..Default::default()
        });
        assert_eq!(
            enums.evaluate(&tree, member_value),
            Verdict::Exempt(Exemption::EnumMember)
        );
    }

    #[test]
    fn test_readonly_property_exempt_by_either_option() {
        let mut tree = program();
        let field = tree.add(
            tree.root(),
            Slot::Member,
            SyntaxNode::new(NodeKind::PropertyDefinition).with_readonly(true),
        );
        let id = tree.add(field, Slot::Value, SyntaxNode::number(42.0, "42"));

        let fields = policy(MagicNumberConfig {
            ignore_class_field_initial_values: true,
            ..Default::default()
        });
        assert_eq!(
            fields.evaluate(&tree, id),
            Verdict::Exempt(Exemption::ClassFieldInitializer)
        );

        let readonly = policy(MagicNumberConfig {
            ignore_readonly_class_properties: true,
            ..Default::default()
        });
        assert_eq!(
            readonly.evaluate(&tree, id),
            Verdict::Exempt(Exemption::ReadonlyClassProperty)
        );
    }

    #[test]
    fn test_object_values_need_detect_objects() {
        let mut tree = program();
        let d = declarator(&mut tree, DeclarationKind::Let, "box");
        let object = tree.add(d, Slot::Init, SyntaxNode::new(NodeKind::Object));
        let prop = tree.add(object, Slot::Property, SyntaxNode::new(NodeKind::Property));
        tree.add(prop, Slot::Key, SyntaxNode::identifier("height"));
        let value = tree.add(prop, Slot::Value, SyntaxNode::number(55.0, "55"));

        assert_eq!(
            policy(MagicNumberConfig::default()).evaluate(&tree, value),
            Verdict::Exempt(Exemption::ObjectProperty)
        );
        let detect = MagicNumberConfig {
            detect_objects: true,
            enforce_constant: true,
            ..Default::default()
        };
        // Not a direct initializer of the binding, so never must-use-const.
        assert_eq!(policy(detect).evaluate(&tree, value), Verdict::MagicNumber);
    }

    #[test]
    fn test_property_pattern() {
        let mut tree = program();
        let object = tree.add(tree.root(), Slot::Body, SyntaxNode::new(NodeKind::Object));
        let prop = tree.add(object, Slot::Property, SyntaxNode::new(NodeKind::Property));
        tree.add(prop, Slot::Key, SyntaxNode::identifier("maxWidth"));
        let value = tree.add(prop, Slot::Value, SyntaxNode::number(55.0, "55"));

        let config = MagicNumberConfig {
            detect_objects: true,
            ignore_property_patterns: PatternSet::compile("p", &["^width$|Width$"]).unwrap(),
            ..Default::default()
        };
        assert_eq!(
            policy(config).evaluate(&tree, value),
            Verdict::Exempt(Exemption::PropertyPattern)
        );
    }

    #[test]
    fn test_callee_pattern_through_conditional() {
        let mut tree = program();
        let call = tree.add(tree.root(), Slot::Body, SyntaxNode::new(NodeKind::Call));
        tree.add(call, Slot::Callee, SyntaxNode::identifier("setTimeout"));
        tree.add(call, Slot::Argument, SyntaxNode::identifier("tick"));
        let cond = tree.add(call, Slot::Argument, SyntaxNode::new(NodeKind::Conditional));
        tree.add(cond, Slot::Test, SyntaxNode::identifier("slow"));
        let a = tree.add(cond, Slot::Consequent, SyntaxNode::number(1000.0, "1000"));
        let b = tree.add(cond, Slot::Alternate, SyntaxNode::number(100.0, "100"));

        let config = MagicNumberConfig {
            ignore_callee_patterns: PatternSet::compile("c", &["^(setTimeout|delay)$"]).unwrap(),
            ..Default::default()
        };
        let p = policy(config);
        assert_eq!(p.evaluate(&tree, a), Verdict::Exempt(Exemption::CalleePattern));
        assert_eq!(p.evaluate(&tree, b), Verdict::Exempt(Exemption::CalleePattern));
    }

    #[test]
    fn test_enforce_constant_scenario() {
        let config = MagicNumberConfig {
            enforce_constant: true,
            ..Default::default()
        };

        let mut mutable = program();
        let d = declarator(&mut mutable, DeclarationKind::Let, "x");
        mutable.add(d, Slot::Init, SyntaxNode::number(7.0, "7").at(1, 9));
        let found = run(config.clone(), &mutable);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind(), DiagnosticKind::MustUseConst);
        assert_eq!(found[0].position.column, 9);

        let mut constant = program();
        let d = declarator(&mut constant, DeclarationKind::Const, "x");
        constant.add(d, Slot::Init, SyntaxNode::number(7.0, "7"));
        assert!(run(config, &constant).is_empty());
    }

    #[test]
    fn test_negative_initializer_must_use_const() {
        let mut tree = program();
        let d = declarator(&mut tree, DeclarationKind::Var, "offset");
        let neg = tree.add(d, Slot::Init, SyntaxNode::new(NodeKind::Unary).with_operator("-"));
        let five = tree.add(neg, Slot::Argument, SyntaxNode::number(5.0, "5"));

        let config = MagicNumberConfig {
            enforce_constant: true,
            ..Default::default()
        };
        assert_eq!(policy(config).evaluate(&tree, five), Verdict::MustUseConst);
    }

    #[test]
    fn test_magic_number_message_uses_raw_text() {
        let mut tree = program();
        let call = tree.add(tree.root(), Slot::Body, SyntaxNode::new(NodeKind::Call));
        tree.add(call, Slot::Callee, SyntaxNode::identifier("resize"));
        tree.add(call, Slot::Argument, SyntaxNode::number(255.0, "0xff").at(3, 8));

        let found = run(MagicNumberConfig::default(), &tree);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind(), DiagnosticKind::MagicNumber);
        assert_eq!(found[0].message(), "no magic number: 0xff");
        assert_eq!(found[0].position.line, 3);
    }
}
