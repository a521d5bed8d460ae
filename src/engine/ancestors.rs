//! Structural classification of a node relative to its ancestors.
//!
//! All lookups here only follow parent links and read child slots. A shape
//! that does not match (including the root, which has no parent) is simply
//! "no match"; none of these functions can fail.

use crate::syntax::{DeclarationKind, NodeId, NodeKind, Slot, SyntaxTree};

/// How many ancestors [`enclosing_call_names`] inspects.
pub const CALL_NAME_DEPTH: usize = 4;

/// Sign of a unary `+`/`-` wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

/// Immediate structural role of a node in its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralRole {
    None,
    /// `arr[5]`
    ArrayIndexAccess,
    /// `function f(a = 5)`, `const { a = 5 } = o`
    DefaultValue,
    /// `class A { x = 5 }`
    ClassFieldInitializer,
    /// `class A { readonly x = 5 }`
    ReadonlyClassProperty,
    /// `enum E { A = 5 }`
    EnumMember,
    /// `type T = 5`, `type T = 1 | 2`
    NumericLiteralType,
    /// `type T = Data[0]`
    TypeIndex,
    /// `{ width: 5 }`
    ObjectPropertyValue,
    /// `<div width={5} />`
    JsxAttributeValue,
    /// `f(5)`, `new F(5)`
    CallArgument,
    /// Operand of a conditional, logical or optional-chain wrapper.
    PassThrough,
    /// `let x = 5`
    BindingInitializer,
    /// The node sits under a unary sign; `role` classifies the sign node.
    UnarySigned {
        sign: Sign,
        role: Box<StructuralRole>,
    },
}

impl StructuralRole {
    /// The role with any sign wrapper removed.
    pub fn unsigned(&self) -> &StructuralRole {
        match self {
            StructuralRole::UnarySigned { role, .. } => role,
            other => other,
        }
    }

    pub fn sign(&self) -> Option<Sign> {
        match self {
            StructuralRole::UnarySigned { sign, .. } => Some(*sign),
            _ => None,
        }
    }
}

/// The node that stands in for `node` in structural checks.
///
/// When the immediate parent is a unary `+`/`-`, the sign node is returned
/// instead, so `-5` is positioned exactly like `5`. Only one level is
/// unwrapped: in `- -5` the inner sign node is the subject.
pub fn signed_subject(tree: &SyntaxTree, node: NodeId) -> (NodeId, Option<Sign>) {
    match tree.parent(node) {
        Some(parent) if tree.node(parent).is_sign() => {
            let sign = match tree.node(parent).operator.as_deref() {
                Some("-") => Sign::Minus,
                _ => Sign::Plus,
            };
            (parent, Some(sign))
        }
        _ => (node, None),
    }
}

/// Classify `node` by its (sign-unwrapped) position in the parent.
pub fn classify(tree: &SyntaxTree, node: NodeId) -> StructuralRole {
    let (subject, sign) = signed_subject(tree, node);
    let role = classify_subject(tree, subject);
    match sign {
        Some(sign) => StructuralRole::UnarySigned {
            sign,
            role: Box::new(role),
        },
        None => role,
    }
}

fn classify_subject(tree: &SyntaxTree, subject: NodeId) -> StructuralRole {
    let Some(parent) = tree.parent(subject) else {
        return StructuralRole::None;
    };
    let slot = tree.node(subject).slot;
    let owner = tree.node(parent);

    match (owner.kind, slot) {
        (NodeKind::Member, Slot::Property) => StructuralRole::ArrayIndexAccess,
        (NodeKind::AssignmentPattern, Slot::Right) => StructuralRole::DefaultValue,
        (NodeKind::PropertyDefinition, Slot::Value) if owner.readonly => {
            StructuralRole::ReadonlyClassProperty
        }
        (NodeKind::PropertyDefinition, Slot::Value) => StructuralRole::ClassFieldInitializer,
        (NodeKind::EnumMember, _) => StructuralRole::EnumMember,
        (NodeKind::LiteralType, _) | (NodeKind::UnionType, Slot::Type) => {
            StructuralRole::NumericLiteralType
        }
        (NodeKind::IndexedAccessType, Slot::Index) => StructuralRole::TypeIndex,
        (NodeKind::Property, Slot::Value) => StructuralRole::ObjectPropertyValue,
        (NodeKind::JsxExpressionContainer, _)
            if owner
                .parent
                .is_some_and(|gp| tree.kind(gp) == NodeKind::JsxAttribute) =>
        {
            StructuralRole::JsxAttributeValue
        }
        (NodeKind::Call | NodeKind::New, Slot::Argument) => StructuralRole::CallArgument,
        (NodeKind::Conditional | NodeKind::Logical | NodeKind::Chain, _) => {
            StructuralRole::PassThrough
        }
        (NodeKind::VariableDeclarator, Slot::Init) => StructuralRole::BindingInitializer,
        _ => StructuralRole::None,
    }
}

/// Name of the property or JSX attribute whose value is `node`.
///
/// Identifier keys give their name, literal keys their value as text.
pub fn property_name(tree: &SyntaxTree, node: NodeId) -> Option<String> {
    let (subject, _) = signed_subject(tree, node);
    let parent = tree.parent(subject)?;

    match classify_subject(tree, subject) {
        StructuralRole::ObjectPropertyValue => {
            let key = tree.node(tree.child(parent, Slot::Key)?);
            match key.kind {
                NodeKind::Identifier => key.name.clone(),
                NodeKind::Literal => key.value.as_ref().map(|v| v.to_key_string()),
                _ => None,
            }
        }
        StructuralRole::JsxAttributeValue => {
            let attribute = tree.parent(parent)?;
            let name = tree.node(tree.child(attribute, Slot::Name)?);
            name.name.clone()
        }
        _ => None,
    }
}

/// Simple name of a call's callee: the identifier, or the property of a
/// member access (`console.log` gives `log`).
pub fn callee_name(tree: &SyntaxTree, call: NodeId) -> Option<&str> {
    let callee = tree.child(call, Slot::Callee)?;
    let node = tree.node(callee);
    match node.kind {
        NodeKind::Identifier => node.name.as_deref(),
        NodeKind::Member => {
            let property = tree.node(tree.child(callee, Slot::Property)?);
            if property.kind == NodeKind::Identifier {
                property.name.as_deref()
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Nearest call or `new` expression reached by climbing only through
/// conditional, logical and optional-chain wrappers.
///
/// The climb starts from the sign-unwrapped subject and stops at the first
/// ancestor of any other kind.
pub fn find_enclosing_call(tree: &SyntaxTree, node: NodeId) -> Option<NodeId> {
    let (mut current, _) = signed_subject(tree, node);
    while let Some(parent) = tree.parent(current) {
        match tree.kind(parent) {
            NodeKind::Call | NodeKind::New => return Some(parent),
            NodeKind::Conditional | NodeKind::Logical | NodeKind::Chain => current = parent,
            _ => return None,
        }
    }
    None
}

/// Callee names of the calls among the first [`CALL_NAME_DEPTH`] ancestors
/// of `node`, nearest first.
///
/// No sign unwrapping and no early stop on other kinds: the window is fixed.
/// Only plain calls count, not `new` expressions.
pub fn enclosing_call_names<'a>(
    tree: &'a SyntaxTree,
    node: NodeId,
) -> impl Iterator<Item = &'a str> + 'a {
    tree.ancestors(node)
        .take(CALL_NAME_DEPTH)
        .filter(move |a| tree.kind(*a) == NodeKind::Call)
        .filter_map(move |call| callee_name(tree, call))
}

/// Declaration keyword of the declaration owning `declarator`.
pub fn declaration_kind(tree: &SyntaxTree, declarator: NodeId) -> Option<DeclarationKind> {
    let declaration = tree.parent(declarator)?;
    tree.node(declaration).declaration_kind
}

/// Whether `node` is (nested inside) the initializer of an immutable binding.
///
/// Climbs through object, array, property, unary, conditional, logical and
/// optional-chain nodes until a declarator is reached through its
/// initializer slot. Any other ancestor ends the walk with `false`.
pub fn is_part_of_constant_declaration(tree: &SyntaxTree, node: NodeId) -> bool {
    let mut current = node;
    while let Some(parent) = tree.parent(current) {
        match tree.kind(parent) {
            NodeKind::VariableDeclarator if tree.node(current).slot == Slot::Init => {
                return declaration_kind(tree, parent).is_some_and(|k| k.is_immutable());
            }
            NodeKind::Object
            | NodeKind::Array
            | NodeKind::Property
            | NodeKind::Unary
            | NodeKind::Conditional
            | NodeKind::Logical
            | NodeKind::Chain => current = parent,
            _ => return false,
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SyntaxNode;

    fn program() -> SyntaxTree {
        SyntaxTree::new(SyntaxNode::new(NodeKind::Program))
    }

    /// `<kind> x = <init>` with the initializer added by `build`.
    fn declaration(
        tree: &mut SyntaxTree,
        kind: DeclarationKind,
    ) -> NodeId {
        let decl = tree.add(
            tree.root(),
            Slot::Body,
            SyntaxNode::new(NodeKind::VariableDeclaration).with_declaration_kind(kind),
        );
        let declarator = tree.add(decl, Slot::Declaration, SyntaxNode::new(NodeKind::VariableDeclarator));
        tree.add(declarator, Slot::Id, SyntaxNode::identifier("x"));
        declarator
    }

    fn member(tree: &mut SyntaxTree, parent: NodeId) -> NodeId {
        let member = tree.add(parent, Slot::Body, SyntaxNode::new(NodeKind::Member));
        tree.add(member, Slot::Object, SyntaxNode::identifier("arr"));
        member
    }

    #[test]
    fn test_root_has_no_role() {
        let tree = program();
        assert_eq!(classify(&tree, tree.root()), StructuralRole::None);
        assert_eq!(find_enclosing_call(&tree, tree.root()), None);
        assert!(!is_part_of_constant_declaration(&tree, tree.root()));
        assert_eq!(property_name(&tree, tree.root()), None);
    }

    #[test]
    fn test_array_index() {
        let mut tree = program();
        let root = tree.root();
        let m = member(&mut tree, root);
        let five = tree.add(m, Slot::Property, SyntaxNode::number(5.0, "5"));
        assert_eq!(classify(&tree, five), StructuralRole::ArrayIndexAccess);
    }

    #[test]
    fn test_signed_array_index_unwraps_once() {
        let mut tree = program();
        let root = tree.root();
        let m = member(&mut tree, root);
        let neg = tree.add(m, Slot::Property, SyntaxNode::new(NodeKind::Unary).with_operator("-"));
        let five = tree.add(neg, Slot::Argument, SyntaxNode::number(5.0, "5"));

        let role = classify(&tree, five);
        assert_eq!(role.sign(), Some(Sign::Minus));
        assert_eq!(role.unsigned(), &StructuralRole::ArrayIndexAccess);
    }

    #[test]
    fn test_double_negation_is_not_unwrapped_twice() {
        let mut tree = program();
        let root = tree.root();
        let m = member(&mut tree, root);
        let outer = tree.add(m, Slot::Property, SyntaxNode::new(NodeKind::Unary).with_operator("-"));
        let inner = tree.add(outer, Slot::Argument, SyntaxNode::new(NodeKind::Unary).with_operator("-"));
        let five = tree.add(inner, Slot::Argument, SyntaxNode::number(5.0, "5"));

        assert_eq!(classify(&tree, five).unsigned(), &StructuralRole::None);
        assert_eq!(classify(&tree, inner).unsigned(), &StructuralRole::ArrayIndexAccess);
    }

    #[test]
    fn test_non_sign_unary_is_not_unwrapped() {
        let mut tree = program();
        let root = tree.root();
        let m = member(&mut tree, root);
        let not = tree.add(m, Slot::Property, SyntaxNode::new(NodeKind::Unary).with_operator("!"));
        let five = tree.add(not, Slot::Argument, SyntaxNode::number(5.0, "5"));
        assert_eq!(classify(&tree, five), StructuralRole::None);
    }

    #[test]
    fn test_member_object_is_not_an_index() {
        let mut tree = program();
        let member = tree.add(tree.root(), Slot::Body, SyntaxNode::new(NodeKind::Member));
        let five = tree.add(member, Slot::Object, SyntaxNode::number(5.0, "5"));
        tree.add(member, Slot::Property, SyntaxNode::identifier("toFixed"));
        assert_eq!(classify(&tree, five), StructuralRole::None);
    }

    #[test]
    fn test_class_fields() {
        let mut tree = program();
        let field = tree.add(tree.root(), Slot::Member, SyntaxNode::new(NodeKind::PropertyDefinition));
        let plain = tree.add(field, Slot::Value, SyntaxNode::number(1.0, "1"));
        let readonly = tree.add(
            tree.root(),
            Slot::Member,
            SyntaxNode::new(NodeKind::PropertyDefinition).with_readonly(true),
        );
        let fixed = tree.add(readonly, Slot::Value, SyntaxNode::number(2.0, "2"));

        assert_eq!(classify(&tree, plain), StructuralRole::ClassFieldInitializer);
        assert_eq!(classify(&tree, fixed), StructuralRole::ReadonlyClassProperty);
    }

    #[test]
    fn test_type_positions() {
        let mut tree = program();
        let union = tree.add(tree.root(), Slot::Type, SyntaxNode::new(NodeKind::UnionType));
        let lit_type = tree.add(union, Slot::Type, SyntaxNode::new(NodeKind::LiteralType));
        let one = tree.add(lit_type, Slot::Literal, SyntaxNode::number(1.0, "1"));
        let bare = tree.add(union, Slot::Type, SyntaxNode::number(2.0, "2"));
        let access = tree.add(tree.root(), Slot::Type, SyntaxNode::new(NodeKind::IndexedAccessType));
        tree.add(access, Slot::Object, SyntaxNode::identifier("Data"));
        let index = tree.add(access, Slot::Index, SyntaxNode::number(0.0, "0"));

        assert_eq!(classify(&tree, one), StructuralRole::NumericLiteralType);
        assert_eq!(classify(&tree, bare), StructuralRole::NumericLiteralType);
        assert_eq!(classify(&tree, index), StructuralRole::TypeIndex);
    }

    #[test]
    fn test_property_name_from_key() {
        let mut tree = program();
        let object = tree.add(tree.root(), Slot::Body, SyntaxNode::new(NodeKind::Object));
        let prop = tree.add(object, Slot::Property, SyntaxNode::new(NodeKind::Property));
        tree.add(prop, Slot::Key, SyntaxNode::identifier("maxWidth"));
        let neg = tree.add(prop, Slot::Value, SyntaxNode::new(NodeKind::Unary).with_operator("-"));
        let value = tree.add(neg, Slot::Argument, SyntaxNode::number(55.0, "55"));

        let numeric = tree.add(object, Slot::Property, SyntaxNode::new(NodeKind::Property));
        tree.add(numeric, Slot::Key, SyntaxNode::number(10.0, "10"));
        let other = tree.add(numeric, Slot::Value, SyntaxNode::number(3.0, "3"));

        assert_eq!(property_name(&tree, value).as_deref(), Some("maxWidth"));
        assert_eq!(property_name(&tree, other).as_deref(), Some("10"));
    }

    #[test]
    fn test_property_name_from_jsx_attribute() {
        let mut tree = program();
        let attr = tree.add(tree.root(), Slot::Child, SyntaxNode::new(NodeKind::JsxAttribute));
        tree.add(attr, Slot::Name, SyntaxNode::identifier("width"));
        let container = tree.add(attr, Slot::Value, SyntaxNode::new(NodeKind::JsxExpressionContainer));
        let value = tree.add(container, Slot::Expression, SyntaxNode::number(55.0, "55"));

        assert_eq!(classify(&tree, value), StructuralRole::JsxAttributeValue);
        assert_eq!(property_name(&tree, value).as_deref(), Some("width"));
    }

    #[test]
    fn test_find_enclosing_call_through_wrappers() {
        let mut tree = program();
        let call = tree.add(tree.root(), Slot::Body, SyntaxNode::new(NodeKind::Call));
        let callee = tree.add(call, Slot::Callee, SyntaxNode::new(NodeKind::Member));
        tree.add(callee, Slot::Object, SyntaxNode::identifier("window"));
        tree.add(callee, Slot::Property, SyntaxNode::identifier("setTimeout"));
        let cond = tree.add(call, Slot::Argument, SyntaxNode::new(NodeKind::Conditional));
        tree.add(cond, Slot::Test, SyntaxNode::identifier("fast"));
        let logical = tree.add(cond, Slot::Consequent, SyntaxNode::new(NodeKind::Logical).with_operator("||"));
        tree.add(logical, Slot::Left, SyntaxNode::identifier("delay"));
        let hundred = tree.add(logical, Slot::Right, SyntaxNode::number(100.0, "100"));

        assert_eq!(find_enclosing_call(&tree, hundred), Some(call));
        assert_eq!(callee_name(&tree, call), Some("setTimeout"));
    }

    #[test]
    fn test_find_enclosing_call_stops_at_other_kinds() {
        let mut tree = program();
        let call = tree.add(tree.root(), Slot::Body, SyntaxNode::new(NodeKind::Call));
        tree.add(call, Slot::Callee, SyntaxNode::identifier("delay"));
        let array = tree.add(call, Slot::Argument, SyntaxNode::new(NodeKind::Array));
        let five = tree.add(array, Slot::Element, SyntaxNode::number(5.0, "5"));

        assert_eq!(find_enclosing_call(&tree, five), None);
    }

    #[test]
    fn test_call_name_window_is_bounded() {
        let mut tree = program();
        let call = tree.add(tree.root(), Slot::Body, SyntaxNode::new(NodeKind::Call));
        tree.add(call, Slot::Callee, SyntaxNode::identifier("t"));
        let object = tree.add(call, Slot::Argument, SyntaxNode::new(NodeKind::Object));
        let prop = tree.add(object, Slot::Property, SyntaxNode::new(NodeKind::Property));
        let inner = tree.add(prop, Slot::Value, SyntaxNode::new(NodeKind::Object));
        let near = tree.add(inner, Slot::Property, SyntaxNode::new(NodeKind::Property));
        let deep = tree.add(near, Slot::Value, SyntaxNode::string("deep value"));
        let shallow = tree.add(prop, Slot::Key, SyntaxNode::string("shallow"));

        // deep: near, inner, prop, object -> call is the fifth ancestor
        assert_eq!(enclosing_call_names(&tree, deep).count(), 0);
        // shallow: prop, object, call
        assert_eq!(enclosing_call_names(&tree, shallow).collect::<Vec<_>>(), vec!["t"]);
    }

    #[test]
    fn test_constant_declaration_walk() {
        let mut tree = program();
        let declarator = declaration(&mut tree, DeclarationKind::Const);
        let object = tree.add(declarator, Slot::Init, SyntaxNode::new(NodeKind::Object));
        let prop = tree.add(object, Slot::Property, SyntaxNode::new(NodeKind::Property));
        tree.add(prop, Slot::Key, SyntaxNode::identifier("a"));
        let array = tree.add(prop, Slot::Value, SyntaxNode::new(NodeKind::Array));
        let five = tree.add(array, Slot::Element, SyntaxNode::number(5.0, "5"));

        assert!(is_part_of_constant_declaration(&tree, five));

        let let_declarator = declaration(&mut tree, DeclarationKind::Let);
        let seven = tree.add(let_declarator, Slot::Init, SyntaxNode::number(7.0, "7"));
        assert!(!is_part_of_constant_declaration(&tree, seven));
        assert_eq!(classify(&tree, seven), StructuralRole::BindingInitializer);
    }

    #[test]
    fn test_constant_walk_stops_at_call() {
        let mut tree = program();
        let declarator = declaration(&mut tree, DeclarationKind::Const);
        let call = tree.add(declarator, Slot::Init, SyntaxNode::new(NodeKind::Call));
        tree.add(call, Slot::Callee, SyntaxNode::identifier("compute"));
        let five = tree.add(call, Slot::Argument, SyntaxNode::number(5.0, "5"));

        assert!(!is_part_of_constant_declaration(&tree, five));
        assert_eq!(classify(&tree, five), StructuralRole::CallArgument);
    }
}
