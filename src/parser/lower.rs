//! Lowering of tree-sitter concrete syntax trees into [`SyntaxTree`].
//!
//! The output follows ESTree shapes closely enough for the rules:
//! parentheses disappear, argument/parameter/body lists are flattened into
//! their owner, optional chains get a `Chain` wrapper, TypeScript parameter
//! defaults become `AssignmentPattern`s and type annotations hang off the
//! binding they annotate. Node kinds without a dedicated mapping become
//! `Other`, with their named children kept under `Slot::Child`.

use tree_sitter::Node;

use crate::syntax::{DeclarationKind, LiteralValue, NodeId, NodeKind, Slot, SyntaxNode, SyntaxTree};

/// Lower the tree rooted at `root`.
pub fn lower(root: Node<'_>, source: &[u8]) -> SyntaxTree {
    let mut lowering = Lowering {
        source,
        tree: SyntaxTree::new(SyntaxNode::new(NodeKind::Program).at(1, 1)),
    };
    let program = lowering.tree.root();
    for child in named_children(root) {
        lowering.lower(child, program, Slot::Body);
    }
    lowering.tree
}

struct Lowering<'s> {
    source: &'s [u8],
    tree: SyntaxTree,
}

fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

fn is_logical_operator(op: &str) -> bool {
    matches!(op, "&&" | "||" | "??")
}

impl<'s> Lowering<'s> {
    fn text(&self, node: Node<'_>) -> &'s str {
        node.utf8_text(self.source).unwrap_or("")
    }

    fn node(&self, kind: NodeKind, ts: Node<'_>) -> SyntaxNode {
        let start = ts.start_position();
        SyntaxNode::new(kind).at(start.row + 1, start.column + 1)
    }

    fn add(&mut self, parent: NodeId, slot: Slot, kind: NodeKind, ts: Node<'_>) -> NodeId {
        let node = self.node(kind, ts);
        self.tree.add(parent, slot, node)
    }

    fn field(&mut self, ts: Node<'_>, field: &str, parent: NodeId, slot: Slot) -> Option<NodeId> {
        let child = ts.child_by_field_name(field)?;
        self.lower(child, parent, slot)
    }

    fn children(&mut self, ts: Node<'_>, parent: NodeId, slot: Slot) {
        for child in named_children(ts) {
            self.lower(child, parent, slot);
        }
    }

    /// Lower `ts` under `parent`. Returns the id of the node created for it,
    /// or `None` when it produced no node (comments) or was unwrapped into
    /// several nodes.
    fn lower(&mut self, ts: Node<'_>, parent: NodeId, slot: Slot) -> Option<NodeId> {
        if ts.is_extra() {
            return None;
        }

        if matches!(ts.kind(), "call_expression" | "member_expression" | "subscript_expression")
            && self.starts_chain(ts)
        {
            let chain = self.add(parent, slot, NodeKind::Chain, ts);
            self.lower_expression(ts, chain, Slot::Expression);
            return Some(chain);
        }

        self.lower_expression(ts, parent, slot)
    }

    fn lower_expression(&mut self, ts: Node<'_>, parent: NodeId, slot: Slot) -> Option<NodeId> {
        let id = match ts.kind() {
            "parenthesized_expression" => {
                let inner = named_children(ts);
                if let [only] = inner.as_slice() {
                    return self.lower(*only, parent, slot);
                }
                let id = self.add(parent, slot, NodeKind::Other, ts);
                self.children(ts, id, Slot::Child);
                id
            }
            "number" => {
                let raw = self.text(ts);
                let value = parse_number(raw).unwrap_or(LiteralValue::Number(f64::NAN));
                let node = self.node(NodeKind::Literal, ts).with_value(value).with_raw(raw);
                self.tree.add(parent, slot, node)
            }
            "string" => {
                let value = self.string_value(ts);
                let node = self
                    .node(NodeKind::Literal, ts)
                    .with_value(LiteralValue::Str(value))
                    .with_raw(self.text(ts));
                self.tree.add(parent, slot, node)
            }
            "true" | "false" => {
                let node = self
                    .node(NodeKind::Literal, ts)
                    .with_value(LiteralValue::Bool(ts.kind() == "true"))
                    .with_raw(self.text(ts));
                self.tree.add(parent, slot, node)
            }
            "null" => {
                let node = self
                    .node(NodeKind::Literal, ts)
                    .with_value(LiteralValue::Null)
                    .with_raw("null");
                self.tree.add(parent, slot, node)
            }
            "regex" => {
                let text = self.text(ts);
                let node = self
                    .node(NodeKind::Literal, ts)
                    .with_value(LiteralValue::Regex(text.to_string()))
                    .with_raw(text);
                self.tree.add(parent, slot, node)
            }
            "template_string" => self.template(ts, parent, slot),
            "identifier"
            | "property_identifier"
            | "shorthand_property_identifier"
            | "shorthand_property_identifier_pattern"
            | "private_property_identifier"
            | "type_identifier"
            | "predefined_type"
            | "this"
            | "super"
            | "undefined" => {
                let node = self.node(NodeKind::Identifier, ts).with_name(self.text(ts));
                self.tree.add(parent, slot, node)
            }
            "call_expression" => {
                let id = self.add(parent, slot, NodeKind::Call, ts);
                self.field(ts, "function", id, Slot::Callee);
                self.field(ts, "type_arguments", id, Slot::TypeArguments);
                self.arguments(ts, id);
                id
            }
            "new_expression" => {
                let id = self.add(parent, slot, NodeKind::New, ts);
                self.field(ts, "constructor", id, Slot::Callee);
                self.field(ts, "type_arguments", id, Slot::TypeArguments);
                self.arguments(ts, id);
                id
            }
            "member_expression" => {
                let id = self.add(parent, slot, NodeKind::Member, ts);
                self.field(ts, "object", id, Slot::Object);
                self.field(ts, "property", id, Slot::Property);
                id
            }
            "subscript_expression" => {
                let id = self.add(parent, slot, NodeKind::Member, ts);
                self.field(ts, "object", id, Slot::Object);
                self.field(ts, "index", id, Slot::Property);
                id
            }
            "object" | "object_pattern" => {
                let id = self.add(parent, slot, NodeKind::Object, ts);
                for entry in named_children(ts) {
                    match entry.kind() {
                        "shorthand_property_identifier" | "shorthand_property_identifier_pattern" => {
                            // `{ a }` is `{ a: a }`.
                            let property = self.add(id, Slot::Property, NodeKind::Property, entry);
                            self.lower(entry, property, Slot::Key);
                            self.lower(entry, property, Slot::Value);
                        }
                        _ => {
                            self.lower(entry, id, Slot::Property);
                        }
                    }
                }
                id
            }
            "pair" | "pair_pattern" => {
                let id = self.add(parent, slot, NodeKind::Property, ts);
                self.property_key(ts, id);
                self.field(ts, "value", id, Slot::Value);
                id
            }
            "object_assignment_pattern" => {
                // `{ a = 1 }`: a property whose value is the default pattern.
                let id = self.add(parent, slot, NodeKind::Property, ts);
                self.field(ts, "left", id, Slot::Key);
                let pattern = self.add(id, Slot::Value, NodeKind::AssignmentPattern, ts);
                self.field(ts, "left", pattern, Slot::Left);
                self.field(ts, "right", pattern, Slot::Right);
                id
            }
            "array" | "array_pattern" => {
                let id = self.add(parent, slot, NodeKind::Array, ts);
                self.children(ts, id, Slot::Element);
                id
            }
            "unary_expression" => {
                let operator = ts
                    .child_by_field_name("operator")
                    .map(|op| self.text(op))
                    .unwrap_or("");
                let node = self.node(NodeKind::Unary, ts).with_operator(operator);
                let id = self.tree.add(parent, slot, node);
                match ts.child_by_field_name("argument") {
                    Some(argument) => {
                        self.lower(argument, id, Slot::Argument);
                    }
                    None => self.children(ts, id, Slot::Argument),
                }
                id
            }
            "binary_expression" => {
                let operator = ts
                    .child_by_field_name("operator")
                    .map(|op| self.text(op))
                    .unwrap_or("");
                let kind = if is_logical_operator(operator) {
                    NodeKind::Logical
                } else {
                    NodeKind::Binary
                };
                let node = self.node(kind, ts).with_operator(operator);
                let id = self.tree.add(parent, slot, node);
                self.field(ts, "left", id, Slot::Left);
                self.field(ts, "right", id, Slot::Right);
                id
            }
            "ternary_expression" => {
                let id = self.add(parent, slot, NodeKind::Conditional, ts);
                self.field(ts, "condition", id, Slot::Test);
                self.field(ts, "consequence", id, Slot::Consequent);
                self.field(ts, "alternative", id, Slot::Alternate);
                id
            }
            "lexical_declaration" | "variable_declaration" => {
                let keyword = match ts.child_by_field_name("kind") {
                    Some(kind) => self.text(kind),
                    None => ts.child(0).map(|c| self.text(c)).unwrap_or(""),
                };
                let mut node = self.node(NodeKind::VariableDeclaration, ts);
                if let Some(kind) = DeclarationKind::parse(keyword) {
                    node = node.with_declaration_kind(kind);
                }
                let id = self.tree.add(parent, slot, node);
                self.children(ts, id, Slot::Declaration);
                id
            }
            "variable_declarator" => {
                let id = self.add(parent, slot, NodeKind::VariableDeclarator, ts);
                self.binding(ts, "name", id, Slot::Id);
                self.field(ts, "value", id, Slot::Init);
                id
            }
            "assignment_pattern" => {
                let id = self.add(parent, slot, NodeKind::AssignmentPattern, ts);
                self.field(ts, "left", id, Slot::Left);
                self.field(ts, "right", id, Slot::Right);
                id
            }
            "required_parameter" | "optional_parameter" => {
                if ts.child_by_field_name("value").is_some() {
                    let id = self.add(parent, slot, NodeKind::AssignmentPattern, ts);
                    self.binding(ts, "pattern", id, Slot::Left);
                    self.field(ts, "value", id, Slot::Right);
                    id
                } else {
                    return self.binding(ts, "pattern", parent, slot);
                }
            }
            "function_declaration"
            | "function_expression"
            | "function"
            | "generator_function"
            | "generator_function_declaration"
            | "arrow_function"
            | "method_definition" => {
                let id = self.add(parent, slot, NodeKind::Function, ts);
                self.field(ts, "name", id, Slot::Name);
                if let Some(single) = ts.child_by_field_name("parameter") {
                    self.lower(single, id, Slot::Param);
                }
                if let Some(params) = ts.child_by_field_name("parameters") {
                    self.children(params, id, Slot::Param);
                }
                self.field(ts, "return_type", id, Slot::TypeAnnotation);
                self.field(ts, "body", id, Slot::Body);
                id
            }
            "class" | "class_declaration" | "abstract_class_declaration" => {
                let id = self.add(parent, slot, NodeKind::Class, ts);
                for child in named_children(ts) {
                    match child.kind() {
                        "class_body" => self.children(child, id, Slot::Member),
                        _ => {
                            let child_slot = if Some(child) == ts.child_by_field_name("name") {
                                Slot::Name
                            } else {
                                Slot::Child
                            };
                            self.lower(child, id, child_slot);
                        }
                    }
                }
                id
            }
            "public_field_definition" | "field_definition" => {
                let mut cursor = ts.walk();
                let readonly = ts.children(&mut cursor).any(|c| c.kind() == "readonly");
                let node = self
                    .node(NodeKind::PropertyDefinition, ts)
                    .with_readonly(readonly);
                let id = self.tree.add(parent, slot, node);
                let key = ts
                    .child_by_field_name("name")
                    .or_else(|| ts.child_by_field_name("property"));
                if let Some(key) = key {
                    self.lower(key, id, Slot::Key);
                }
                self.field(ts, "type", id, Slot::TypeAnnotation);
                self.field(ts, "value", id, Slot::Value);
                id
            }
            "enum_declaration" => {
                let id = self.add(parent, slot, NodeKind::Enum, ts);
                self.field(ts, "name", id, Slot::Name);
                if let Some(body) = ts.child_by_field_name("body") {
                    for member in named_children(body) {
                        let member_id = self.add(id, Slot::Member, NodeKind::EnumMember, member);
                        if member.kind() == "enum_assignment" {
                            self.field(member, "name", member_id, Slot::Id);
                            self.field(member, "value", member_id, Slot::Init);
                        } else {
                            self.lower(member, member_id, Slot::Id);
                        }
                    }
                }
                id
            }
            "type_annotation" | "opting_type_annotation" | "omitting_type_annotation" => {
                let id = self.add(parent, slot, NodeKind::TypeAnnotation, ts);
                self.children(ts, id, Slot::Type);
                id
            }
            "object_type" => {
                let id = self.add(parent, slot, NodeKind::TypeLiteral, ts);
                self.children(ts, id, Slot::Member);
                id
            }
            "literal_type" => {
                let id = self.add(parent, slot, NodeKind::LiteralType, ts);
                self.children(ts, id, Slot::Literal);
                id
            }
            "union_type" => {
                let id = self.add(parent, slot, NodeKind::UnionType, ts);
                self.union_members(ts, id);
                id
            }
            "lookup_type" => {
                let id = self.add(parent, slot, NodeKind::IndexedAccessType, ts);
                let parts = named_children(ts);
                if let Some(object) = parts.first() {
                    self.lower(*object, id, Slot::Object);
                }
                if let Some(index) = parts.get(1) {
                    match named_children(*index).as_slice() {
                        [literal] if index.kind() == "literal_type" => {
                            self.lower(*literal, id, Slot::Index);
                        }
                        _ => {
                            self.lower(*index, id, Slot::Index);
                        }
                    }
                }
                id
            }
            "import_statement" | "export_statement" => {
                let kind = if ts.kind() == "import_statement" {
                    NodeKind::Import
                } else {
                    NodeKind::Export
                };
                let id = self.add(parent, slot, kind, ts);
                let source = ts.child_by_field_name("source");
                let declaration = ts.child_by_field_name("declaration");
                for child in named_children(ts) {
                    let child_slot = if Some(child) == source {
                        Slot::Source
                    } else if Some(child) == declaration {
                        Slot::Declaration
                    } else {
                        Slot::Child
                    };
                    self.lower(child, id, child_slot);
                }
                id
            }
            "jsx_attribute" => {
                let id = self.add(parent, slot, NodeKind::JsxAttribute, ts);
                let parts = named_children(ts);
                if let Some(name) = parts.first() {
                    let node = self.node(NodeKind::Identifier, *name).with_name(self.text(*name));
                    self.tree.add(id, Slot::Name, node);
                }
                for value in parts.iter().skip(1) {
                    self.lower(*value, id, Slot::Value);
                }
                id
            }
            "jsx_expression" => {
                let id = self.add(parent, slot, NodeKind::JsxExpressionContainer, ts);
                self.children(ts, id, Slot::Expression);
                id
            }
            _ => {
                let id = self.add(parent, slot, NodeKind::Other, ts);
                self.children(ts, id, Slot::Child);
                id
            }
        };
        Some(id)
    }

    /// Lower the binding in `field` into `slot` and attach the sibling
    /// `type` annotation underneath it.
    fn binding(&mut self, ts: Node<'_>, field: &str, parent: NodeId, slot: Slot) -> Option<NodeId> {
        let id = self.field(ts, field, parent, slot)?;
        self.field(ts, "type", id, Slot::TypeAnnotation);
        Some(id)
    }

    fn property_key(&mut self, ts: Node<'_>, property: NodeId) {
        let Some(key) = ts.child_by_field_name("key") else {
            return;
        };
        if key.kind() == "computed_property_name" {
            self.children(key, property, Slot::Key);
        } else {
            self.lower(key, property, Slot::Key);
        }
    }

    fn arguments(&mut self, ts: Node<'_>, call: NodeId) {
        let Some(arguments) = ts.child_by_field_name("arguments") else {
            return;
        };
        if arguments.kind() == "arguments" {
            self.children(arguments, call, Slot::Argument);
        } else {
            // Tagged template: the template is the only argument.
            self.lower(arguments, call, Slot::Argument);
        }
    }

    fn union_members(&mut self, ts: Node<'_>, union: NodeId) {
        for member in named_children(ts) {
            if member.kind() == "union_type" {
                self.union_members(member, union);
            } else {
                self.lower(member, union, Slot::Type);
            }
        }
    }

    /// Split a template into raw quasis around its substitutions.
    fn template(&mut self, ts: Node<'_>, parent: NodeId, slot: Slot) -> NodeId {
        let id = self.add(parent, slot, NodeKind::TemplateLiteral, ts);
        let end = ts.end_byte().saturating_sub(1);
        let mut cursor = ts.start_byte() + 1;
        let mut quasi_start = ts;

        for child in named_children(ts) {
            if child.kind() != "template_substitution" {
                continue;
            }
            self.quasi(id, quasi_start, cursor, child.start_byte());
            for expression in named_children(child) {
                self.lower(expression, id, Slot::Expression);
            }
            cursor = child.end_byte();
            quasi_start = child;
        }
        self.quasi(id, quasi_start, cursor, end);
        id
    }

    fn quasi(&mut self, template: NodeId, anchor: Node<'_>, start: usize, end: usize) {
        let raw = self
            .source
            .get(start..end.max(start))
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
            .unwrap_or("");
        let node = self.node(NodeKind::TemplateElement, anchor).with_raw(raw);
        self.tree.add(template, Slot::Quasi, node);
    }

    fn string_value(&self, ts: Node<'_>) -> String {
        let parts = named_children(ts);
        if parts.is_empty() {
            // Grammars without fragment children: strip the quotes.
            let text = self.text(ts);
            let inner = text.get(1..text.len().saturating_sub(1)).unwrap_or("");
            return unescape(inner);
        }
        let mut value = String::new();
        for part in parts {
            let text = self.text(part);
            match part.kind() {
                "escape_sequence" => value.push_str(&unescape(text)),
                _ => value.push_str(text),
            }
        }
        value
    }

    /// Whether `ts` is the outermost link of an optional chain.
    fn starts_chain(&self, ts: Node<'_>) -> bool {
        if let Some(parent) = ts.parent() {
            let continues = match parent.kind() {
                "member_expression" | "subscript_expression" => {
                    parent.child_by_field_name("object") == Some(ts)
                }
                "call_expression" => parent.child_by_field_name("function") == Some(ts),
                _ => false,
            };
            if continues {
                return false;
            }
        }

        let mut current = Some(ts);
        while let Some(node) = current {
            let link = match node.kind() {
                "member_expression" | "subscript_expression" => "object",
                "call_expression" => "function",
                _ => return false,
            };
            let mut cursor = node.walk();
            if node.children(&mut cursor).any(|c| c.kind() == "optional_chain") {
                return true;
            }
            current = node.child_by_field_name(link);
        }
        false
    }
}

/// Evaluate a numeric literal's source text.
pub fn parse_number(raw: &str) -> Option<LiteralValue> {
    let cleaned: String = raw.chars().filter(|c| *c != '_').collect();
    if let Some(digits) = cleaned.strip_suffix('n') {
        return Some(LiteralValue::BigInt(digits.to_string()));
    }

    let from_radix = |prefix_len: usize, radix: u32| {
        u64::from_str_radix(&cleaned[prefix_len..], radix)
            .ok()
            .map(|v| LiteralValue::Number(v as f64))
    };
    let lower = cleaned.to_ascii_lowercase();
    if lower.starts_with("0x") {
        return from_radix(2, 16);
    }
    if lower.starts_with("0o") {
        return from_radix(2, 8);
    }
    if lower.starts_with("0b") {
        return from_radix(2, 2);
    }
    if cleaned.len() > 1
        && cleaned.starts_with('0')
        && cleaned.chars().all(|c| c.is_ascii_digit())
    {
        // Legacy octal (`010`), unless a digit rules it out (`089`).
        if cleaned.chars().all(|c| ('0'..='7').contains(&c)) {
            return from_radix(1, 8);
        }
    }
    cleaned.parse::<f64>().ok().map(LiteralValue::Number)
}

/// Decode JavaScript string escapes.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escaped) = chars.next() else {
            break;
        };
        match escaped {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !chars.peek().is_some_and(|d| d.is_ascii_digit()) => out.push('\0'),
            '\n' | '\u{2028}' | '\u{2029}' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(ch) => out.push(ch),
                    None => {
                        out.push('x');
                        out.push_str(&hex);
                    }
                }
            }
            'u' => {
                let hex: String = if chars.peek() == Some(&'{') {
                    chars.next();
                    chars.by_ref().take_while(|c| *c != '}').collect()
                } else {
                    chars.by_ref().take(4).collect()
                };
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(ch) => out.push(ch),
                    None => {
                        out.push('u');
                        out.push_str(&hex);
                    }
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_forms() {
        assert_eq!(parse_number("42"), Some(LiteralValue::Number(42.0)));
        assert_eq!(parse_number("1_000"), Some(LiteralValue::Number(1000.0)));
        assert_eq!(parse_number("0xff"), Some(LiteralValue::Number(255.0)));
        assert_eq!(parse_number("0o17"), Some(LiteralValue::Number(15.0)));
        assert_eq!(parse_number("0b101"), Some(LiteralValue::Number(5.0)));
        assert_eq!(parse_number("010"), Some(LiteralValue::Number(8.0)));
        assert_eq!(parse_number("089"), Some(LiteralValue::Number(89.0)));
        assert_eq!(parse_number(".5"), Some(LiteralValue::Number(0.5)));
        assert_eq!(parse_number("1e3"), Some(LiteralValue::Number(1000.0)));
        assert_eq!(
            parse_number("10n"),
            Some(LiteralValue::BigInt("10".to_string()))
        );
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"a\nb"), "a\nb");
        assert_eq!(unescape(r#"say \"hi\""#), "say \"hi\"");
        assert_eq!(unescape(r"\x41B\u{43}"), "ABC");
        assert_eq!(unescape(r"back\\slash"), "back\\slash");
        assert_eq!(unescape("line\\\ncontinued"), "linecontinued");
    }
}
