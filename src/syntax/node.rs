//! Node-level types of the generic syntax tree.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node inside its [`SyntaxTree`](super::SyntaxTree) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Source location of a node (both 1-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Category of a node.
///
/// The set mirrors the shapes the rules care about; everything else is
/// carried as [`NodeKind::Other`] so that arbitrary trees stay representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    Literal,
    TemplateLiteral,
    TemplateElement,
    Identifier,
    Call,
    New,
    Member,
    Chain,
    Object,
    Property,
    Array,
    Unary,
    Binary,
    Logical,
    Conditional,
    VariableDeclaration,
    VariableDeclarator,
    AssignmentPattern,
    Function,
    Class,
    PropertyDefinition,
    Enum,
    EnumMember,
    TypeAnnotation,
    TypeLiteral,
    LiteralType,
    UnionType,
    IndexedAccessType,
    Import,
    Export,
    JsxAttribute,
    JsxExpressionContainer,
    Other,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Program => "program",
            NodeKind::Literal => "literal",
            NodeKind::TemplateLiteral => "template-literal",
            NodeKind::TemplateElement => "template-element",
            NodeKind::Identifier => "identifier",
            NodeKind::Call => "call",
            NodeKind::New => "new",
            NodeKind::Member => "member",
            NodeKind::Chain => "chain",
            NodeKind::Object => "object",
            NodeKind::Property => "property",
            NodeKind::Array => "array",
            NodeKind::Unary => "unary",
            NodeKind::Binary => "binary",
            NodeKind::Logical => "logical",
            NodeKind::Conditional => "conditional",
            NodeKind::VariableDeclaration => "variable-declaration",
            NodeKind::VariableDeclarator => "variable-declarator",
            NodeKind::AssignmentPattern => "assignment-pattern",
            NodeKind::Function => "function",
            NodeKind::Class => "class",
            NodeKind::PropertyDefinition => "property-definition",
            NodeKind::Enum => "enum",
            NodeKind::EnumMember => "enum-member",
            NodeKind::TypeAnnotation => "type-annotation",
            NodeKind::TypeLiteral => "type-literal",
            NodeKind::LiteralType => "literal-type",
            NodeKind::UnionType => "union-type",
            NodeKind::IndexedAccessType => "indexed-access-type",
            NodeKind::Import => "import",
            NodeKind::Export => "export",
            NodeKind::JsxAttribute => "jsx-attribute",
            NodeKind::JsxExpressionContainer => "jsx-expression-container",
            NodeKind::Other => "other",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The child slot a node occupies in its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The root has no parent slot.
    Root,
    Callee,
    Argument,
    TypeArguments,
    Object,
    Property,
    Key,
    Value,
    Element,
    Id,
    Init,
    Declaration,
    Left,
    Right,
    Test,
    Consequent,
    Alternate,
    Expression,
    Quasi,
    Param,
    Body,
    Member,
    TypeAnnotation,
    Type,
    Literal,
    Index,
    Source,
    Name,
    Child,
}

/// Declaration keyword of a variable declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Const,
    Let,
    Var,
}

impl DeclarationKind {
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword {
            "const" => Some(DeclarationKind::Const),
            "let" => Some(DeclarationKind::Let),
            "var" => Some(DeclarationKind::Var),
            _ => None,
        }
    }

    /// Whether bindings of this kind can never be reassigned.
    pub fn is_immutable(&self) -> bool {
        matches!(self, DeclarationKind::Const)
    }
}

/// Evaluated value of a literal node.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Str(String),
    Number(f64),
    BigInt(String),
    Bool(bool),
    Null,
    Regex(String),
}

impl LiteralValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LiteralValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            LiteralValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text form used when a literal serves as a name (e.g. `{ 10: x }`).
    pub fn to_key_string(&self) -> String {
        match self {
            LiteralValue::Str(s) => s.clone(),
            LiteralValue::Number(n) => n.to_string(),
            LiteralValue::BigInt(s) | LiteralValue::Regex(s) => s.clone(),
            LiteralValue::Bool(b) => b.to_string(),
            LiteralValue::Null => "null".to_string(),
        }
    }
}

/// One element of the analyzed tree.
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub slot: Slot,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub value: Option<LiteralValue>,
    pub raw: Option<String>,
    pub name: Option<String>,
    pub operator: Option<String>,
    pub declaration_kind: Option<DeclarationKind>,
    pub readonly: bool,
    pub position: Position,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            slot: Slot::Root,
            parent: None,
            children: Vec::new(),
            value: None,
            raw: None,
            name: None,
            operator: None,
            declaration_kind: None,
            readonly: false,
            position: Position::default(),
        }
    }

    /// A string literal; `raw` is the quoted source form.
    pub fn string(value: &str) -> Self {
        Self::new(NodeKind::Literal)
            .with_value(LiteralValue::Str(value.to_string()))
            .with_raw(&format!("\"{}\"", value))
    }

    /// A numeric literal with its source text.
    pub fn number(value: f64, raw: &str) -> Self {
        Self::new(NodeKind::Literal)
            .with_value(LiteralValue::Number(value))
            .with_raw(raw)
    }

    pub fn identifier(name: &str) -> Self {
        Self::new(NodeKind::Identifier).with_name(name)
    }

    pub fn with_value(mut self, value: LiteralValue) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_raw(mut self, raw: &str) -> Self {
        self.raw = Some(raw.to_string());
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_operator(mut self, operator: &str) -> Self {
        self.operator = Some(operator.to_string());
        self
    }

    pub fn with_declaration_kind(mut self, kind: DeclarationKind) -> Self {
        self.declaration_kind = Some(kind);
        self
    }

    pub fn with_readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.position = Position::new(line, column);
        self
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }

    /// True for a unary `+` or `-`.
    pub fn is_sign(&self) -> bool {
        self.kind == NodeKind::Unary && matches!(self.operator.as_deref(), Some("+") | Some("-"))
    }

    pub fn literal_str(&self) -> Option<&str> {
        self.value.as_ref().and_then(LiteralValue::as_str)
    }

    pub fn literal_number(&self) -> Option<f64> {
        self.value.as_ref().and_then(LiteralValue::as_number)
    }
}
