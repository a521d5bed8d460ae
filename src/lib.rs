//! litguard - literal hygiene lints for TypeScript and JavaScript.
//!
//! Three rules guard how literals are used:
//! - `no-duplicate-string`: the same string literal repeated too often
//! - `no-magic-numbers`: numeric literals not bound to a named constant
//! - `no-implicit-complex-object`: object-shaped bindings and parameters
//!   with no explicit type
//!
//! # Architecture
//!
//! - `syntax`: generic labeled tree the rules operate on
//! - `parser`: tree-sitter frontends lowering source into that tree
//! - `engine`: pattern matching, ancestor walks and diagnostics
//! - `rules`: the rule units and their compiled configuration
//! - `detect`: traversal, per-file runner and inline suppressions
//! - `config`: YAML configuration schema
//! - `report`: output formatting (pretty, JSON, SARIF)
//!
//! The engine never looks at source text; adding a language means adding
//! a frontend in `src/parser/languages/` that produces a `SyntaxTree`.

pub mod cli;
pub mod config;
pub mod detect;
pub mod engine;
pub mod error;
pub mod parser;
pub mod report;
pub mod rules;
pub mod syntax;

pub use config::Config;
pub use detect::{walk, DetectionResult, Runner, Severity, Violation};
pub use engine::{Diagnostic, DiagnosticKind, DiagnosticSink};
pub use error::ConfigurationError;
pub use parser::{for_extension, init as init_parsers, Parser};
pub use rules::{Rule, RuleId, RuleSet};
pub use syntax::{NodeId, NodeKind, Slot, SyntaxNode, SyntaxTree};

/// Initialize all subsystems.
///
/// Call this once at startup.
pub fn init() {
    init_parsers();
}
