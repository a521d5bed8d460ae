//! TypeScript language configuration for tree-sitter parsing.

use crate::parser::treesitter::{Config, TreeSitterParser};
use crate::parser::Parser;

/// Create a new TypeScript parser.
pub fn new_typescript_parser() -> Box<dyn Parser> {
    Box::new(TreeSitterParser::new(Config {
        language: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        language_name: "typescript",
    }))
}

/// Create a new TSX parser (TypeScript with JSX).
pub fn new_tsx_parser() -> Box<dyn Parser> {
    Box::new(TreeSitterParser::new(Config {
        language: tree_sitter_typescript::LANGUAGE_TSX.into(),
        language_name: "tsx",
    }))
}

/// Register TypeScript parsers.
pub fn register() {
    crate::parser::register(".ts", new_typescript_parser);
    crate::parser::register(".mts", new_typescript_parser);
    crate::parser::register(".cts", new_typescript_parser);
    crate::parser::register(".tsx", new_tsx_parser);
}
