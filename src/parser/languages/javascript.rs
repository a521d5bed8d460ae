//! JavaScript language configuration for tree-sitter parsing.

use crate::parser::treesitter::{Config, TreeSitterParser};
use crate::parser::Parser;

/// Create a new JavaScript parser (the grammar includes JSX).
pub fn new_javascript_parser() -> Box<dyn Parser> {
    Box::new(TreeSitterParser::new(Config {
        language: tree_sitter_javascript::LANGUAGE.into(),
        language_name: "javascript",
    }))
}

/// Register JavaScript parsers.
pub fn register() {
    crate::parser::register(".js", new_javascript_parser);
    crate::parser::register(".mjs", new_javascript_parser);
    crate::parser::register(".cjs", new_javascript_parser);
    crate::parser::register(".jsx", new_javascript_parser);
}
