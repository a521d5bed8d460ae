//! Tree-sitter based frontend.
//!
//! Parsing is delegated to a tree-sitter grammar; the concrete tree is then
//! lowered into the generic tree by [`super::lower`].

use tree_sitter::{Language, Parser as TsParser};

use super::{lower, Parser};
use crate::syntax::SyntaxTree;

/// Configuration for a tree-sitter frontend.
#[derive(Clone)]
pub struct Config {
    /// The tree-sitter language
    pub language: Language,
    /// Language name (e.g., "typescript")
    pub language_name: &'static str,
}

/// Tree-sitter based parser.
pub struct TreeSitterParser {
    config: Config,
}

impl TreeSitterParser {
    /// Create a new tree-sitter parser with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Parse source code and return the concrete tree.
    fn parse_concrete(&self, source: &[u8]) -> anyhow::Result<tree_sitter::Tree> {
        let mut parser = TsParser::new();
        parser.set_language(&self.config.language)?;
        parser
            .parse(source, None)
            .ok_or_else(|| anyhow::anyhow!("failed to parse source"))
    }
}

impl Parser for TreeSitterParser {
    fn parse(&self, source: &[u8]) -> anyhow::Result<SyntaxTree> {
        let tree = self.parse_concrete(source)?;
        let root = tree.root_node();
        if root.has_error() {
            tracing::debug!(
                language = self.config.language_name,
                "source has syntax errors; lowering what was recognized"
            );
        }
        Ok(lower::lower(root, source))
    }

    fn language(&self) -> &str {
        self.config.language_name
    }
}
