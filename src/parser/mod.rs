//! Source frontends: turn a file's bytes into a [`SyntaxTree`].
//!
//! This module provides:
//! - `Parser` trait: abstract interface for a frontend
//! - a factory registry keyed by file extension
//! - tree-sitter frontends for TypeScript and JavaScript

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::syntax::SyntaxTree;

#[cfg(feature = "tree-sitter")]
pub mod lower;

#[cfg(feature = "tree-sitter")]
pub mod treesitter;

#[cfg(feature = "tree-sitter")]
pub mod languages;

/// A frontend producing generic trees.
pub trait Parser: Send + Sync {
    /// Parse and lower source code. Syntax errors are not fatal: the
    /// erroneous regions simply lower to `Other` nodes.
    fn parse(&self, source: &[u8]) -> anyhow::Result<SyntaxTree>;

    /// Return the language this parser handles (e.g., "typescript").
    fn language(&self) -> &str;
}

/// Factory function type for creating parser instances.
pub type ParserFactory = fn() -> Box<dyn Parser>;

lazy_static::lazy_static! {
    /// Global parser registry mapping file extensions to parser factories.
    static ref REGISTRY: RwLock<HashMap<String, ParserFactory>> = RwLock::new(HashMap::new());
}

/// Register a parser factory for a file extension.
/// Extension should include the dot (e.g., ".ts").
pub fn register(ext: &str, factory: ParserFactory) {
    let mut registry = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    registry.insert(ext.to_string(), factory);
}

/// Get a parser for the given file extension.
/// Returns None if no parser is registered for the extension.
pub fn for_extension(ext: &str) -> Option<Box<dyn Parser>> {
    let registry = REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
    registry.get(ext).map(|factory| factory())
}

/// Return all registered file extensions, sorted.
pub fn supported_extensions() -> Vec<String> {
    let registry = REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
    let mut extensions: Vec<String> = registry.keys().cloned().collect();
    extensions.sort();
    extensions
}

/// Initialize the parser registry with all available frontends.
/// Call this once at startup before using parsers.
#[cfg(feature = "tree-sitter")]
pub fn init() {
    languages::register_all();
}

/// Initialize (no-op when tree-sitter is disabled).
#[cfg(not(feature = "tree-sitter"))]
pub fn init() {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{NodeKind, SyntaxNode};

    struct EmptyParser;

    impl Parser for EmptyParser {
        fn parse(&self, _source: &[u8]) -> anyhow::Result<SyntaxTree> {
            Ok(SyntaxTree::new(SyntaxNode::new(NodeKind::Program)))
        }

        fn language(&self) -> &str {
            "empty"
        }
    }

    fn empty_factory() -> Box<dyn Parser> {
        Box::new(EmptyParser)
    }

    #[test]
    fn test_registry() {
        register(".empty", empty_factory);

        let parser = for_extension(".empty").unwrap();
        assert_eq!(parser.language(), "empty");
        assert_eq!(parser.parse(b"anything").unwrap().len(), 1);
        assert!(supported_extensions().contains(&".empty".to_string()));
    }

    #[test]
    fn test_unregistered_extension() {
        assert!(for_extension(".unknown").is_none());
    }
}
