//! Language-specific tree-sitter configurations.
//!
//! Each language module provides a factory function for its parsers and
//! registers them for its file extensions.

#[cfg(feature = "tree-sitter")]
pub mod javascript;
#[cfg(feature = "tree-sitter")]
pub mod typescript;

/// Register all available language parsers.
#[cfg(feature = "tree-sitter")]
pub fn register_all() {
    javascript::register();
    typescript::register();
}
