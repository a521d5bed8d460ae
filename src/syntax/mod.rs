//! Generic labeled syntax tree.
//!
//! Every frontend lowers its concrete tree into this shape; the rules only
//! ever see a [`SyntaxTree`]. Nodes live in an arena and are addressed by
//! [`NodeId`]; parent links are plain indices, written once when a node is
//! added and only read afterwards.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Source file  │────▶│ Frontend     │────▶│ SyntaxTree   │────▶ rules
//! └──────────────┘     │ (tree-sitter)│     │ (arena)      │
//!                      └──────────────┘     └──────────────┘
//! ```

mod node;
mod tree;

pub use node::{DeclarationKind, LiteralValue, NodeId, NodeKind, Position, Slot, SyntaxNode};
pub use tree::{Ancestors, Preorder, SyntaxTree};
