//! Classification primitives shared by the rules.
//!
//! - `patterns`: compiled exemption lists (regexes, exact values)
//! - `ancestors`: structural role of a node and the bounded ancestor walks
//! - `diagnostic`: findings and the sink they are reported to
//!
//! Nothing here walks the whole tree; the host drives the traversal and
//! calls into the rules once per node of interest.

pub mod ancestors;
pub mod diagnostic;
pub mod patterns;

pub use ancestors::{
    callee_name, classify, enclosing_call_names, find_enclosing_call,
    is_part_of_constant_declaration, property_name, signed_subject, Sign, StructuralRole,
    CALL_NAME_DEPTH,
};
pub use diagnostic::{preview, Diagnostic, DiagnosticKind, DiagnosticSink, MessageData};
pub use patterns::{is_in_literal_set, LiteralSet, PatternSet};
