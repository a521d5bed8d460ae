//! Running the rules over files and collecting what they find.

mod runner;
mod suppress;
mod types;
pub mod walk;

pub use runner::Runner;
pub use suppress::{
    filter_suppressed, matches_suppression, parse_suppressions, SuppressedViolation, Suppression,
    SuppressionType,
};
pub use types::{DetectionResult, Severity, Violation};
pub use walk::walk;
