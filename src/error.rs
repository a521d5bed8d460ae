//! Error types.

use thiserror::Error;

/// A rule configuration that cannot be turned into a policy.
///
/// Raised while building a [`RuleSet`](crate::rules::RuleSet), before any
/// node is visited. A rule is never built from a partially valid section.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("invalid pattern {pattern:?} in `{option}`: {source}")]
    InvalidPattern {
        option: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("`{option}` must be at least {minimum}, got {value}")]
    OutOfRange {
        option: &'static str,
        value: usize,
        minimum: usize,
    },

    #[error("invalid glob {pattern:?} in `excluded_paths`: {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}
