//! Exemption lists: compiled regular expressions and exact-value sets.

use regex::Regex;
use std::collections::HashSet;

use crate::error::ConfigurationError;
use crate::syntax::LiteralValue;

/// A compiled list of exemption patterns.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    regexes: Vec<Regex>,
}

impl PatternSet {
    /// Compile every pattern; the first invalid one fails the whole set.
    ///
    /// `option` names the configuration key the patterns came from and is
    /// only used for the error.
    pub fn compile<S: AsRef<str>>(
        option: &'static str,
        patterns: &[S],
    ) -> Result<Self, ConfigurationError> {
        let regexes = patterns
            .iter()
            .map(|p| {
                Regex::new(p.as_ref()).map_err(|source| ConfigurationError::InvalidPattern {
                    option,
                    pattern: p.as_ref().to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { regexes })
    }

    /// Unanchored search, like `RegExp.prototype.test`.
    pub fn matches_any(&self, text: &str) -> bool {
        self.regexes.iter().any(|r| r.is_match(text))
    }

    pub fn is_empty(&self) -> bool {
        self.regexes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.regexes.len()
    }
}

/// Exact-membership exemption list of strings and numbers.
#[derive(Debug, Clone, Default)]
pub struct LiteralSet {
    texts: HashSet<String>,
    numbers: Vec<f64>,
}

impl LiteralSet {
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            texts: texts.into_iter().map(Into::into).collect(),
            numbers: Vec::new(),
        }
    }

    pub fn from_numbers<I: IntoIterator<Item = f64>>(numbers: I) -> Self {
        let mut numbers: Vec<f64> = numbers.into_iter().collect();
        numbers.dedup();
        Self {
            texts: HashSet::new(),
            numbers,
        }
    }

    pub fn contains_text(&self, text: &str) -> bool {
        self.texts.contains(text)
    }

    pub fn contains_number(&self, number: f64) -> bool {
        self.numbers.iter().any(|n| *n == number)
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty() && self.numbers.is_empty()
    }
}

/// Whether a literal value is listed in `set`. Only strings and numbers can be
/// members.
pub fn is_in_literal_set(set: &LiteralSet, value: &LiteralValue) -> bool {
    match value {
        LiteralValue::Str(s) => set.contains_text(s),
        LiteralValue::Number(n) => set.contains_number(*n),
        _ => false,
    }
}
