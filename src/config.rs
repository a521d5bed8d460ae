//! Configuration file schema for litguard.
//!
//! A configuration selects the rule units to run and their options. Rule
//! sections are keyed by rule id; a missing section disables that rule.

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::detect::Severity;
use crate::error::ConfigurationError;
use crate::rules::complex_object::DEFAULT_PROPERTY_THRESHOLD;
use crate::rules::duplicate_string::{DEFAULT_MIN_LENGTH, DEFAULT_THRESHOLD};
use crate::rules::RuleSet;

/// File names looked up, in order, when no `--config` is given.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["litguard.yaml", ".litguard.yaml", "litguard.yml"];

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Whether to lint test files (default: false)
    #[serde(default)]
    pub include_test_files: Option<bool>,
    /// Glob patterns for paths to skip (e.g. "**/dist/**")
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    #[serde(default)]
    pub rules: RulesConfig,
}

impl Config {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// First configuration file found in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// The built-in recommended preset (same content as the `recommended`
    /// init template).
    pub fn recommended() -> Self {
        Config {
            version: "1".to_string(),
            name: "recommended".to_string(),
            description: Some("Recommended litguard rules".to_string()),
            include_test_files: None,
            excluded_paths: vec!["**/node_modules/**".to_string(), "**/dist/**".to_string()],
            rules: RulesConfig {
                duplicate_string: Some(DuplicateStringOptions {
                    min_length: 2,
                    ignore_values: strings(&["application/json", "YYYY-MM-DD"]),
                    ignore_patterns: strings(&[
                        "^/",
                        "^http(s)?://",
                        "^#([0-9A-Fa-f]{3,6})$",
                        "^[0-9]+(px|rem|em|vh|vw|%)$",
                    ]),
                    ..Default::default()
                }),
                magic_numbers: Some(MagicNumberOptions {
                    detect_objects: true,
                    enforce_constant: true,
                    ignore: vec![-1.0, 0.0, 1.0, 2.0],
                    ignore_array_indexes: true,
                    ignore_enums: true,
                    ignore_type_indexes: true,
                    ignore_property_patterns: strings(&["^width$|Width$"]),
                    ignore_callee_patterns: strings(&["^(Date|setTimeout|setInterval|delay)$"]),
                    ..Default::default()
                }),
                complex_object: Some(ComplexObjectOptions::default()),
            },
        }
    }

    /// Returns whether to include test files (defaults to false).
    pub fn should_include_test_files(&self) -> bool {
        self.include_test_files.unwrap_or(false)
    }

    /// Compile `excluded_paths` into one matcher.
    pub fn excluded_matcher(&self) -> Result<GlobSet, ConfigurationError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.excluded_paths {
            let glob = Glob::new(pattern).map_err(|source| ConfigurationError::InvalidGlob {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|source| ConfigurationError::InvalidGlob {
            pattern: self.excluded_paths.join(", "),
            source,
        })
    }

    /// Compile the rule sections.
    pub fn rule_set(&self) -> Result<RuleSet, ConfigurationError> {
        RuleSet::from_config(&self.rules)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_true() -> bool {
    true
}

fn default_threshold() -> usize {
    DEFAULT_THRESHOLD
}

fn default_min_length() -> usize {
    DEFAULT_MIN_LENGTH
}

fn default_property_threshold() -> usize {
    DEFAULT_PROPERTY_THRESHOLD
}

fn default_wrapper_calls() -> Vec<String> {
    strings(&["ref", "reactive"])
}

/// One optional section per rule unit.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    #[serde(
        default,
        rename = "no-duplicate-string",
        skip_serializing_if = "Option::is_none"
    )]
    pub duplicate_string: Option<DuplicateStringOptions>,
    #[serde(
        default,
        rename = "no-magic-numbers",
        skip_serializing_if = "Option::is_none"
    )]
    pub magic_numbers: Option<MagicNumberOptions>,
    #[serde(
        default,
        rename = "no-implicit-complex-object",
        skip_serializing_if = "Option::is_none"
    )]
    pub complex_object: Option<ComplexObjectOptions>,
}

impl RulesConfig {
    /// Every rule enabled with its default options.
    pub fn all_default() -> Self {
        Self {
            duplicate_string: Some(DuplicateStringOptions::default()),
            magic_numbers: Some(MagicNumberOptions::default()),
            complex_object: Some(ComplexObjectOptions::default()),
        }
    }
}

/// Options of `no-duplicate-string`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DuplicateStringOptions {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub severity: Severity,
    /// Occurrences needed before a value is reported (default: 2, minimum 2)
    #[serde(default = "default_threshold")]
    pub threshold: usize,
    /// Shortest text that is counted, in characters (default: 5, minimum 2)
    #[serde(default = "default_min_length", alias = "minLength")]
    pub min_length: usize,
    #[serde(default, alias = "ignoreValues", alias = "ignoreStrings")]
    pub ignore_values: Vec<String>,
    #[serde(default, alias = "ignorePatterns")]
    pub ignore_patterns: Vec<String>,
    #[serde(
        default = "default_true",
        alias = "ignoreTypeLiteralPositions",
        alias = "ignoreTSLiteralTypes"
    )]
    pub ignore_type_literal_positions: bool,
}

impl Default for DuplicateStringOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: Severity::default(),
            threshold: DEFAULT_THRESHOLD,
            min_length: DEFAULT_MIN_LENGTH,
            ignore_values: Vec::new(),
            ignore_patterns: Vec::new(),
            ignore_type_literal_positions: true,
        }
    }
}

/// Options of `no-magic-numbers`. Every toggle defaults to false.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MagicNumberOptions {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default, alias = "detectObjects")]
    pub detect_objects: bool,
    #[serde(default, alias = "enforceConstant", alias = "enforceConst")]
    pub enforce_constant: bool,
    #[serde(default)]
    pub ignore: Vec<f64>,
    #[serde(default, alias = "ignoreArrayIndexes")]
    pub ignore_array_indexes: bool,
    #[serde(default, alias = "ignoreDefaultValues")]
    pub ignore_default_values: bool,
    #[serde(default, alias = "ignoreClassFieldInitialValues")]
    pub ignore_class_field_initial_values: bool,
    #[serde(default, alias = "ignoreEnums")]
    pub ignore_enums: bool,
    #[serde(default, alias = "ignoreNumericLiteralTypes")]
    pub ignore_numeric_literal_types: bool,
    #[serde(default, alias = "ignoreReadonlyClassProperties")]
    pub ignore_readonly_class_properties: bool,
    #[serde(default, alias = "ignoreTypeIndexes")]
    pub ignore_type_indexes: bool,
    #[serde(default, alias = "ignorePropertyPatterns")]
    pub ignore_property_patterns: Vec<String>,
    #[serde(default, alias = "ignoreCalleePatterns")]
    pub ignore_callee_patterns: Vec<String>,
}

impl Default for MagicNumberOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: Severity::default(),
            detect_objects: false,
            enforce_constant: false,
            ignore: Vec::new(),
            ignore_array_indexes: false,
            ignore_default_values: false,
            ignore_class_field_initial_values: false,
            ignore_enums: false,
            ignore_numeric_literal_types: false,
            ignore_readonly_class_properties: false,
            ignore_type_indexes: false,
            ignore_property_patterns: Vec::new(),
            ignore_callee_patterns: Vec::new(),
        }
    }
}

/// Options of `no-implicit-complex-object`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ComplexObjectOptions {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub severity: Severity,
    /// Property count at which a type is required (default: 2, minimum 1)
    #[serde(default = "default_property_threshold", alias = "propertyThreshold")]
    pub property_threshold: usize,
    #[serde(default, alias = "ignoreWrapperCalls", alias = "ignoreVue3Wrappers")]
    pub ignore_wrapper_calls: bool,
    /// Calls whose object argument is checked like a direct initializer
    #[serde(default = "default_wrapper_calls", alias = "wrapperCalls")]
    pub wrapper_calls: Vec<String>,
    #[serde(default, alias = "ignoreNamePatterns", alias = "ignorePatterns")]
    pub ignore_name_patterns: Vec<String>,
}

impl Default for ComplexObjectOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: Severity::default(),
            property_threshold: DEFAULT_PROPERTY_THRESHOLD,
            ignore_wrapper_calls: false,
            wrapper_calls: default_wrapper_calls(),
            ignore_name_patterns: Vec::new(),
        }
    }
}

/// Validate a configuration: globs and every enabled rule section.
pub fn validate(config: &Config) -> Result<(), ConfigurationError> {
    config.excluded_matcher()?;
    config.rule_set()?;
    Ok(())
}
