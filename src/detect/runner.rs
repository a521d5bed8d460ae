//! Lint runner: parses files, runs the rules and applies suppressions.

use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::engine::Diagnostic;
use crate::parser;
use crate::rules::RuleSet;

use super::{filter_suppressed, parse_suppressions, walk, DetectionResult, Violation};

/// Lints a set of files with one compiled rule set.
pub struct Runner {
    base_dir: PathBuf,
    rules: RuleSet,
}

impl Runner {
    /// Create a runner. Reported paths are relative to `base_dir`.
    pub fn new<P: AsRef<Path>>(base_dir: P, rules: RuleSet) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            rules,
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Lint every file. Files are processed in parallel; unreadable or
    /// unparseable files are logged and counted in `failed`.
    pub fn run(&self, files: &[PathBuf]) -> DetectionResult {
        tracing::info!(files = files.len(), rules = ?self.rules.enabled(), "linting");

        let per_file: Vec<DetectionResult> = files
            .par_iter()
            .map(|path| match self.lint_file(path) {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "skipping file");
                    DetectionResult {
                        failed: 1,
                        ..Default::default()
                    }
                }
            })
            .collect();

        let mut result = DetectionResult::new();
        for file_result in per_file {
            result.merge(file_result);
        }
        result.sort();

        tracing::info!(
            scanned = result.scanned,
            violations = result.violations.len(),
            suppressed = result.suppressed_count(),
            "lint finished"
        );
        result
    }

    /// Lint one file from disk.
    pub fn lint_file(&self, path: &Path) -> anyhow::Result<DetectionResult> {
        let source = std::fs::read_to_string(path)?;
        let display = self.display_path(path);
        self.lint_source(&display, &source)
    }

    /// Lint source text; `file` selects the frontend by extension and is
    /// used as the reported path.
    pub fn lint_source(&self, file: &str, source: &str) -> anyhow::Result<DetectionResult> {
        let ext = Path::new(file)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        let parser = parser::for_extension(&ext)
            .ok_or_else(|| anyhow::anyhow!("no parser registered for {:?}", ext))?;

        let tree = parser.parse(source.as_bytes())?;
        tracing::debug!(file, nodes = tree.len(), language = parser.language(), "parsed");

        let mut rules = self.rules.instantiate();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        walk(&tree, &mut rules, &mut diagnostics);

        let violations: Vec<Violation> = diagnostics
            .into_iter()
            .map(|d| self.to_violation(file, d))
            .collect();

        let suppressions = parse_suppressions(file, source);
        let (violations, suppressed) = filter_suppressed(violations, &suppressions);

        Ok(DetectionResult {
            violations,
            suppressed,
            scanned: 1,
            failed: 0,
        })
    }

    fn to_violation(&self, file: &str, diagnostic: Diagnostic) -> Violation {
        let kind = diagnostic.kind();
        Violation {
            rule: kind.rule(),
            kind,
            message: diagnostic.message(),
            file: file.to_string(),
            line: diagnostic.position.line,
            column: diagnostic.position.column,
            severity: self.rules.severity(kind.rule()),
        }
    }

    fn display_path(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.base_dir).unwrap_or(path);
        if relative.as_os_str().is_empty() {
            path.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.to_string_lossy().to_string())
        } else {
            relative.to_string_lossy().to_string()
        }
    }
}
