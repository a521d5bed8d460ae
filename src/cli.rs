//! Command-line interface for litguard.

use clap::{Parser, Subcommand};
use globset::GlobSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::{self, Config, CONFIG_FILE_NAMES};
use crate::detect::Runner;
use crate::parser;
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Literal hygiene for TypeScript and JavaScript.
///
/// litguard reports repeated string literals, magic numbers and
/// object-shaped bindings declared without an explicit type.
#[derive(Parser)]
#[command(name = "litguard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lint files against the configured rules
    #[command(visible_alias = "check")]
    Lint(LintArgs),
    /// Create a new litguard configuration from a template
    Init(InitArgs),
}

/// Arguments for the lint command.
#[derive(Parser)]
pub struct LintArgs {
    /// Path to lint (file or directory)
    pub path: PathBuf,

    /// Path to configuration YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty, json, or sarif
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Show suppressed violations in output
    #[arg(long)]
    pub show_suppressed: bool,

    /// Log exemption decisions and per-file progress to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "litguard.yaml")]
    pub output: PathBuf,

    /// Template to use
    #[arg(short, long, default_value = "recommended")]
    pub template: String,

    /// List available templates
    #[arg(short, long)]
    pub list: bool,
}

/// Available configuration templates.
struct Template {
    name: &'static str,
    description: &'static str,
    content: &'static str,
}

static TEMPLATES: &[Template] = &[
    Template {
        name: "recommended",
        description: "All rules with the common exemptions for web projects",
        content: include_str!("templates/recommended.yaml"),
    },
    Template {
        name: "minimal",
        description: "All rules with their default options",
        content: include_str!("templates/minimal.yaml"),
    },
];

/// The configuration to lint with: explicit path, discovered file, or the
/// built-in recommended preset.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<(Config, String)> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => Config::discover(Path::new(".")),
    };

    match path {
        Some(path) => {
            let config = Config::parse_file(&path)
                .map_err(|e| anyhow::anyhow!("parsing {}: {}", path.display(), e))?;
            Ok((config, path.to_string_lossy().to_string()))
        }
        None => {
            tracing::info!(
                "no configuration file found (looked for {}), using recommended preset",
                CONFIG_FILE_NAMES.join(", ")
            );
            Ok((Config::recommended(), "<recommended>".to_string()))
        }
    }
}

fn is_test_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    name.contains(".test.") || name.contains(".spec.")
}

/// Collect lintable files under `root`.
pub fn collect_files(
    root: &Path,
    include_test_files: bool,
    excluded: &GlobSet,
) -> anyhow::Result<Vec<PathBuf>> {
    let supported_extensions = parser::supported_extensions();

    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            if name.starts_with('.') || name == "node_modules" {
                return false;
            }
            if !include_test_files && (name == "__tests__" || name == "__mocks__") {
                return false;
            }
            true
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        if !supported_extensions.contains(&ext) {
            continue;
        }
        if !include_test_files && is_test_file(path) {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(path);
        if excluded.is_match(relative) || excluded.is_match(path) {
            tracing::debug!(file = %path.display(), "excluded");
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

/// Run the lint command.
pub fn run_lint(args: &LintArgs) -> anyhow::Result<i32> {
    parser::init();

    if args.format != "pretty" && args.format != "json" && args.format != "sarif" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty', 'json', or 'sarif'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let (config, config_path) = match load_config(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    if let Err(e) = config::validate(&config) {
        eprintln!("Error: invalid configuration: {}", e);
        return Ok(EXIT_ERROR);
    }
    let rules = config.rule_set()?;
    let excluded = config.excluded_matcher()?;

    let abs_path = match args.path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    let (base_dir, files) = if abs_path.is_dir() {
        let files = collect_files(&abs_path, config.should_include_test_files(), &excluded)?;
        (abs_path.clone(), files)
    } else {
        let base = abs_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| abs_path.clone());
        (base, vec![abs_path.clone()])
    };

    if files.is_empty() {
        eprintln!("Warning: no files to lint");
        return Ok(EXIT_SUCCESS);
    }
    if rules.is_empty() {
        eprintln!("Warning: no rules enabled in {}", config_path);
    }

    let runner = Runner::new(&base_dir, rules);
    let result = runner.run(&files);

    let path_str = args.path.to_string_lossy().to_string();
    match args.format.as_str() {
        "json" => report::write_json(&path_str, &config_path, &result, args.show_suppressed)?,
        "sarif" => report::write_sarif(Path::new(""), &result)?,
        _ => report::write_pretty(&path_str, &config_path, &result, args.show_suppressed),
    }

    if result.has_errors() {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.list {
        return list_templates();
    }

    let template = match TEMPLATES.iter().find(|t| t.name == args.template) {
        Some(t) => t,
        None => {
            eprintln!("Error: unknown template {:?}", args.template);
            eprintln!("Run 'litguard init --list' to see available templates");
            return Ok(EXIT_ERROR);
        }
    };

    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, template.content) {
        eprintln!("Error: failed to write configuration: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {} from template '{}'", args.output.display(), template.name);
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize for your project", args.output.display());
    println!("  2. Run: litguard lint . --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}

fn list_templates() -> anyhow::Result<i32> {
    println!("Available templates:");
    println!();

    for template in TEMPLATES {
        let name = if template.name == "recommended" {
            format!("{} (default)", template.name)
        } else {
            template.name.to_string()
        };
        println!("  {:<20} {}", name, template.description);
    }

    println!();
    println!("Usage:");
    println!("  litguard init --template <name>");

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use globset::GlobSetBuilder;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "export {};\n").unwrap();
    }

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_templates_parse_and_validate() {
        for template in TEMPLATES {
            let config: Config = serde_yaml::from_str(template.content)
                .unwrap_or_else(|e| panic!("{}: {}", template.name, e));
            config::validate(&config).unwrap();
        }
    }

    #[cfg(feature = "tree-sitter")]
    #[test]
    fn test_collect_files_filters() {
        parser::init();
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(root, "src/app.ts");
        touch(root, "src/view.tsx");
        touch(root, "src/app.test.ts");
        touch(root, "src/__tests__/helpers.ts");
        touch(root, "src/readme.md");
        touch(root, "node_modules/lib/index.js");
        touch(root, ".cache/out.js");
        touch(root, "dist/bundle.js");

        let mut builder = GlobSetBuilder::new();
        builder.add(globset::Glob::new("dist/**").unwrap());
        let excluded = builder.build().unwrap();

        let files = collect_files(root, false, &excluded).unwrap();
        assert_eq!(names(root, &files), vec!["src/app.ts", "src/view.tsx"]);

        let files = collect_files(root, true, &GlobSet::empty()).unwrap();
        assert_eq!(
            names(root, &files),
            vec![
                "dist/bundle.js",
                "src/__tests__/helpers.ts",
                "src/app.test.ts",
                "src/app.ts",
                "src/view.tsx",
            ]
        );
    }

    #[test]
    fn test_init_writes_template() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("conf/litguard.yaml");
        let args = InitArgs {
            output: output.clone(),
            template: "minimal".to_string(),
            list: false,
        };
        assert_eq!(run_init(&args).unwrap(), EXIT_SUCCESS);
        let config = Config::parse_file(&output).unwrap();
        assert_eq!(config.name, "minimal");

        assert_eq!(run_init(&args).unwrap(), EXIT_ERROR);
    }

    #[test]
    fn test_init_unknown_template() {
        let temp = TempDir::new().unwrap();
        let args = InitArgs {
            output: temp.path().join("litguard.yaml"),
            template: "strict".to_string(),
            list: false,
        };
        assert_eq!(run_init(&args).unwrap(), EXIT_ERROR);
        assert!(!args.output.exists());
    }
}
