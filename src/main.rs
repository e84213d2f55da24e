//! yoda-lint CLI

use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use yoda_lint::{
    analyze_project, analyze_project_parallel, get_formatter, AnalysisResult, Config, FixEngine,
    OutputFormat, Severity,
};

#[derive(Parser)]
#[command(name = "yoda-lint")]
#[command(about = "Comparison-order linter - yoda/normal conventions, range idioms, and auto-fix")]
#[command(version)]
struct Cli {
    /// Files or directories to lint
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Enforced order: "always" (literal first) or "never"
    #[arg(long)]
    order: Option<String>,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    format: Format,

    /// Minimum severity level
    #[arg(long, default_value = "warning")]
    min_severity: SeverityLevel,

    /// Apply fixes automatically
    #[arg(long)]
    fix: bool,

    /// Show what would be fixed without changing files
    #[arg(long)]
    fix_dry_run: bool,

    /// Configuration file (default: nearest .yodalint.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Exclude patterns
    #[arg(long)]
    exclude: Vec<String>,

    /// Lint files in parallel
    #[arg(long)]
    parallel: bool,

    /// Verbose output
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum SeverityLevel {
    Error,
    Warning,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(order) = &cli.order {
        config.order = order.clone();
        if let Err(e) = config.settings() {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    }

    config.min_severity = match cli.min_severity {
        SeverityLevel::Error => yoda_lint::MinSeverity::Error,
        SeverityLevel::Warning => yoda_lint::MinSeverity::Warning,
    };
    config.exclude.extend(cli.exclude.iter().cloned());

    let files = match collect_files(&cli.paths) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if files.is_empty() {
        eprintln!("No script files found");
        return ExitCode::FAILURE;
    }

    if cli.verbose {
        eprintln!("Linting {} file(s)...", files.len());
    }

    let file_refs: Vec<&Path> = files.iter().map(|p| p.as_path()).collect();
    let outcome = if cli.parallel {
        analyze_project_parallel(&file_refs, &config)
    } else {
        analyze_project(&file_refs, &config)
    };
    let (results, skipped) = match outcome {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.verbose {
        for (file, err) in &skipped {
            eprintln!("Skipped {} ({})", file.display(), err);
        }
    }

    if cli.fix || cli.fix_dry_run {
        return handle_fixes(&results, cli.fix_dry_run);
    }

    let format = match cli.format {
        Format::Text => OutputFormat::Text,
        Format::Json => OutputFormat::Json,
    };

    let colored = !cli.no_color && atty::is(atty::Stream::Stdout);
    let formatter = get_formatter(format, colored);

    let mut combined = AnalysisResult::new();
    for result in results {
        combined.merge(result);
    }
    combined.sort();
    print!("{}", formatter.format(&combined));

    let has_errors = combined
        .diagnostics
        .iter()
        .any(|d| d.severity >= Severity::Error);

    if has_errors {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn load_config(cli: &Cli) -> Result<Config, String> {
    if let Some(config_path) = &cli.config {
        Config::load(config_path).map_err(|e| e.to_string())
    } else {
        let cwd = std::env::current_dir().map_err(|e| e.to_string())?;
        Ok(Config::find_and_load(&cwd)
            .map_err(|e| e.to_string())?
            .unwrap_or_default())
    }
}

fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, String> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            for entry in walkdir::WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let file_path = entry.path();
                if file_path.is_file() && is_script_file(file_path) {
                    files.push(file_path.to_path_buf());
                }
            }
        } else {
            return Err(format!("Path does not exist: {}", path.display()));
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn is_script_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext, "js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs"))
        .unwrap_or(false)
}

fn handle_fixes(results: &[AnalysisResult], dry_run: bool) -> ExitCode {
    let mut engine = FixEngine::new();

    for result in results {
        engine.collect_fixes(&result.diagnostics);
    }

    let fix_count = engine.fix_count();
    if fix_count == 0 {
        println!("No auto-fixes available");
        return ExitCode::SUCCESS;
    }

    println!("Found {} auto-fix(es)", fix_count);

    let files: Vec<PathBuf> = engine.files().map(|p| p.to_path_buf()).collect();
    for file in &files {
        let source = match std::fs::read_to_string(file) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error reading {}: {}", file.display(), e);
                continue;
            }
        };

        for preview in engine.preview(file, &source) {
            println!("\n{}:{}", preview.file.display(), preview.line);
            println!("  Rule: {}", preview.rule_id);
            println!("  - {}", preview.before);
            println!("  + {}", preview.after);
        }

        if !dry_run {
            match engine.apply(file, &source) {
                Ok(result) => {
                    if result.fixes_applied > 0 {
                        if let Err(e) = std::fs::write(file, &result.new_content) {
                            eprintln!("Error writing {}: {}", file.display(), e);
                        } else {
                            println!(
                                "Applied {} fix(es) to {}",
                                result.fixes_applied,
                                file.display()
                            );
                        }
                    }
                    if result.fixes_skipped > 0 {
                        println!(
                            "Skipped {} overlapping fix(es) in {}; re-run to apply",
                            result.fixes_skipped,
                            file.display()
                        );
                    }
                }
                Err(e) => eprintln!("Error: {}", e),
            }
        }
    }

    if dry_run {
        println!("\n(dry run - no changes made)");
    }

    ExitCode::SUCCESS
}
