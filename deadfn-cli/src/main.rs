//! deadfn CLI - whole-program unused function detector for C/C++ projects.
//!
//! Consumes per-TU observation files emitted by the source analyzer (one
//! JSON file per translation unit, anywhere under the given root), runs the
//! classification engine over all of them in parallel, and prints a
//! compiler-style diagnostic stream for every function no TU references.
//!
//! Exit status reflects whether the run itself completed: findings are the
//! analysis succeeding, not failing. Individual TUs that cannot be loaded
//! are logged and skipped; only an unusable root or worker pool is fatal.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use deadfn_core::{
    analyze_all, collect_findings, compile_ignore_patterns, gather_observation_files,
    init_structured_logging, load_config, print_json, print_plain, Finding, TuObservations,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Whole-program unused function detector for C/C++")]
pub struct Cli {
    /// Root directory containing per-TU observation files (.json)
    #[arg(default_value = ".")]
    path: String,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Worker thread count (default: one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Regex patterns of qualified names to suppress from the report
    #[arg(long, num_args = 1..)]
    ignore: Vec<String>,

    /// Directory names to skip while discovering observation files
    #[arg(long, num_args = 1..)]
    exclude_dir: Vec<String>,
}

/// Load one TU's observations from its JSON file.
fn load_observations(path: &Path) -> Result<TuObservations> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read observation file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Malformed observation file {}", path.display()))
}

/// Checks if a finding's qualified name matches any ignore pattern.
fn is_ignored(finding: &Finding, patterns: &[regex::Regex]) -> bool {
    patterns.iter().any(|p| p.is_match(&finding.name))
}

fn main() -> Result<()> {
    // Global panic guard - a crash in the engine should exit cleanly
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] deadfn internal error: {}", info);
        eprintln!("[PANIC] The process will exit safely with code 2.");
    }));

    // Structured logging (JSON to stderr, respects RUST_LOG)
    init_structured_logging();

    let cli = Cli::parse();

    let root = PathBuf::from(&cli.path);
    if !root.exists() {
        anyhow::bail!("Observation root does not exist: {}", root.display());
    }

    // Config from deadfn.toml is additive; CLI flags take precedence.
    let mut ignore = cli.ignore.clone();
    let mut threads = cli.threads;
    let mut json = cli.json;
    match load_config(&root) {
        Ok(Some(cfg)) => {
            if let Some(list) = cfg.ignore {
                ignore.extend(list);
            }
            if threads.is_none() {
                threads = cfg.threads;
            }
            if let Some(output) = cfg.output {
                if output.format.as_deref() == Some("json") {
                    json = true;
                }
            }
        }
        Ok(None) => {}
        Err(e) => {
            eprintln!("[WARN] config load failed: {}", e);
        }
    }

    let ignore_patterns = compile_ignore_patterns(&ignore)?;

    // 1. Discover observation files
    let excludes: Vec<&str> = cli.exclude_dir.iter().map(String::as_str).collect();
    let files = gather_observation_files(&root, &excludes)
        .with_context(|| format!("Failed to scan {}", root.display()))?;

    if files.is_empty() {
        eprintln!("[WARN] No observation files found under {}", root.display());
    }

    // 2. Classify every TU in parallel and merge
    let (records, summary) = analyze_all(&files, |path| load_observations(path), threads)?;

    // 3. Report
    let findings: Vec<Finding> = collect_findings(&records)
        .into_iter()
        .filter(|f| !is_ignored(f, &ignore_patterns))
        .collect();

    if json {
        print_json(&findings);
    } else {
        print_plain(&findings);
    }

    eprintln!(
        "INFO: {} TU(s) analyzed, {} failed, {} unused function(s)",
        summary.tus_total - summary.tus_failed,
        summary.tus_failed,
        findings.len()
    );

    Ok(())
}
