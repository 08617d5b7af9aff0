//! Report generation over the frozen symbol table.
//!
//! A finding is a symbol with a known definition and an aggregated use count
//! of zero. Symbols observed only as used are never reported. Output order
//! is deterministic for a given input set: findings sort by definition file,
//! then line, then name.
//!
//! Diagnostic format, one finding per function:
//!
//! ```text
//! <absolute-path>:<line>: warning: Function '<qualified-name>' is unused
//! <absolute-path>:<line>: note: declared here
//! ```
//!
//! with one note per known prototype, in source order.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use serde_json::json;

use crate::aggregate::SymbolRecord;
use crate::symbol::{DeclSite, SymbolId};

/// One unused-function finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Qualified display name.
    pub name: String,
    /// Definition file, absolute.
    pub file: PathBuf,
    /// 1-based line of the definition.
    pub line: u32,
    /// Prototype sites, in source order.
    pub declarations: Vec<DeclSite>,
}

/// Collect findings from the frozen table, in report order.
pub fn collect_findings(records: &BTreeMap<SymbolId, SymbolRecord>) -> Vec<Finding> {
    let mut findings: Vec<Finding> = records
        .values()
        .filter(|r| r.use_count == 0)
        .filter_map(|r| {
            r.definition.as_ref().map(|def| Finding {
                name: def.name.clone(),
                file: def.file.clone(),
                line: def.line,
                declarations: r.declarations.clone(),
            })
        })
        .collect();

    findings.sort_by(|a, b| {
        a.file
            .cmp(&b.file)
            .then_with(|| a.line.cmp(&b.line))
            .then_with(|| a.name.cmp(&b.name))
    });
    findings
}

/// Render the diagnostic stream for a set of findings.
pub fn render_plain(findings: &[Finding]) -> String {
    let mut out = String::new();
    for f in findings {
        let _ = writeln!(
            out,
            "{}:{}: warning: Function '{}' is unused",
            f.file.display(),
            f.line,
            f.name
        );
        for decl in &f.declarations {
            let _ = writeln!(out, "{}:{}: note: declared here", decl.file.display(), decl.line);
        }
    }
    out
}

/// Print findings as a plain diagnostic stream to stdout.
pub fn print_plain(findings: &[Finding]) {
    print!("{}", render_plain(findings));
}

/// Print findings as JSON to stdout.
///
/// Falls back to the plain stream if serialization fails, which cannot
/// happen for these value types but is handled rather than unwrapped.
pub fn print_json(findings: &[Finding]) {
    let value = json!({
        "unused_count": findings.len(),
        "unused": findings.iter().map(|f| {
            json!({
                "name": f.name,
                "file": f.file.display().to_string(),
                "line": f.line,
                "declarations": f.declarations.iter().map(|d| {
                    json!({ "file": d.file.display().to_string(), "line": d.line })
                }).collect::<Vec<_>>(),
            })
        }).collect::<Vec<_>>(),
    });

    match serde_json::to_string_pretty(&value) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            print_plain(findings);
        }
    }
}
