//! Per-TU fact extraction: exemption policy and identity canonicalization.
//!
//! Turns a TU's raw observation events into the two keyed collections the
//! classifier works with:
//! - `defs`: definitions that survived the exemption table
//! - `uses`: referenced identities with per-TU observation counts
//!
//! The exemption policy is one ordered table of named rules, evaluated once
//! per definition event. A definition matching any rule never enters `defs`
//! and therefore can never be reported. Keeping the rules in a single table
//! (rather than scattered through classification) makes the policy auditable
//! and testable rule by rule.
//!
//! Identity canonicalization happens here too: template instantiations
//! resolve to their generic pattern's identity before any set operation, so
//! uses of any instantiation count toward the single generic definition.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::symbol::{DeclSite, DefEvent, SymbolId, TuObservations, UseEvent};

/// One named exemption rule. A definition is excluded when `excludes`
/// returns true.
pub struct ExemptionRule {
    /// Stable rule name, used in debug traces and tests.
    pub name: &'static str,
    /// Predicate over the raw definition event.
    pub excludes: fn(&DefEvent) -> bool,
}

/// The exemption table, in evaluation order.
///
/// - `no-body`: forward declarations, `= delete`, `= default` without a
///   body are not definitions.
/// - `system-header`: library-owned code is not project dead-code.
/// - `outside-primary-file`: definitions pulled in from another file are
///   judged when their owning TU is analyzed.
/// - `virtual-override`: overriders of non-pure virtual methods are
///   reachable through dynamic dispatch this analysis cannot observe.
/// - `destructor`: destructor invocation is implicit and never surfaces as
///   a reference.
/// - `entry-point`: the program entry point is invoked by the runtime.
pub const EXEMPTION_RULES: &[ExemptionRule] = &[
    ExemptionRule {
        name: "no-body",
        excludes: |d| !d.has_body,
    },
    ExemptionRule {
        name: "system-header",
        excludes: |d| d.in_system_header,
    },
    ExemptionRule {
        name: "outside-primary-file",
        excludes: |d| !d.in_primary_file,
    },
    ExemptionRule {
        name: "virtual-override",
        excludes: |d| d.is_virtual_override,
    },
    ExemptionRule {
        name: "destructor",
        excludes: |d| d.is_destructor,
    },
    ExemptionRule {
        name: "entry-point",
        excludes: |d| d.is_entry_point,
    },
];

/// Returns the name of the first exemption rule matching `def`, if any.
pub fn exemption_for(def: &DefEvent) -> Option<&'static str> {
    EXEMPTION_RULES
        .iter()
        .find(|rule| (rule.excludes)(def))
        .map(|rule| rule.name)
}

/// A definition retained for classification, with the metadata the
/// aggregator will need if it ends up an unused candidate.
#[derive(Debug, Clone)]
pub struct DefRecord {
    /// Canonical identity (already pattern-resolved).
    pub id: SymbolId,
    /// Qualified display name.
    pub name: String,
    /// Definition site, absolute.
    pub file: PathBuf,
    /// 1-based line of the definition.
    pub line: u32,
    /// Weak linkage flag, consumed by the classifier.
    pub is_weak: bool,
    /// Non-defining redeclaration sites, absolute, in source order.
    pub declarations: Vec<DeclSite>,
}

/// The classifier's input for one TU.
#[derive(Debug, Default)]
pub struct TuFacts {
    /// Surviving definitions, keyed by canonical identity.
    pub defs: HashMap<SymbolId, DefRecord>,
    /// Referenced identities with the number of references seen in this TU.
    pub uses: HashMap<SymbolId, u32>,
}

/// Canonical identity of a definition event: the template pattern when the
/// event is an instantiation, the event's own identity otherwise.
fn canonical_def_id(def: &DefEvent) -> SymbolId {
    def.pattern_id.clone().unwrap_or_else(|| def.id.clone())
}

/// Canonical identity of a use event, same pattern resolution.
fn canonical_use_id(used: &UseEvent) -> SymbolId {
    used.pattern_id.clone().unwrap_or_else(|| used.id.clone())
}

/// Build classifier facts for one TU from its raw observations.
///
/// Applies the exemption table to definitions, filters system-header uses,
/// resolves template identities, absolutizes every recorded path, and
/// injects a synthetic self-use for runtime-invoked definitions so they can
/// never be reported regardless of call-site visibility.
pub fn collect_facts(obs: &TuObservations) -> TuFacts {
    let mut facts = TuFacts::default();

    for def in &obs.definitions {
        if let Some(rule) = exemption_for(def) {
            debug!(symbol = %def.name, rule, tu = %obs.tu.display(), "definition exempt");
            continue;
        }

        let id = canonical_def_id(def);
        facts.defs.entry(id.clone()).or_insert_with(|| DefRecord {
            id: id.clone(),
            name: def.name.clone(),
            file: absolutize(&def.file),
            line: def.line,
            is_weak: def.is_weak,
            declarations: def
                .declarations
                .iter()
                .map(|d| DeclSite {
                    file: absolutize(&d.file),
                    line: d.line,
                })
                .collect(),
        });

        if def.runtime_invoked {
            *facts.uses.entry(id).or_insert(0) += 1;
        }
    }

    for used in &obs.uses {
        if used.in_system_header {
            continue;
        }
        *facts.uses.entry(canonical_use_id(used)).or_insert(0) += 1;
    }

    facts
}

/// Lexically resolve a path to an absolute form.
///
/// Does not touch the filesystem: `.` and `..` components are folded out so
/// the same header seen from different TUs produces one stable key, but
/// symlinks are left alone (the source analyzer already emits resolved
/// paths in the common case).
pub fn absolutize(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    let mut out = PathBuf::new();
    for comp in joined.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(comp.as_os_str());
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
