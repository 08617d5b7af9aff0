//! Global aggregation of per-TU classifier results.
//!
//! A process-wide table keyed by canonical identity, mutated once per
//! completed TU under a single mutex. The merge operation is a set union
//! plus counter increments, so it is commutative and associative: TU merge
//! order never changes the final table, which is what lets TU analysis run
//! in parallel with no ordering guarantees.
//!
//! Records are created lazily on first observation, live for the whole run,
//! and are never deleted. A record without a definition represents a symbol
//! seen only as used (defined in an unanalyzed TU or in a library); it keeps
//! its use count visible and is never reported.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::classify::TuClassification;
use crate::symbol::{DeclSite, SymbolId};

/// Definition metadata retained for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    /// Qualified display name.
    pub name: String,
    /// Definition file, absolute.
    pub file: PathBuf,
    /// 1-based line of the definition.
    pub line: u32,
}

/// Aggregated whole-program knowledge about one canonical symbol.
#[derive(Debug, Clone, Default)]
pub struct SymbolRecord {
    /// At most one definition site is retained. When the same canonical id
    /// is defined by more than one TU observation the latest writer wins;
    /// the use count is unaffected.
    pub definition: Option<Definition>,
    /// Known prototype sites, deduplicated, in source order.
    pub declarations: Vec<DeclSite>,
    /// Total references observed outside the defining TU. Monotonically
    /// increasing for the lifetime of the run.
    pub use_count: u64,
}

/// The process-wide symbol table.
///
/// `merge` is the sole critical section of the whole pipeline and does a
/// constant amount of work per classified symbol, so lock contention stays
/// negligible next to per-TU analysis cost.
#[derive(Debug, Default)]
pub struct SymbolTable {
    inner: Mutex<BTreeMap<SymbolId, SymbolRecord>>,
}

impl SymbolTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one TU's classification into the table.
    ///
    /// Called once per completed TU, from any worker thread.
    pub fn merge(&self, tu: TuClassification) {
        let mut table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        for candidate in tu.unused_candidates {
            let record = table.entry(candidate.id.clone()).or_default();

            if let Some(existing) = &record.definition {
                if existing.file != candidate.file || existing.line != candidate.line {
                    // Two TUs claiming distinct definition sites for one
                    // identity points at the identity resolver, not at this
                    // layer. Latest writer wins.
                    debug!(
                        id = %candidate.id,
                        old = %existing.file.display(),
                        new = %candidate.file.display(),
                        "conflicting definition sites for one identity"
                    );
                }
            }

            record.definition = Some(Definition {
                name: candidate.name,
                file: candidate.file,
                line: candidate.line,
            });
            record.declarations = dedup_in_order(candidate.declarations);
        }

        for (id, count) in tu.external_uses {
            let record = table.entry(id).or_default();
            record.use_count += u64::from(count);
        }
    }

    /// Number of known symbols.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume the table after all TUs have merged, yielding the frozen
    /// map the report generator reads.
    pub fn into_records(self) -> BTreeMap<SymbolId, SymbolRecord> {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Remove exact duplicate declaration sites while preserving source order.
fn dedup_in_order(sites: Vec<DeclSite>) -> Vec<DeclSite> {
    let mut out: Vec<DeclSite> = Vec::with_capacity(sites.len());
    for site in sites {
        if !out.contains(&site) {
            out.push(site);
        }
    }
    out
}
