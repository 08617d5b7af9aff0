//! Per-TU classification: local unused candidates and external uses.
//!
//! Works purely on one TU's facts, with no shared state, so any number of
//! TUs can be classified in parallel. Two set differences by canonical
//! identity:
//!
//! 1. `unused_candidates = defs − uses`: definitions with no reference
//!    inside their own TU. Only candidates; another TU's uses may still
//!    clear them at merge time.
//! 2. `external_uses = uses − defs'`, where `defs'` is `defs` with weak
//!    definitions removed.
//!
//! Weak removal happens after step 1 and before step 2. A weak definition
//! still absorbs a same-TU use when judging this TU's own candidates, but
//! it must not swallow the use's global visibility: the use has to count
//! toward whichever strong definition overrides the weak one at link time.

use tracing::debug;

use crate::extract::{DefRecord, TuFacts};
use crate::symbol::SymbolId;

/// One TU's contribution to the global table.
#[derive(Debug, Default)]
pub struct TuClassification {
    /// Definitions unused within their own TU.
    pub unused_candidates: Vec<DefRecord>,
    /// Identities referenced here but not strongly defined here, with the
    /// number of references observed.
    pub external_uses: Vec<(SymbolId, u32)>,
}

/// Classify one TU's facts.
pub fn classify(facts: TuFacts) -> TuClassification {
    let TuFacts { defs, uses } = facts;

    let mut unused_candidates: Vec<DefRecord> = defs
        .values()
        .filter(|d| !uses.contains_key(&d.id))
        .cloned()
        .collect();
    // Stable order inside one TU; the merge itself is order-insensitive.
    unused_candidates.sort_by(|a, b| a.id.cmp(&b.id));

    let mut external_uses: Vec<(SymbolId, u32)> = uses
        .into_iter()
        .filter(|(id, _)| match defs.get(id) {
            Some(def) => def.is_weak,
            None => true,
        })
        .collect();
    external_uses.sort_by(|a, b| a.0.cmp(&b.0));

    for d in &unused_candidates {
        debug!(symbol = %d.name, id = %d.id, "unused candidate");
    }
    for (id, count) in &external_uses {
        debug!(id = %id, count, "external use");
    }

    TuClassification {
        unused_candidates,
        external_uses,
    }
}
