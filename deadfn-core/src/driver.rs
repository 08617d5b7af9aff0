//! Parallel execution of per-TU analysis with serialized merging.
//!
//! The executor owns the concurrency model: TU analysis and classification
//! run on a rayon worker pool with no shared mutable state, and only the
//! final table merge serializes behind the [`SymbolTable`] mutex. There is
//! no ordering guarantee between merges; the aggregation is commutative, so
//! none is needed.
//!
//! Fault tolerance:
//! - one TU failing to analyze contributes no observations, is counted and
//!   logged, and never aborts the run;
//! - only failing to bring up the worker pool itself is fatal.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::aggregate::{SymbolRecord, SymbolTable};
use crate::classify::classify;
use crate::error::{DeadfnError, DeadfnResult};
use crate::extract::collect_facts;
use crate::symbol::{SymbolId, TuObservations};

/// Outcome counters for one whole-program run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of TUs scheduled.
    pub tus_total: usize,
    /// Number of TUs whose analysis failed and was skipped.
    pub tus_failed: usize,
}

impl RunSummary {
    /// Whether any scheduled TU failed to contribute observations.
    pub fn is_partial(&self) -> bool {
        self.tus_failed > 0
    }
}

/// Run `analyzer` over every TU, classify each result, and merge everything
/// into one frozen symbol table.
///
/// `analyzer` is the source-analyzer boundary: given one TU handle it
/// produces that TU's raw observations, typically by parsing or by loading
/// a pre-extracted observation file. It runs concurrently across TUs and
/// must not rely on shared mutable state.
///
/// `threads` selects the worker count; `None` uses one worker per core.
pub fn analyze_all<T, F>(
    tus: &[T],
    analyzer: F,
    threads: Option<usize>,
) -> DeadfnResult<(BTreeMap<SymbolId, SymbolRecord>, RunSummary)>
where
    T: Sync,
    F: Fn(&T) -> anyhow::Result<TuObservations> + Sync,
{
    let table = SymbolTable::new();
    let failed = AtomicUsize::new(0);

    let run = || {
        tus.par_iter().for_each(|tu| match analyzer(tu) {
            Ok(obs) => {
                let facts = collect_facts(&obs);
                table.merge(classify(facts));
            }
            Err(e) => {
                warn!(error = %format!("{:#}", e), "translation unit analysis failed; skipping");
                failed.fetch_add(1, Ordering::Relaxed);
            }
        });
    };

    match threads {
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| DeadfnError::executor(format!("cannot build worker pool: {}", e)))?;
            pool.install(run);
        }
        None => run(),
    }

    let summary = RunSummary {
        tus_total: tus.len(),
        tus_failed: failed.into_inner(),
    };
    info!(
        tus_total = summary.tus_total,
        tus_failed = summary.tus_failed,
        symbols = table.len(),
        "all translation units merged"
    );

    Ok((table.into_records(), summary))
}
