//! deadfn-core: whole-program unused function detection for C/C++ codebases.
//!
//! This library aggregates per-translation-unit observations ("this
//! function was defined here", "this function was used here", each tagged
//! with a link-stable canonical identity) and classifies every symbol as
//! used or unused across the entire program. A definition unused within its
//! own TU may still be called from another TU, so nothing is judged until
//! every TU has merged.
//!
//! Parsing, name resolution, and AST traversal are the source analyzer's
//! job; this crate consumes its event stream and owns everything after it:
//!
//! - **Exemption policy**: weak linkage, virtual overrides, destructors,
//!   entry points, template patterns, runtime-invoked attributes
//! - **Per-TU classification**: local unused candidates and external uses
//! - **Global aggregation**: a commutative, mutex-guarded merge so TUs can
//!   be analyzed concurrently in any order
//! - **Reporting**: a deterministic compiler-style diagnostic stream
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use deadfn_core::prelude::*;
//!
//! let tus = deadfn_core::gather_observation_files(root, &[])?;
//! let (records, summary) = analyze_all(&tus, load_tu_observations, None)?;
//! for finding in collect_findings(&records) {
//!     println!("{} is unused", finding.name);
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`symbol`]: canonical identity and observation event types
//! - [`extract`]: exemption rule table and per-TU fact building
//! - [`classify`]: per-TU unused-candidate / external-use split
//! - [`aggregate`]: the process-wide symbol table and its merge
//! - [`driver`]: parallel TU executor with per-TU fault isolation
//! - [`report`]: finding collection and diagnostic output
//! - [`scan`]: observation-file discovery
//! - [`config`], [`error`], [`logging`]: ambient plumbing

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod driver;
pub mod error;
pub mod extract;
pub mod logging;
pub mod prelude;
pub mod report;
pub mod scan;
pub mod symbol;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{DeadfnError, DeadfnResult, IoResultExt};

// Identity and events
pub use symbol::{DeclSite, DefEvent, SymbolId, TuObservations, UseEvent};

// Extraction and exemption policy
pub use extract::{
    absolutize, collect_facts, exemption_for, DefRecord, ExemptionRule, TuFacts, EXEMPTION_RULES,
};

// Classification
pub use classify::{classify, TuClassification};

// Aggregation
pub use aggregate::{Definition, SymbolRecord, SymbolTable};

// Executor
pub use driver::{analyze_all, RunSummary};

// Reporting
pub use report::{collect_findings, print_json, print_plain, render_plain, Finding};

// Configuration
pub use config::{compile_ignore_patterns, load_config, DeadfnConfig, OutputConfig};

// Logging
pub use logging::init_structured_logging;

// Observation-file discovery
pub use scan::gather_observation_files;

#[cfg(test)]
mod tests;
