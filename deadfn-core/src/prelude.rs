//! Prelude module for convenient imports.
//!
//! Import the commonly used engine types with a single line:
//!
//! ```rust,ignore
//! use deadfn_core::prelude::*;
//! ```

// Identity and observation events
pub use crate::symbol::{DeclSite, DefEvent, SymbolId, TuObservations, UseEvent};

// Per-TU pipeline
pub use crate::classify::{classify, TuClassification};
pub use crate::extract::{collect_facts, DefRecord, TuFacts};

// Global aggregation
pub use crate::aggregate::{SymbolRecord, SymbolTable};

// Executor
pub use crate::driver::{analyze_all, RunSummary};

// Reporting
pub use crate::report::{collect_findings, Finding};

// Errors
pub use crate::error::{DeadfnError, DeadfnResult};
