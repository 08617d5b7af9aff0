//! Canonical symbol identity and per-TU observation events.
//!
//! A translation unit's source analyzer emits two ordered collections per TU:
//! definition events and use events. Every event carries a canonical,
//! link-stable identity ([`SymbolId`]) so that redeclarations, template
//! instantiations, and overriding methods of the same linked entity collapse
//! to a single map key across all TUs.
//!
//! The engine never constructs or interprets the identity's internal
//! encoding; it only compares, hashes, and orders it.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Opaque canonical identity for one logical function or method.
///
/// Two textual redeclarations (or instantiations) of the same linked entity
/// compare equal; two distinct overloads compare unequal. Ordering is only
/// used for deterministic table iteration, never for meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(String);

impl SymbolId {
    /// Wrap an identity string produced by the identity resolver.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SymbolId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SymbolId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One non-defining declaration (prototype) site of a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclSite {
    /// File containing the prototype.
    pub file: PathBuf,
    /// 1-based line number.
    pub line: u32,
}

/// A function definition observed in one TU.
///
/// Carries the metadata the exemption policy needs, pre-resolved by the
/// source analyzer: the engine trusts the flags, it does not re-derive them
/// from any AST.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefEvent {
    /// Canonical identity of the declared entity.
    pub id: SymbolId,
    /// Identity of the generic pattern when this definition is a template
    /// instantiation. Uses of any instantiation count toward the pattern.
    #[serde(default)]
    pub pattern_id: Option<SymbolId>,
    /// Qualified display name (e.g. `ns::Widget::draw`).
    pub name: String,
    /// File containing the definition.
    pub file: PathBuf,
    /// 1-based line of the definition.
    pub line: u32,
    /// Whether a body is attached. Deleted, defaulted, and forward
    /// declarations arrive with `false` and can never be "unused".
    #[serde(default = "default_true")]
    pub has_body: bool,
    /// Weak linkage: this definition may be overridden at link time.
    #[serde(default)]
    pub is_weak: bool,
    /// Definition lies in a system or library header.
    #[serde(default)]
    pub in_system_header: bool,
    /// Definition is textually written in the TU's primary file. Pulled-in
    /// definitions are judged by their owning TU instead.
    #[serde(default = "default_true")]
    pub in_primary_file: bool,
    /// Member function overriding a non-pure virtual base method.
    #[serde(default)]
    pub is_virtual_override: bool,
    /// Destructors are invoked implicitly and never appear as references.
    #[serde(default)]
    pub is_destructor: bool,
    /// The program's designated entry point.
    #[serde(default)]
    pub is_entry_point: bool,
    /// Carries an "invoked externally by the runtime/loader" attribute
    /// (constructor-priority and friends). Counted as a self-use.
    #[serde(default)]
    pub runtime_invoked: bool,
    /// All non-defining redeclaration sites visible in this TU, in source
    /// order.
    #[serde(default)]
    pub declarations: Vec<DeclSite>,
}

/// A function reference observed in one TU: any expression denoting a call,
/// member access, or construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UseEvent {
    /// Canonical identity of the referenced entity.
    pub id: SymbolId,
    /// Pattern identity when the reference hits a template instantiation.
    #[serde(default)]
    pub pattern_id: Option<SymbolId>,
    /// Reference occurs inside a system or library header.
    #[serde(default)]
    pub in_system_header: bool,
}

/// Everything the source analyzer saw in one translation unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuObservations {
    /// Primary source file of the TU.
    pub tu: PathBuf,
    /// Definition events, in source order.
    #[serde(default)]
    pub definitions: Vec<DefEvent>,
    /// Use events, in source order.
    #[serde(default)]
    pub uses: Vec<UseEvent>,
}

fn default_true() -> bool {
    true
}
