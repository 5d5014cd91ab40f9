//! Reserved names shared by every backend.
//!
//! Backends only know a flat set of table names. Nesting is expressed by
//! joining path segments with [`SEPARATOR`]; the routing layer in
//! `kvnest_core` builds those names, backends only need the subtree test
//! used by `drop`.

/// Separator byte between namespace segments (ASCII unit separator).
pub const SEPARATOR: char = '\u{1f}';

/// Name of the reserved bookkeeping table.
///
/// It contains [`SEPARATOR`], so no caller-supplied name can collide with it.
pub const SYSTEM_TABLE: &str = "\u{1f}kvnest";

/// Returns true if `candidate` is `root` itself or lies beneath it.
///
/// Matching is by exact name or `root` + [`SEPARATOR`] prefix, so the table
/// `"ab"` is never treated as part of `"a"`. An empty `root` names no table
/// and has no subtree.
#[must_use]
pub fn in_subtree(candidate: &str, root: &str) -> bool {
    if root.is_empty() {
        return false;
    }
    match candidate.strip_prefix(root) {
        Some("") => true,
        Some(rest) => rest.starts_with(SEPARATOR),
        None => false,
    }
}

/// Returns true if `name` is the reserved system table.
#[must_use]
pub fn is_system(name: &str) -> bool {
    name == SYSTEM_TABLE
}
