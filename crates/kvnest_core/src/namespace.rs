//! Namespace routing.
//!
//! Backends only know a flat set of table names. A namespace is a prefix
//! made of path segments, each terminated by [`SEPARATOR`]:
//!
//! ```text
//! root                    ""
//! sub("app")              "app␟"
//! sub("app").sub("v2")    "app␟v2␟"
//! bucket("team")          "__shared__␟team␟"
//!
//! table "users" in app/v2 "app␟v2␟users"
//! ```
//!
//! All prefix construction and parsing lives here so that the
//! "starts with prefix" and "starts with prefix + separator" checks cannot
//! drift apart.

use crate::error::{CoreError, CoreResult};
use kvnest_storage::SEPARATOR;
use std::collections::HashSet;

/// First segment of every shared (tenant) namespace.
pub const SHARED_ROOT: &str = "__shared__";

/// Checks that `name` can be used as a table or namespace segment.
///
/// # Errors
///
/// Returns [`CoreError::InvalidName`] for empty names and for names
/// containing [`SEPARATOR`].
pub fn validate_name(name: &str) -> CoreResult<()> {
    if name.is_empty() {
        return Err(CoreError::invalid_name(name, "name is empty"));
    }
    if name.contains(SEPARATOR) {
        return Err(CoreError::invalid_name(
            name,
            "contains the namespace separator",
        ));
    }
    Ok(())
}

/// A position in the namespace tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Namespace {
    prefix: String,
}

impl Namespace {
    /// The root namespace (empty prefix).
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// The shared namespace called `name`, independent of any caller's
    /// position in the tree.
    pub fn shared(name: &str) -> CoreResult<Self> {
        validate_name(name)?;
        Ok(Self {
            prefix: format!("{SHARED_ROOT}{SEPARATOR}{name}{SEPARATOR}"),
        })
    }

    /// The child namespace `name` below this one.
    pub fn sub(&self, name: &str) -> CoreResult<Self> {
        validate_name(name)?;
        Ok(Self {
            prefix: format!("{}{name}{SEPARATOR}", self.prefix),
        })
    }

    /// Returns the raw prefix, separators included.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns true for the root namespace.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.prefix.is_empty()
    }

    /// Returns the path segments leading to this namespace.
    #[must_use]
    pub fn segments(&self) -> Vec<&str> {
        self.prefix
            .split(SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .collect()
    }

    /// Maps a caller's table name to its backend name.
    pub fn qualify(&self, table: &str) -> CoreResult<String> {
        validate_name(table)?;
        Ok(format!("{}{table}", self.prefix))
    }

    /// Strips this namespace's prefix from a backend name.
    fn relative<'a>(&self, qualified: &'a str) -> Option<&'a str> {
        qualified
            .strip_prefix(self.prefix.as_str())
            .filter(|rest| !rest.is_empty())
    }

    /// Selects the tables that live directly in this namespace.
    ///
    /// Tables of nested namespaces are left out.
    pub fn child_tables<'a, I>(&self, qualified: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        qualified
            .into_iter()
            .filter_map(|name| self.relative(name))
            .filter(|rest| !rest.contains(SEPARATOR))
            .map(str::to_string)
            .collect()
    }

    /// Selects the backend names that belong to namespaces nested below
    /// this one, relative to this namespace.
    ///
    /// With `limit_depth` each name is collapsed to its first segment and
    /// duplicates are removed, which yields the direct child namespaces.
    pub fn sub_namespaces<'a, I>(&self, qualified: I, limit_depth: bool) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for rest in qualified.into_iter().filter_map(|name| self.relative(name)) {
            let Some((first, _)) = rest.split_once(SEPARATOR) else {
                continue;
            };
            if !limit_depth {
                out.push(rest.to_string());
            } else if seen.insert(first) {
                out.push(first.to_string());
            }
        }
        out
    }
}
