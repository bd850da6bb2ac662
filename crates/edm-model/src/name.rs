//! Qualified names and the name-lookup policy.

use serde::Serialize;
use std::fmt::{self, Display};
use std::sync::Arc;

/// The `(namespace, name)` identity every schema lookup is keyed by.
///
/// Equality is exact, case-sensitive string match. Case-insensitive lookup is
/// a [`NameLookup`] policy applied at the table, never a property of the key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct QualifiedName {
    namespace: Arc<str>,
    name: Arc<str>,
}

impl QualifiedName {
    pub fn new(namespace: impl Into<Arc<str>>, name: impl Into<Arc<str>>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// A name with an empty namespace, as used for the bare-name registration
    /// of entity containers.
    pub fn bare(name: impl Into<Arc<str>>) -> Self {
        Self::new("", name)
    }

    /// Split `NS.Sub.Name` on the last dot. A dotless input yields a bare name.
    pub fn parse(full: &str) -> Self {
        match full.rsplit_once('.') {
            Some((namespace, name)) => Self::new(namespace, name),
            None => Self::bare(full),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_bare(&self) -> bool {
        self.namespace.is_empty()
    }

    /// Case-folded comparison used by [`NameLookup::CaseInsensitive`].
    pub fn matches_ignore_case(&self, other: &QualifiedName) -> bool {
        self.namespace.eq_ignore_ascii_case(&other.namespace)
            && self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_bare() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

/// How a table compares a requested name against its keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameLookup {
    #[default]
    CaseSensitive,
    /// ASCII case folding. A fold-and-compare scan over the table, not a
    /// second index; exact matches still win over folded ones.
    CaseInsensitive,
}
