//! Template locations as produced by the compiler.
//!
//! A [`Location`] points at a byte offset inside one template. When the
//! template was pulled in by another one (`extends`, `include`, a layout
//! block), `parent` points at the inclusion site in the enclosing template,
//! so a chain always runs innermost → outermost.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A byte offset inside a logical template, optionally nested in an
/// enclosing template's inclusion point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Logical template identifier (resolved later by a `Loader`).
    pub path: String,
    /// Byte offset into the template's raw source.
    pub offset: usize,
    /// Inclusion site in the enclosing template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<Location>>,
}

impl Location {
    /// Root-level location with no enclosing template.
    pub fn new(path: impl Into<String>, offset: usize) -> Self {
        Self {
            path: path.into(),
            offset,
            parent: None,
        }
    }

    /// Attach the inclusion site this location was reached through.
    #[must_use]
    pub fn with_parent(mut self, parent: Location) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// Walk the chain starting at `self`, then every enclosing location.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: Some(self) }
    }

    /// Number of links in the chain (1 for a root-level location).
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.path, self.offset)
    }
}

/// Iterator returned by [`Location::ancestors`].
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    next: Option<&'a Location>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Location;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent.as_deref();
        Some(current)
    }
}
