//! Atomic terms
//!
//! An atom is a bare identifier such as `bird` or `fly`. Atoms carry no
//! structure; their printable name is their whole identity.

use std::fmt;
use smartstring::{LazyCompact, SmartString};

/// An atomic term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Atom {
    name: SmartString<LazyCompact>,
}

impl Atom {
    /// Create an atom from its identifier.
    pub fn new(name: &str) -> Self {
        Atom {
            name: SmartString::from(name),
        }
    }

    /// The identifier of this atom.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
