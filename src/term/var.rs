//! Variable terms
//!
//! NARS distinguishes three kinds of variables by their prefix:
//! - Independent variables (`$x`)
//! - Dependent variables (`#x`)
//! - Query variables (`?x`)

use std::fmt;
use smartstring::{LazyCompact, SmartString};

use super::VarFlags;

/// The kind of a variable, determined by its prefix character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    Independent,
    Dependent,
    Query,
}

impl VarKind {
    /// The prefix character that introduces this kind in Narsese.
    pub fn prefix(&self) -> char {
        match self {
            VarKind::Independent => '$',
            VarKind::Dependent => '#',
            VarKind::Query => '?',
        }
    }

    /// The flag bit corresponding to this kind.
    pub fn flag(&self) -> VarFlags {
        match self {
            VarKind::Independent => VarFlags::INDEP,
            VarKind::Dependent => VarFlags::DEP,
            VarKind::Query => VarFlags::QUERY,
        }
    }

    /// Map a prefix character back to a kind.
    pub fn from_prefix(c: char) -> Option<VarKind> {
        match c {
            '$' => Some(VarKind::Independent),
            '#' => Some(VarKind::Dependent),
            '?' => Some(VarKind::Query),
            _ => None,
        }
    }
}

/// A variable term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    kind: VarKind,
    name: SmartString<LazyCompact>,
}

impl Variable {
    /// Create a variable of the given kind; `name` excludes the prefix.
    pub fn new(kind: VarKind, name: &str) -> Self {
        Variable {
            kind,
            name: SmartString::from(name),
        }
    }

    /// The kind of this variable.
    pub fn kind(&self) -> VarKind {
        self.kind
    }

    /// The identifier without its prefix.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_display() {
        assert_eq!(format!("{}", Variable::new(VarKind::Independent, "x")), "$x");
        assert_eq!(format!("{}", Variable::new(VarKind::Dependent, "x")), "#x");
        assert_eq!(format!("{}", Variable::new(VarKind::Query, "who")), "?who");
    }

    #[test]
    fn test_prefix_round_trip() {
        for kind in [VarKind::Independent, VarKind::Dependent, VarKind::Query] {
            assert_eq!(VarKind::from_prefix(kind.prefix()), Some(kind));
        }
        assert_eq!(VarKind::from_prefix('x'), None);
    }
}
