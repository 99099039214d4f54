//! Term representation
//!
//! A term is the unit of meaning the reasoner operates on. Terms are
//! atomic (identifiers, variables) or structured (compounds under a
//! connector, statements under a copula). Terms are value types: two terms
//! are the same term exactly when their canonical printable forms match.

pub mod atom;
pub mod compound;
pub mod statement;
pub mod unify;
pub mod var;

use std::fmt;

use bitflags::bitflags;

pub use atom::Atom;
pub use compound::{Arity, Compound, Connector};
pub use statement::{Copula, Statement};
pub use var::{VarKind, Variable};

bitflags! {
    /// Which variable kinds occur in a term or any of its descendants.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct VarFlags: u8 {
        const INDEP = 1 << 0;
        const DEP = 1 << 1;
        const QUERY = 1 << 2;
    }
}

/// A term: atom, variable, compound, or statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Atom(Atom),
    Variable(Variable),
    Compound(Compound),
    Statement(Statement),
}

impl Term {
    /// Convenience constructor for an atomic term.
    pub fn atom(name: &str) -> Term {
        Term::Atom(Atom::new(name))
    }

    /// Convenience constructor for a variable term.
    pub fn var(kind: VarKind, name: &str) -> Term {
        Term::Variable(Variable::new(kind, name))
    }

    /// Convenience constructor for a statement term.
    pub fn statement(copula: Copula, subject: Term, predicate: Term) -> Term {
        Term::Statement(Statement::new(copula, subject, predicate))
    }

    /// Convenience constructor for a compound term.
    pub fn compound(connector: Connector, components: Vec<Term>) -> Term {
        Term::Compound(Compound::new(connector, components))
    }

    /// Negation of a term.
    pub fn negation(term: Term) -> Term {
        Term::Compound(Compound::negation(term))
    }

    /// The canonical printable form; the sole identity for equality.
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// Syntactic complexity: 1 for leaves, 1 plus the component sum
    /// otherwise.
    pub fn complexity(&self) -> usize {
        match self {
            Term::Atom(_) | Term::Variable(_) => 1,
            Term::Compound(c) => 1 + c.components().iter().map(Term::complexity).sum::<usize>(),
            Term::Statement(s) => 1 + s.terms().iter().map(Term::complexity).sum::<usize>(),
        }
    }

    /// Syntactic simplicity, the reciprocal of complexity.
    pub fn simplicity(&self) -> f32 {
        1.0 / self.complexity() as f32
    }

    /// Variable kinds occurring anywhere in this term.
    pub fn var_flags(&self) -> VarFlags {
        match self {
            Term::Atom(_) => VarFlags::empty(),
            Term::Variable(v) => v.kind().flag(),
            Term::Compound(c) => c
                .components()
                .iter()
                .fold(VarFlags::empty(), |acc, t| acc | t.var_flags()),
            Term::Statement(s) => s
                .terms()
                .iter()
                .fold(VarFlags::empty(), |acc, t| acc | t.var_flags()),
        }
    }

    /// Whether any variable occurs in this term.
    pub fn has_var(&self) -> bool {
        !self.var_flags().is_empty()
    }

    /// Whether a query variable occurs in this term.
    pub fn has_query_var(&self) -> bool {
        self.var_flags().contains(VarFlags::QUERY)
    }

    /// Whether a dependent variable occurs in this term.
    pub fn has_dep_var(&self) -> bool {
        self.var_flags().contains(VarFlags::DEP)
    }

    pub fn is_atom(&self) -> bool {
        matches!(self, Term::Atom(_))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    pub fn is_compound(&self) -> bool {
        matches!(self, Term::Compound(_))
    }

    pub fn is_statement(&self) -> bool {
        matches!(self, Term::Statement(_))
    }

    /// Whether this term is a negation compound.
    pub fn is_negation(&self) -> bool {
        matches!(self, Term::Compound(c) if c.is_negation())
    }

    /// The statement inside, if any.
    pub fn as_statement(&self) -> Option<&Statement> {
        match self {
            Term::Statement(s) => Some(s),
            _ => None,
        }
    }

    /// The compound inside, if any.
    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Term::Compound(c) => Some(c),
            _ => None,
        }
    }

    /// Direct children of this term; empty for leaves.
    pub fn components(&self) -> &[Term] {
        match self {
            Term::Atom(_) | Term::Variable(_) => &[],
            Term::Compound(c) => c.components(),
            Term::Statement(s) => s.terms(),
        }
    }

    /// All distinct proper descendants, outermost first.
    pub fn subterms(&self) -> Vec<Term> {
        let mut out: Vec<Term> = Vec::new();
        fn walk(t: &Term, out: &mut Vec<Term>) {
            for child in t.components() {
                if !out.contains(child) {
                    out.push(child.clone());
                }
                walk(child, out);
            }
        }
        walk(self, &mut out);
        out
    }

    /// Whether `other` occurs in this term (properly or as the whole).
    pub fn contains(&self, other: &Term) -> bool {
        if self == other {
            return true;
        }
        self.components().iter().any(|c| c.contains(other))
    }

    /// Depth of nested negations starting at this term.
    pub fn negation_depth(&self) -> usize {
        match self {
            Term::Compound(c) if c.is_negation() => 1 + c.components()[0].negation_depth(),
            _ => 0,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(a) => write!(f, "{}", a),
            Term::Variable(v) => write!(f, "{}", v),
            Term::Compound(c) => write!(f, "{}", c),
            Term::Statement(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inheritance(s: &str, p: &str) -> Term {
        Term::statement(Copula::Inheritance, Term::atom(s), Term::atom(p))
    }

    #[test]
    fn test_canonical_names() {
        assert_eq!(inheritance("bird", "fly").name(), "<bird --> fly>");
        let conj = Term::compound(
            Connector::Conjunction,
            vec![Term::atom("a"), Term::atom("b")],
        );
        assert_eq!(conj.name(), "(&&, a, b)");
        assert_eq!(Term::negation(Term::atom("a")).name(), "(--, a)");
    }

    #[test]
    fn test_complexity() {
        assert_eq!(Term::atom("bird").complexity(), 1);
        assert_eq!(inheritance("bird", "fly").complexity(), 3);
        let nested = Term::statement(
            Copula::Implication,
            inheritance("a", "b"),
            inheritance("b", "c"),
        );
        assert_eq!(nested.complexity(), 7);
        assert!((Term::atom("x").simplicity() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_var_flags() {
        let t = Term::statement(
            Copula::Inheritance,
            Term::atom("bird"),
            Term::var(VarKind::Query, "x"),
        );
        assert!(t.has_query_var());
        assert!(!t.has_dep_var());
        assert!(t.has_var());
        assert!(!inheritance("bird", "fly").has_var());
    }

    #[test]
    fn test_subterms_distinct() {
        let t = Term::statement(
            Copula::Implication,
            inheritance("a", "b"),
            inheritance("a", "c"),
        );
        let subs = t.subterms();
        // a appears twice in the tree but once in the enumeration
        assert_eq!(
            subs.iter().filter(|s| s.name() == "a").count(),
            1,
        );
        assert!(subs.contains(&inheritance("a", "b")));
        assert!(subs.contains(&Term::atom("c")));
    }

    #[test]
    fn test_contains() {
        let t = inheritance("bird", "fly");
        assert!(t.contains(&Term::atom("bird")));
        assert!(t.contains(&t.clone()));
        assert!(!t.contains(&Term::atom("animal")));
    }

    #[test]
    fn test_negation_depth() {
        let once = Term::negation(Term::atom("a"));
        let twice = Term::negation(once.clone());
        assert_eq!(Term::atom("a").negation_depth(), 0);
        assert_eq!(once.negation_depth(), 1);
        assert_eq!(twice.negation_depth(), 2);
    }

    #[test]
    fn test_equality_by_name() {
        let a = inheritance("bird", "fly");
        let b = inheritance("bird", "fly");
        assert_eq!(a, b);
        assert_eq!(a.name(), b.name());
    }
}
