//! Statements
//!
//! A statement relates a subject and a predicate through a copula. The
//! inheritance/similarity family is first-order; the implication and
//! equivalence families (including their temporal variants) are
//! higher-order.

use std::fmt;
use std::sync::Arc;

use super::Term;

/// Copulas of statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Copula {
    Inheritance,
    Similarity,
    Instance,
    Property,
    InstanceProperty,
    Implication,
    Equivalence,
    PredictiveImplication,
    ConcurrentImplication,
    RetrospectiveImplication,
    PredictiveEquivalence,
    ConcurrentEquivalence,
}

impl Copula {
    /// The Narsese symbol of this copula.
    pub fn symbol(&self) -> &'static str {
        match self {
            Copula::Inheritance => "-->",
            Copula::Similarity => "<->",
            Copula::Instance => "{--",
            Copula::Property => "--]",
            Copula::InstanceProperty => "{-]",
            Copula::Implication => "==>",
            Copula::Equivalence => "<=>",
            Copula::PredictiveImplication => "=/>",
            Copula::ConcurrentImplication => "=|>",
            Copula::RetrospectiveImplication => "=\\>",
            Copula::PredictiveEquivalence => "</>",
            Copula::ConcurrentEquivalence => "<|>",
        }
    }

    /// Map a Narsese symbol back to a copula.
    pub fn from_symbol(s: &str) -> Option<Copula> {
        Some(match s {
            "-->" => Copula::Inheritance,
            "<->" => Copula::Similarity,
            "{--" => Copula::Instance,
            "--]" => Copula::Property,
            "{-]" => Copula::InstanceProperty,
            "==>" => Copula::Implication,
            "<=>" => Copula::Equivalence,
            "=/>" => Copula::PredictiveImplication,
            "=|>" => Copula::ConcurrentImplication,
            "=\\>" => Copula::RetrospectiveImplication,
            "</>" => Copula::PredictiveEquivalence,
            "<|>" => Copula::ConcurrentEquivalence,
            _ => return None,
        })
    }

    /// Higher-order copulas: the implication/equivalence family.
    pub fn is_higher_order(&self) -> bool {
        matches!(
            self,
            Copula::Implication
                | Copula::Equivalence
                | Copula::PredictiveImplication
                | Copula::ConcurrentImplication
                | Copula::RetrospectiveImplication
                | Copula::PredictiveEquivalence
                | Copula::ConcurrentEquivalence
        )
    }

    /// Symmetric copulas relate both directions equally.
    pub fn is_symmetric(&self) -> bool {
        matches!(
            self,
            Copula::Similarity
                | Copula::Equivalence
                | Copula::PredictiveEquivalence
                | Copula::ConcurrentEquivalence
        )
    }

    /// Whether this copula carries a temporal reading.
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            Copula::PredictiveImplication
                | Copula::ConcurrentImplication
                | Copula::RetrospectiveImplication
                | Copula::PredictiveEquivalence
                | Copula::ConcurrentEquivalence
        )
    }
}

/// A statement term: subject, copula, predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Statement {
    copula: Copula,
    // Subject at 0, predicate at 1; shared storage keeps clones cheap.
    terms: Arc<[Term]>,
}

impl Statement {
    /// Create a new statement.
    pub fn new(copula: Copula, subject: Term, predicate: Term) -> Self {
        Statement {
            copula,
            terms: vec![subject, predicate].into(),
        }
    }

    /// The copula of this statement.
    pub fn copula(&self) -> Copula {
        self.copula
    }

    /// The subject term.
    pub fn subject(&self) -> &Term {
        &self.terms[0]
    }

    /// The predicate term.
    pub fn predicate(&self) -> &Term {
        &self.terms[1]
    }

    /// Subject and predicate as a slice.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Whether subject and predicate are the same term.
    pub fn is_reflexive(&self) -> bool {
        self.subject() == self.predicate()
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{} {} {}>",
            self.subject(),
            self.copula.symbol(),
            self.predicate()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_display() {
        let s = Statement::new(Copula::Inheritance, Term::atom("bird"), Term::atom("fly"));
        assert_eq!(format!("{}", s), "<bird --> fly>");
    }

    #[test]
    fn test_copula_orders() {
        assert!(!Copula::Inheritance.is_higher_order());
        assert!(!Copula::Similarity.is_higher_order());
        assert!(Copula::Implication.is_higher_order());
        assert!(Copula::PredictiveEquivalence.is_higher_order());
        assert!(Copula::Similarity.is_symmetric());
        assert!(!Copula::Inheritance.is_symmetric());
        assert!(Copula::RetrospectiveImplication.is_temporal());
        assert!(!Copula::Equivalence.is_temporal());
    }

    #[test]
    fn test_symbol_round_trip() {
        for c in [
            Copula::Inheritance,
            Copula::Similarity,
            Copula::Instance,
            Copula::Property,
            Copula::InstanceProperty,
            Copula::Implication,
            Copula::Equivalence,
            Copula::PredictiveImplication,
            Copula::ConcurrentImplication,
            Copula::RetrospectiveImplication,
            Copula::PredictiveEquivalence,
            Copula::ConcurrentEquivalence,
        ] {
            assert_eq!(Copula::from_symbol(c.symbol()), Some(c));
        }
    }

    #[test]
    fn test_reflexive() {
        let r = Statement::new(Copula::Inheritance, Term::atom("x"), Term::atom("x"));
        assert!(r.is_reflexive());
        let s = Statement::new(Copula::Inheritance, Term::atom("x"), Term::atom("y"));
        assert!(!s.is_reflexive());
    }
}
