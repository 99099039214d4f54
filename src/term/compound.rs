//! Compound terms
//!
//! A compound combines an ordered sequence of components under a
//! connector. The connector decides arity, commutativity, and whether the
//! compound has a temporal reading.

use std::fmt;
use std::sync::Arc;

use super::Term;

/// Arity class of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly one component (negation).
    Single,
    /// Exactly two components (differences, images).
    Double,
    /// Two or more components.
    Multiple,
}

/// Connectors of compound terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connector {
    Conjunction,
    Disjunction,
    Product,
    SequentialEvents,
    ParallelEvents,
    IntersectionExt,
    IntersectionInt,
    DifferenceExt,
    DifferenceInt,
    ImageExt,
    ImageInt,
    SetExt,
    SetInt,
    Negation,
}

impl Connector {
    /// The Narsese symbol of this connector.
    pub fn symbol(&self) -> &'static str {
        match self {
            Connector::Conjunction => "&&",
            Connector::Disjunction => "||",
            Connector::Product => "*",
            Connector::SequentialEvents => "&/",
            Connector::ParallelEvents => "&|",
            Connector::IntersectionExt => "&",
            Connector::IntersectionInt => "|",
            Connector::DifferenceExt => "-",
            Connector::DifferenceInt => "~",
            Connector::ImageExt => "/",
            Connector::ImageInt => "\\",
            Connector::SetExt => "{}",
            Connector::SetInt => "[]",
            Connector::Negation => "--",
        }
    }

    /// Map a Narsese symbol back to a connector.
    pub fn from_symbol(s: &str) -> Option<Connector> {
        Some(match s {
            "&&" => Connector::Conjunction,
            "||" => Connector::Disjunction,
            "*" => Connector::Product,
            "&/" => Connector::SequentialEvents,
            "&|" => Connector::ParallelEvents,
            "&" => Connector::IntersectionExt,
            "|" => Connector::IntersectionInt,
            "-" => Connector::DifferenceExt,
            "~" => Connector::DifferenceInt,
            "/" => Connector::ImageExt,
            "\\" => Connector::ImageInt,
            "--" => Connector::Negation,
            _ => return None,
        })
    }

    /// Arity class of this connector.
    pub fn arity(&self) -> Arity {
        match self {
            Connector::Negation => Arity::Single,
            Connector::DifferenceExt | Connector::DifferenceInt => Arity::Double,
            _ => Arity::Multiple,
        }
    }

    /// Whether the given component count is valid for this connector.
    pub fn arity_ok(&self, n: usize) -> bool {
        match self.arity() {
            Arity::Single => n == 1,
            Arity::Double => n == 2,
            Arity::Multiple => n >= 1,
        }
    }

    /// Whether component order is irrelevant.
    pub fn is_commutative(&self) -> bool {
        matches!(
            self,
            Connector::Conjunction
                | Connector::Disjunction
                | Connector::ParallelEvents
                | Connector::IntersectionExt
                | Connector::IntersectionInt
                | Connector::SetExt
                | Connector::SetInt
        )
    }

    /// Whether this connector carries a temporal reading.
    pub fn is_temporal(&self) -> bool {
        matches!(self, Connector::SequentialEvents | Connector::ParallelEvents)
    }

    /// Product and image connectors participate in transform links.
    pub fn is_product_or_image(&self) -> bool {
        matches!(
            self,
            Connector::Product | Connector::ImageExt | Connector::ImageInt
        )
    }
}

/// A compound term: a connector over an ordered component sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Compound {
    connector: Connector,
    components: Arc<[Term]>,
}

impl Compound {
    /// Create a new compound term.
    pub fn new(connector: Connector, components: Vec<Term>) -> Self {
        Compound {
            connector,
            components: components.into(),
        }
    }

    /// Negation of a single term.
    pub fn negation(term: Term) -> Self {
        Compound::new(Connector::Negation, vec![term])
    }

    /// The connector of this compound.
    pub fn connector(&self) -> Connector {
        self.connector
    }

    /// The ordered components.
    pub fn components(&self) -> &[Term] {
        &self.components
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether there are no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Whether this compound is a negation.
    pub fn is_negation(&self) -> bool {
        self.connector == Connector::Negation
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.connector {
            Connector::SetExt | Connector::SetInt => {
                let (open, close) = if self.connector == Connector::SetExt {
                    ('{', '}')
                } else {
                    ('[', ']')
                };
                write!(f, "{}", open)?;
                for (i, t) in self.components.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", t)?;
                }
                write!(f, "{}", close)
            }
            _ => {
                write!(f, "({}", self.connector.symbol())?;
                for t in self.components.iter() {
                    write!(f, ", {}", t)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Term;

    #[test]
    fn test_compound_display() {
        let conj = Compound::new(
            Connector::Conjunction,
            vec![Term::atom("walk"), Term::atom("run")],
        );
        assert_eq!(format!("{}", conj), "(&&, walk, run)");

        let neg = Compound::negation(Term::atom("fly"));
        assert_eq!(format!("{}", neg), "(--, fly)");

        let set = Compound::new(
            Connector::SetExt,
            vec![Term::atom("a"), Term::atom("b")],
        );
        assert_eq!(format!("{}", set), "{a, b}");
    }

    #[test]
    fn test_connector_metadata() {
        assert!(Connector::Conjunction.is_commutative());
        assert!(!Connector::Product.is_commutative());
        assert!(Connector::SequentialEvents.is_temporal());
        assert!(Connector::Product.is_product_or_image());
        assert!(Connector::Negation.arity_ok(1));
        assert!(!Connector::Negation.arity_ok(2));
        assert!(Connector::DifferenceExt.arity_ok(2));
        assert!(!Connector::DifferenceExt.arity_ok(3));
    }

    #[test]
    fn test_symbol_round_trip() {
        for c in [
            Connector::Conjunction,
            Connector::Disjunction,
            Connector::Product,
            Connector::SequentialEvents,
            Connector::ParallelEvents,
            Connector::IntersectionExt,
            Connector::IntersectionInt,
            Connector::DifferenceExt,
            Connector::DifferenceInt,
            Connector::ImageExt,
            Connector::ImageInt,
            Connector::Negation,
        ] {
            assert_eq!(Connector::from_symbol(c.symbol()), Some(c));
        }
    }
}
