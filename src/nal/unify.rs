//! Rule-pattern unification
//!
//! A first-order syntactic unifier matching rule patterns against fact
//! terms. Bindings map variable tokens to terms; lookups chase chains of
//! bindings, and the occurs check refuses to bind a variable to a term
//! that mentions its own token.

use hashbrown::HashMap;
use smartstring::{LazyCompact, SmartString};

use super::rule::Pattern;
use crate::term::Term;

/// A substitution from rule-variable tokens to terms.
pub type Subst = HashMap<SmartString<LazyCompact>, Term>;

/// Whether `token` occurs as a leaf name anywhere in `term`.
fn occurs(token: &str, term: &Term) -> bool {
    match term {
        Term::Atom(a) => a.name() == token,
        Term::Variable(v) => v.to_string() == token,
        _ => term.components().iter().any(|c| occurs(token, c)),
    }
}

/// Chase a bound term through further bindings.
fn resolve<'a>(term: &'a Term, subst: &'a Subst) -> &'a Term {
    let mut current = term;
    loop {
        let name = match current {
            Term::Atom(a) => a.name(),
            _ => return current,
        };
        match subst.get(name) {
            Some(next) if next != current => current = next,
            _ => return current,
        }
    }
}

/// Unify `pattern` against `term`, extending `subst`.
///
/// Fails without touching the outcome when the structures differ, when a
/// variable is already bound to something else, or when the occurs check
/// trips.
pub fn unify(pattern: &Pattern, term: &Term, subst: &mut Subst) -> bool {
    match pattern {
        Pattern::Var(name) => {
            if let Some(bound) = subst.get(name.as_str()) {
                return resolve(bound, subst) == term;
            }
            if occurs(name, term) {
                return false;
            }
            subst.insert(name.clone(), term.clone());
            true
        }
        Pattern::Atom(name) => {
            matches!(term, Term::Atom(a) if a.name() == name.as_str())
        }
        Pattern::Negation(inner) => match term.as_compound() {
            Some(c) if c.is_negation() => unify(inner, &c.components()[0], subst),
            _ => false,
        },
        Pattern::Statement {
            copula,
            subject,
            predicate,
        } => match term.as_statement() {
            Some(s) if s.copula() == *copula => {
                unify(subject, s.subject(), subst) && unify(predicate, s.predicate(), subst)
            }
            _ => false,
        },
    }
}

/// Build the term a conclusion template stands for under a substitution.
///
/// Returns `None` when the template mentions an unbound variable.
pub fn instantiate(pattern: &Pattern, subst: &Subst) -> Option<Term> {
    match pattern {
        Pattern::Var(name) => subst
            .get(name.as_str())
            .map(|t| resolve(t, subst).clone()),
        Pattern::Atom(name) => Some(Term::atom(name)),
        Pattern::Negation(inner) => Some(Term::negation(instantiate(inner, subst)?)),
        Pattern::Statement {
            copula,
            subject,
            predicate,
        } => Some(Term::statement(
            *copula,
            instantiate(subject, subst)?,
            instantiate(predicate, subst)?,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Copula;

    fn inheritance(s: &str, p: &str) -> Term {
        Term::statement(Copula::Inheritance, Term::atom(s), Term::atom(p))
    }

    #[test]
    fn test_unify_statement_pattern() {
        let pattern = Pattern::parse("<S --> M>").unwrap();
        let mut subst = Subst::new();
        assert!(unify(&pattern, &inheritance("bird", "fly"), &mut subst));
        assert_eq!(subst.get("S"), Some(&Term::atom("bird")));
        assert_eq!(subst.get("M"), Some(&Term::atom("fly")));
    }

    #[test]
    fn test_extending_substitution_constrains() {
        let first = Pattern::parse("<M --> P>").unwrap();
        let second = Pattern::parse("<S --> M>").unwrap();
        let mut subst = Subst::new();
        assert!(unify(&first, &inheritance("fly", "animal"), &mut subst));
        // S --> M requires the predicate to be the bound M = fly
        assert!(unify(&second, &inheritance("bird", "fly"), &mut subst));
        assert!(!unify(
            &Pattern::parse("<S --> M>").unwrap(),
            &inheritance("bird", "animal"),
            &mut Subst::from_iter([("M".into(), Term::atom("fly"))])
        ));
        assert_eq!(subst.get("S"), Some(&Term::atom("bird")));
    }

    #[test]
    fn test_literal_atom_must_match() {
        let pattern = Pattern::parse("<bird --> P>").unwrap();
        assert!(unify(
            &pattern,
            &inheritance("bird", "fly"),
            &mut Subst::new()
        ));
        assert!(!unify(
            &pattern,
            &inheritance("cat", "fly"),
            &mut Subst::new()
        ));
    }

    #[test]
    fn test_negation_pattern() {
        let pattern = Pattern::parse("(--, A)").unwrap();
        let fact = Term::negation(inheritance("bird", "fly"));
        let mut subst = Subst::new();
        assert!(unify(&pattern, &fact, &mut subst));
        assert_eq!(subst.get("A"), Some(&inheritance("bird", "fly")));
        assert!(!unify(&pattern, &Term::atom("bird"), &mut Subst::new()));
    }

    #[test]
    fn test_occurs_check() {
        let pattern = Pattern::parse("X").unwrap();
        // a term that mentions the token X cannot bind X
        let cyclic = inheritance("X", "fly");
        assert!(!unify(&pattern, &cyclic, &mut Subst::new()));
        assert!(unify(&pattern, &inheritance("bird", "fly"), &mut Subst::new()));
    }

    #[test]
    fn test_instantiate() {
        let conclusion = Pattern::parse("<S --> P>").unwrap();
        let mut subst = Subst::new();
        subst.insert("S".into(), Term::atom("bird"));
        subst.insert("P".into(), Term::atom("animal"));
        assert_eq!(
            instantiate(&conclusion, &subst),
            Some(inheritance("bird", "animal"))
        );
        // an unbound variable leaves the template uninstantiable
        subst.remove("P");
        assert_eq!(instantiate(&conclusion, &subst), None);
    }

    #[test]
    fn test_resolve_chases_bindings() {
        let mut subst = Subst::new();
        subst.insert("A".into(), Term::atom("B"));
        subst.insert("B".into(), Term::atom("bird"));
        let pattern = Pattern::parse("A").unwrap();
        assert_eq!(instantiate(&pattern, &subst), Some(Term::atom("bird")));
    }
}
