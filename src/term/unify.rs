//! Unification over NARS variables
//!
//! Matches a term carrying variables against a concrete term, binding
//! variables to the subterms they align with. Used by Wh-question
//! answering, where the query variables of the question bind against a
//! remembered belief's term.

use hashbrown::HashMap;
use smartstring::{LazyCompact, SmartString};

use super::Term;

/// Variable bindings, keyed by the variable's printable form (`?x`).
pub type Bindings = HashMap<SmartString<LazyCompact>, Term>;

/// Unify `pattern` (which may contain variables) against `term`.
///
/// On success the bindings map holds a substitution under which the two
/// terms are equal. Existing bindings are respected, so a variable that
/// occurs twice must align with the same subterm both times.
pub fn unify(pattern: &Term, term: &Term, bindings: &mut Bindings) -> bool {
    match pattern {
        Term::Variable(v) => {
            let key = SmartString::from(v.to_string());
            if let Some(bound) = bindings.get(&key) {
                return bound == term;
            }
            bindings.insert(key, term.clone());
            true
        }
        Term::Atom(_) => pattern == term,
        Term::Compound(pc) => match term {
            Term::Compound(tc) => {
                pc.connector() == tc.connector()
                    && pc.len() == tc.len()
                    && pc
                        .components()
                        .iter()
                        .zip(tc.components())
                        .all(|(p, t)| unify(p, t, bindings))
            }
            _ => false,
        },
        Term::Statement(ps) => match term {
            Term::Statement(ts) => {
                ps.copula() == ts.copula()
                    && unify(ps.subject(), ts.subject(), bindings)
                    && unify(ps.predicate(), ts.predicate(), bindings)
            }
            _ => false,
        },
    }
}

/// Apply a substitution, replacing bound variables by their terms.
pub fn apply(term: &Term, bindings: &Bindings) -> Term {
    match term {
        Term::Variable(v) => bindings
            .get(v.to_string().as_str())
            .cloned()
            .unwrap_or_else(|| term.clone()),
        Term::Atom(_) => term.clone(),
        Term::Compound(c) => Term::compound(
            c.connector(),
            c.components().iter().map(|t| apply(t, bindings)).collect(),
        ),
        Term::Statement(s) => Term::statement(
            s.copula(),
            apply(s.subject(), bindings),
            apply(s.predicate(), bindings),
        ),
    }
}
