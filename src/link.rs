//! Cross-reference links
//!
//! Concepts reach the rest of memory through links: task links point from
//! a concept to a task whose term involves the concept's term, term links
//! point between structurally related concepts. The link type records how
//! the two terms relate, which downstream inference uses to pick
//! applicable rules.

use std::fmt;
use std::num::NonZeroUsize;

use lru::LruCache;

use crate::bag::Item;
use crate::budget::Budget;
use crate::config::TERM_LINK_RECORD_LENGTH;
use crate::task::TaskId;
use crate::term::Term;

/// Structural relation between a link's source and target terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkType {
    /// Source and target are the same term.
    SelfLink,
    /// Target is a component of the source compound.
    Component,
    /// Source relates to a compound target.
    Compound,
    /// One side is a component of a statement.
    ComponentStatement,
    /// Source is a higher-order statement over the target.
    CompoundStatement,
    /// One side sits in the condition position of a higher-order statement.
    ComponentCondition,
    /// Source is a higher-order statement reached from outside.
    CompoundCondition,
    /// The descent path runs through a product or image inside a statement.
    Transform,
}

/// Depth-first search for `source` inside `target`.
///
/// On success returns the chain of enclosing terms (outermost first,
/// `source` last) and the child-index path that reaches it.
fn find_path<'a>(target: &'a Term, source: &Term) -> Option<(Vec<&'a Term>, Vec<usize>)> {
    fn walk<'a>(
        node: &'a Term,
        source: &Term,
        chain: &mut Vec<&'a Term>,
        path: &mut Vec<usize>,
    ) -> bool {
        chain.push(node);
        if node == source {
            return true;
        }
        for (i, child) in node.components().iter().enumerate() {
            path.push(i);
            if walk(child, source, chain, path) {
                return true;
            }
            path.pop();
        }
        chain.pop();
        false
    }
    let mut chain = Vec::new();
    let mut path = Vec::new();
    if walk(target, source, &mut chain, &mut path) {
        Some((chain, path))
    } else {
        None
    }
}

/// Decide the link type between a source and a target term.
///
/// Task links enable transform detection; term links do not. Returns the
/// type together with the index path of the descent, when there is one.
pub fn classify(source: &Term, target: &Term, enable_transform: bool) -> (LinkType, Vec<usize>) {
    if let Some((chain, path)) = find_path(target, source) {
        if source == target {
            return (LinkType::SelfLink, path);
        }
        if let Some(statement) = target.as_statement() {
            let n = chain.len();
            if n >= 3
                && enable_transform
                && chain[n - 3].is_statement()
                && chain[n - 2]
                    .as_compound()
                    .map(|c| c.connector().is_product_or_image())
                    .unwrap_or(false)
            {
                return (LinkType::Transform, path);
            }
            if statement.copula().is_higher_order()
                && (source == statement.subject() || source == statement.predicate())
            {
                return (LinkType::ComponentCondition, path);
            }
            return (LinkType::ComponentStatement, path);
        }
        if target.is_compound() {
            return (LinkType::Compound, path);
        }
        (LinkType::SelfLink, path)
    } else {
        if let Some(statement) = source.as_statement() {
            if statement.copula().is_higher_order() {
                if source == target {
                    return (LinkType::CompoundStatement, Vec::new());
                }
                return (LinkType::CompoundCondition, Vec::new());
            }
            return (LinkType::ComponentStatement, Vec::new());
        }
        if source.is_compound() {
            return (LinkType::Compound, Vec::new());
        }
        (LinkType::Compound, Vec::new())
    }
}

/// A link from a concept to a task it participates in.
///
/// Task links remember which term links they were recently paired with,
/// so the same premise combination is not explored again within the
/// novelty window.
pub struct TaskLink {
    key: String,
    target: TaskId,
    target_term: Term,
    budget: Budget,
    link_type: LinkType,
    indices: Vec<usize>,
    records: LruCache<String, i64>,
}

impl TaskLink {
    /// Link `source` (a concept's term) to the task over `target_term`.
    pub fn new(
        source: &Term,
        target: TaskId,
        target_term: &Term,
        target_key: &str,
        budget: Budget,
    ) -> Self {
        let (link_type, indices) = classify(source, target_term, true);
        let key = format!("{:?}{:?} {}", link_type, indices, target_key);
        TaskLink {
            key,
            target,
            target_term: target_term.clone(),
            budget,
            link_type,
            indices,
            records: LruCache::new(
                NonZeroUsize::new(TERM_LINK_RECORD_LENGTH).expect("nonzero record length"),
            ),
        }
    }

    pub fn target(&self) -> TaskId {
        self.target
    }

    pub fn target_term(&self) -> &Term {
        &self.target_term
    }

    pub fn link_type(&self) -> LinkType {
        self.link_type
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Novelty gate: whether pairing with `term_link` is worth exploring
    /// at time `now`.
    ///
    /// A term link pointing back at this link's own target term is never
    /// novel, and a pairing used within the recency window is not novel
    /// either. A passing pairing is recorded.
    pub fn novel(&mut self, term_link: &TermLink, now: i64) -> bool {
        if term_link.target_name() == self.target_term.name() {
            return false;
        }
        if let Some(&recorded) = self.records.get(term_link.key()) {
            if now < recorded + TERM_LINK_RECORD_LENGTH as i64 {
                return false;
            }
        }
        self.records.put(term_link.key().to_string(), now);
        true
    }
}

impl Item for TaskLink {
    fn key(&self) -> &str {
        &self.key
    }
    fn budget(&self) -> &Budget {
        &self.budget
    }
    fn budget_mut(&mut self) -> &mut Budget {
        &mut self.budget
    }
}

impl fmt::Debug for TaskLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskLink")
            .field("key", &self.key)
            .field("budget", &self.budget)
            .field("link_type", &self.link_type)
            .field("indices", &self.indices)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for TaskLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.budget, self.key)
    }
}

/// A link from one concept to a structurally related concept.
#[derive(Debug, Clone)]
pub struct TermLink {
    key: String,
    target: String,
    budget: Budget,
    link_type: LinkType,
    indices: Vec<usize>,
}

impl TermLink {
    /// Link the concept of `source` to the concept of `target`.
    pub fn new(source: &Term, target: &Term, budget: Budget) -> Self {
        let (link_type, indices) = classify(source, target, false);
        let target_name = target.name();
        let key = format!("{:?}{:?} {}", link_type, indices, target_name);
        TermLink {
            key,
            target: target_name,
            budget,
            link_type,
            indices,
        }
    }

    /// Canonical name of the target concept.
    pub fn target_name(&self) -> &str {
        &self.target
    }

    pub fn link_type(&self) -> LinkType {
        self.link_type
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}

impl Item for TermLink {
    fn key(&self) -> &str {
        &self.key
    }
    fn budget(&self) -> &Budget {
        &self.budget
    }
    fn budget_mut(&mut self) -> &mut Budget {
        &mut self.budget
    }
}

impl fmt::Display for TermLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.budget, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{Connector, Copula};
    use slotmap::SlotMap;

    fn inheritance(s: &str, p: &str) -> Term {
        Term::statement(Copula::Inheritance, Term::atom(s), Term::atom(p))
    }

    fn some_task_id() -> TaskId {
        let mut arena: SlotMap<TaskId, ()> = SlotMap::with_key();
        arena.insert(())
    }

    #[test]
    fn test_classify_self() {
        let t = inheritance("bird", "fly");
        let (kind, path) = classify(&t, &t, true);
        assert_eq!(kind, LinkType::SelfLink);
        assert!(path.is_empty());
    }

    #[test]
    fn test_classify_statement_component() {
        let t = inheritance("bird", "fly");
        let (kind, path) = classify(&Term::atom("bird"), &t, true);
        assert_eq!(kind, LinkType::ComponentStatement);
        assert_eq!(path, vec![0]);
        let (kind, path) = classify(&Term::atom("fly"), &t, true);
        assert_eq!(kind, LinkType::ComponentStatement);
        assert_eq!(path, vec![1]);
    }

    #[test]
    fn test_classify_condition() {
        let implication = Term::statement(
            Copula::Implication,
            inheritance("a", "b"),
            inheritance("c", "d"),
        );
        let (kind, _) = classify(&inheritance("a", "b"), &implication, true);
        assert_eq!(kind, LinkType::ComponentCondition);
        // a deeper component is not in condition position
        let (kind, path) = classify(&Term::atom("a"), &implication, true);
        assert_eq!(kind, LinkType::ComponentStatement);
        assert_eq!(path, vec![0, 0]);
    }

    #[test]
    fn test_classify_transform() {
        // <(*, a, b) --> rel> with source a: statement / product / atom
        let product = Term::compound(Connector::Product, vec![Term::atom("a"), Term::atom("b")]);
        let statement = Term::statement(Copula::Inheritance, product, Term::atom("rel"));
        let (kind, path) = classify(&Term::atom("a"), &statement, true);
        assert_eq!(kind, LinkType::Transform);
        assert_eq!(path, vec![0, 0]);
        // term links never produce transforms
        let (kind, _) = classify(&Term::atom("a"), &statement, false);
        assert_eq!(kind, LinkType::ComponentStatement);
    }

    #[test]
    fn test_classify_compound_membership() {
        let conj = Term::compound(
            Connector::Conjunction,
            vec![Term::atom("a"), Term::atom("b")],
        );
        let (kind, _) = classify(&Term::atom("a"), &conj, true);
        assert_eq!(kind, LinkType::Compound);
    }

    #[test]
    fn test_classify_outside_statement() {
        let implication = Term::statement(
            Copula::Implication,
            inheritance("a", "b"),
            inheritance("c", "d"),
        );
        // higher-order statement reaching out to a term it does not contain
        let (kind, _) = classify(&implication, &Term::atom("x"), false);
        assert_eq!(kind, LinkType::CompoundCondition);
        // first-order statement reaching out
        let (kind, _) = classify(&inheritance("a", "b"), &Term::atom("a"), false);
        assert_eq!(kind, LinkType::ComponentStatement);
    }

    #[test]
    fn test_novelty_gate_window() {
        let task_term = inheritance("bird", "fly");
        let mut link = TaskLink::new(
            &Term::atom("bird"),
            some_task_id(),
            &task_term,
            "<bird --> fly>.",
            Budget::new(0.5, 0.5, 0.5),
        );
        let term_link = TermLink::new(
            &Term::atom("bird"),
            &Term::atom("animal"),
            Budget::new(0.5, 0.5, 0.5),
        );
        assert!(link.novel(&term_link, 100));
        // immediately again: inside the window
        assert!(!link.novel(&term_link, 101));
        // after the window has passed it is novel again
        assert!(link.novel(&term_link, 100 + TERM_LINK_RECORD_LENGTH as i64));
    }

    #[test]
    fn test_novelty_gate_rejects_own_target() {
        let task_term = inheritance("bird", "fly");
        let mut link = TaskLink::new(
            &Term::atom("bird"),
            some_task_id(),
            &task_term,
            "<bird --> fly>.",
            Budget::new(0.5, 0.5, 0.5),
        );
        let to_same = TermLink::new(&Term::atom("bird"), &task_term, Budget::new(0.5, 0.5, 0.5));
        assert!(!link.novel(&to_same, 0));
    }
}
