//! Single-shot derivation
//!
//! The rule engine keeps a string-keyed set of facts (canonical term
//! forms) and derives conclusions by matching loaded rules against a
//! snapshot of that set. Conclusions feed back only on the next call, so
//! one call is one inference step over the current state.

use indexmap::IndexMap;

use hashbrown::HashSet;

use super::rule::{Rule, RuleError, RuleTable};
use super::unify::{instantiate, unify, Subst};
use crate::term::{Copula, Term};

/// Why a fired rule produced this conclusion.
#[derive(Debug, Clone)]
pub struct Derivation {
    /// The derived term, already added to the fact set.
    pub conclusion: Term,

    /// Rule label; inverse variants carry a trailing `'`.
    pub rule: String,

    /// Canonical forms of the premises that matched.
    pub premises: Vec<String>,

    /// The substitution used, as (variable, term) pairs.
    pub bindings: Vec<(String, String)>,
}

/// A fact set plus the rules that run over it.
#[derive(Debug, Default)]
pub struct RuleEngine {
    rules: Vec<Rule>,
    facts: IndexMap<String, Term>,
}

impl RuleEngine {
    pub fn new() -> Self {
        RuleEngine::default()
    }

    /// Load one block of a rule table. Returns how many rules were added.
    pub fn load(&mut self, table: &RuleTable, key: &str) -> Result<usize, RuleError> {
        let block = table
            .block(key)
            .ok_or_else(|| RuleError::UnknownBlock(key.to_string()))?;
        self.rules.extend(block.iter().cloned());
        Ok(block.len())
    }

    /// Number of loaded rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Assert a term as a fact; returns whether it was new.
    pub fn assert_fact(&mut self, term: &Term) -> bool {
        let name = term.name();
        if self.facts.contains_key(&name) {
            return false;
        }
        self.facts.insert(name, term.clone());
        true
    }

    /// Whether the fact set holds this canonical form.
    pub fn contains(&self, name: &str) -> bool {
        self.facts.contains_key(name)
    }

    /// The facts, in assertion order.
    pub fn facts(&self) -> impl Iterator<Item = &Term> {
        self.facts.values()
    }

    /// Number of facts held.
    pub fn fact_count(&self) -> usize {
        self.facts.len()
    }

    /// Drop all facts, keeping the loaded rules.
    pub fn clear_facts(&mut self) {
        self.facts.clear();
    }

    /// Run every rule once over a snapshot of the fact set.
    ///
    /// Each (rule, premises) pair fires at most once per call, guarded
    /// conclusions are dropped, and surviving conclusions enter the fact
    /// set and are reported with their explanation.
    pub fn derive(&mut self) -> Vec<Derivation> {
        let snapshot: Vec<Term> = self.facts.values().cloned().collect();
        let mut fired: HashSet<String> = HashSet::new();
        let mut out = Vec::new();

        for rule in &self.rules {
            match rule.premises.len() {
                1 => {
                    for fact in &snapshot {
                        Self::try_fire(rule, &[fact], &mut fired, &mut self.facts, &mut out);
                    }
                }
                2 => {
                    for (i, first) in snapshot.iter().enumerate() {
                        for (j, second) in snapshot.iter().enumerate() {
                            if i == j {
                                continue;
                            }
                            Self::try_fire(
                                rule,
                                &[first, second],
                                &mut fired,
                                &mut self.facts,
                                &mut out,
                            );
                        }
                    }
                }
                _ => {}
            }
        }
        out
    }

    fn try_fire(
        rule: &Rule,
        premises: &[&Term],
        fired: &mut HashSet<String>,
        facts: &mut IndexMap<String, Term>,
        out: &mut Vec<Derivation>,
    ) {
        // no double negation introduction
        if rule.name == "negative" && premises.iter().any(|p| p.is_negation()) {
            return;
        }

        let mut subst = Subst::new();
        for (pattern, fact) in rule.premises.iter().zip(premises) {
            if !unify(pattern, fact, &mut subst) {
                return;
            }
        }
        let Some(conclusion) = instantiate(&rule.conclusion, &subst) else {
            return;
        };

        if is_reflexive_inheritance(&conclusion) {
            return;
        }
        if conclusion.negation_depth() > 1 {
            return;
        }

        let premise_names: Vec<String> = premises.iter().map(|p| p.name()).collect();
        let signature = format!("{}|{}", rule.label(), premise_names.join("|"));
        if !fired.insert(signature) {
            return;
        }

        let name = conclusion.name();
        if facts.contains_key(&name) {
            return;
        }
        log::trace!("derived {} by {}", name, rule.label());
        facts.insert(name, conclusion.clone());
        let mut bindings: Vec<(String, String)> = subst
            .iter()
            .map(|(k, v)| (k.to_string(), v.name()))
            .collect();
        bindings.sort();
        out.push(Derivation {
            conclusion,
            rule: rule.label(),
            premises: premise_names,
            bindings,
        });
    }
}

/// The reflexive-inheritance guard: `<X --> X>` says nothing.
fn is_reflexive_inheritance(term: &Term) -> bool {
    term.as_statement()
        .map(|s| s.copula() == Copula::Inheritance && s.is_reflexive())
        .unwrap_or(false)
}
