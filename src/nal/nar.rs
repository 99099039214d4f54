//! The reasoner
//!
//! `NAR` wires the memory façade, the rule engine, and the logical clock
//! into the working cycle: take a concept out of the attention bag, take
//! one of its task links, assert the linked task's term as a fact, run a
//! derivation pass, and route every conclusion back through memory as a
//! fresh task.

use std::sync::Arc;

use thiserror::Error;

use super::engine::RuleEngine;
use super::rule::{RuleError, RuleTable};
use crate::concept::Concept;
use crate::config::Params;
use crate::memory::Memory;
use crate::parser::{self, ParseError};
use crate::task::{Punctuation, Sentence, Task, TaskType};
use crate::time::Clock;

/// Rule blocks a reasoner loads by default.
const DEFAULT_RULE_BLOCKS: [&str; 2] = ["rules.immediate", "rules.nal1"];

/// Rejected Narsese input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("empty input")]
    Empty,

    #[error("invalid cycle count: {0}")]
    InvalidCycleCount(String),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// What one Narsese input did.
#[derive(Debug)]
pub struct InputResult {
    /// Echo of the parsed task, when the input was a sentence.
    pub task: Option<Task>,

    /// Keys displaced out of saturated bags.
    pub overflow: Vec<String>,

    /// Answers produced synchronously.
    pub answers: Vec<Sentence>,

    /// Cycles run, when the input was a number.
    pub cycles: u64,
}

/// The Non-Axiomatic Reasoner.
pub struct NAR {
    memory: Memory,
    engine: RuleEngine,
    clock: Arc<Clock>,
    params: Params,
}

impl NAR {
    /// A reasoner with default parameters and the default rule blocks.
    pub fn new() -> Self {
        Self::with_clock(Params::default(), Clock::new())
    }

    /// A deterministic reasoner for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_clock(Params::default(), Clock::with_seed(seed))
    }

    /// A reasoner over the given clock, with the default rule blocks.
    pub fn with_clock(params: Params, clock: Clock) -> Self {
        let mut nar = Self::bare(params, clock);
        for key in DEFAULT_RULE_BLOCKS {
            nar.load_rules(key).expect("builtin rule blocks load");
        }
        nar
    }

    /// A reasoner with no rules loaded.
    pub fn bare(params: Params, clock: Clock) -> Self {
        NAR {
            memory: Memory::new(params.clone()),
            engine: RuleEngine::new(),
            clock: Arc::new(clock),
            params,
        }
    }

    /// Load one block of the builtin rule table.
    pub fn load_rules(&mut self, key: &str) -> Result<usize, RuleError> {
        let count = self.engine.load(RuleTable::builtin(), key)?;
        log::debug!("loaded {} rules from {}", count, key);
        Ok(count)
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Look up a concept by canonical name.
    pub fn concept(&self, name: &str) -> Option<&Concept> {
        self.memory.concept(name)
    }

    /// (name, priority) pairs of the concept bag.
    pub fn concept_bag_snapshot(&self) -> Vec<(String, f32)> {
        self.memory.concept_snapshot()
    }

    /// (key, priority) pairs of the global task bag.
    pub fn global_task_bag_snapshot(&self) -> Vec<(String, f32)> {
        self.memory.global_task_snapshot()
    }

    /// (key, priority) pairs of the novel task bag.
    pub fn novel_task_bag_snapshot(&self) -> Vec<(String, f32)> {
        self.memory.novel_task_snapshot()
    }

    /// Feed one line of Narsese, or a number of cycles to run.
    pub fn input_narsese(&mut self, text: &str) -> Result<InputResult, InputError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(InputError::Empty);
        }
        if text.chars().all(|c| c.is_ascii_digit()) {
            let cycles: u64 = text
                .parse()
                .map_err(|_| InputError::InvalidCycleCount(text.to_string()))?;
            for _ in 0..cycles {
                self.cycle();
            }
            return Ok(InputResult {
                task: None,
                overflow: Vec::new(),
                answers: Vec::new(),
                cycles,
            });
        }
        let task = parser::parse_task(text, &self.clock, &self.params)?;
        let echo = task.clone();
        let outcome = self.memory.input(task, &self.clock);
        self.clock.tick();
        Ok(InputResult {
            task: Some(echo),
            overflow: outcome.overflow,
            answers: outcome.answers,
            cycles: 0,
        })
    }

    /// One working cycle.
    pub fn cycle(&mut self) {
        self.work_cycle();
        self.clock.tick();
    }

    fn work_cycle(&mut self) {
        let Some(mut concept) = self.memory.concepts_mut().take_out() else {
            return;
        };
        let Some(task_link) = concept.task_links_mut().take_out() else {
            self.memory.concepts_mut().put_back(concept);
            return;
        };
        let target_term = task_link.target_term().clone();
        let punctuation = self
            .memory
            .task(task_link.target())
            .map(|t| t.sentence().punctuation())
            .unwrap_or(Punctuation::Judgment);
        concept.task_links_mut().put_back(task_link);
        log::trace!("cycle works on {}", concept.name());

        self.engine.assert_fact(&target_term);
        let derivations = self.engine.derive();
        self.memory.concepts_mut().put_back(concept);

        for derivation in derivations {
            let line = format!("{}{}", derivation.conclusion, punctuation);
            match parser::parse_task(&line, &self.clock, &self.params) {
                Ok(mut task) => {
                    log::debug!("derive {} by {}", line, derivation.rule);
                    task.set_task_type(TaskType::Derived);
                    self.memory.input(task, &self.clock);
                    self.clock.tick();
                }
                Err(err) => {
                    log::debug!("derived conclusion {} did not re-parse: {}", line, err);
                }
            }
        }
    }

    /// Clear memory and facts and rewind the clock; rules stay loaded.
    pub fn reset(&mut self) {
        self.memory = Memory::new(self.params.clone());
        self.engine.clear_facts();
        self.clock.reset();
    }
}

impl Default for NAR {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_is_answered_from_memory() {
        let mut nar = NAR::with_seed(42);
        nar.input_narsese("<bird --> fly>. %0.9;0.9%").unwrap();
        let result = nar.input_narsese("<bird --> fly>?").unwrap();
        assert_eq!(result.answers.len(), 1);
        let answer = &result.answers[0];
        assert_eq!(answer.term().name(), "<bird --> fly>");
        let truth = answer.truth().unwrap();
        assert!((truth.frequency() - 0.9).abs() < 1e-3);
        assert!((truth.confidence() - 0.9).abs() < 1e-3);
    }

    #[test]
    fn test_wh_question_finds_binding() {
        let mut nar = NAR::with_seed(42);
        nar.input_narsese("<bird --> fly>. %0.9;0.9%").unwrap();
        let result = nar.input_narsese("<bird --> ?x>?").unwrap();
        assert_eq!(result.answers.len(), 1);
        assert_eq!(result.answers[0].term().name(), "<bird --> fly>");
    }

    #[test]
    fn test_numeric_input_runs_cycles() {
        let mut nar = NAR::with_seed(42);
        let result = nar.input_narsese("3").unwrap();
        assert_eq!(result.cycles, 3);
        assert!(result.task.is_none());
        assert_eq!(nar.clock().now(), 3);
    }

    #[test]
    fn test_empty_and_malformed_input() {
        let mut nar = NAR::with_seed(42);
        assert!(matches!(nar.input_narsese("  "), Err(InputError::Empty)));
        assert!(matches!(
            nar.input_narsese("<bird -->"),
            Err(InputError::Parse(_))
        ));
        // a failed parse does not corrupt memory
        assert!(nar.memory().is_empty());
    }

    #[test]
    fn test_bare_two_cycle_run_derives_nothing() {
        let mut nar = NAR::bare(Params::default(), Clock::with_seed(42));
        nar.cycle();
        nar.cycle();
        assert_eq!(nar.engine().fact_count(), 0);
        assert!(nar.memory().is_empty());
    }

    #[test]
    fn test_input_advances_clock() {
        let mut nar = NAR::with_seed(42);
        nar.input_narsese("<bird --> fly>.").unwrap();
        assert_eq!(nar.clock().now(), 1);
    }

    #[test]
    fn test_cycles_reach_deduction() {
        let mut nar = NAR::with_seed(42);
        nar.input_narsese("<bird --> fly>. %0.9;0.9%").unwrap();
        nar.input_narsese("<fly --> animal>. %0.9;0.9%").unwrap();
        for _ in 0..30 {
            nar.cycle();
        }
        assert!(nar.engine().contains("<bird --> animal>"));
        assert!(!nar.engine().contains("<bird --> bird>"));
        // the conclusion was re-injected and conceptualized
        assert!(nar.concept("<bird --> animal>").is_some());
    }

    #[test]
    fn test_reset() {
        let mut nar = NAR::with_seed(42);
        nar.input_narsese("<bird --> fly>.").unwrap();
        nar.cycle();
        nar.reset();
        assert!(nar.memory().is_empty());
        assert_eq!(nar.engine().fact_count(), 0);
        assert_eq!(nar.clock().now(), 0);
        // rules survive a reset
        assert!(nar.engine().rule_count() > 0);
    }

    #[test]
    fn test_snapshots_expose_bags() {
        let mut nar = NAR::with_seed(42);
        nar.input_narsese("<bird --> fly>.").unwrap();
        assert!(nar
            .concept_bag_snapshot()
            .iter()
            .any(|(name, _)| name == "<bird --> fly>"));
        assert_eq!(nar.global_task_bag_snapshot().len(), 1);
    }
}
