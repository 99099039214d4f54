//! Sentences and tasks
//!
//! A sentence wraps a term with its punctuation, optional truth, and
//! stamp; a task wraps a sentence with the budget that buys it attention.
//! Question sentences carry a best-solution slot that question answering
//! keeps up to date.

use std::fmt;

use slotmap::new_key_type;

use crate::budget::Budget;
use crate::config::COMPLEXITY_UNIT;
use crate::stamp::Stamp;
use crate::term::{Copula, Term};
use crate::truth::Truth;

new_key_type! {
    /// Arena key of a task held by [`crate::memory::Memory`].
    pub struct TaskId;
}

/// Punctuation of a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Punctuation {
    Judgment,
    Question,
    Goal,
}

impl fmt::Display for Punctuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Punctuation::Judgment => write!(f, "."),
            Punctuation::Question => write!(f, "?"),
            Punctuation::Goal => write!(f, "!"),
        }
    }
}

/// Where a task came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
    Input,
    Derived,
}

/// A judgment, question, or goal over a term.
#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    term: Term,
    punctuation: Punctuation,
    truth: Option<Truth>,
    stamp: Stamp,
    best_solution: Option<Box<Sentence>>,
}

impl Sentence {
    /// A judgment: term, truth, stamp.
    pub fn judgment(term: Term, truth: Truth, stamp: Stamp) -> Self {
        Sentence {
            term,
            punctuation: Punctuation::Judgment,
            truth: Some(truth),
            stamp,
            best_solution: None,
        }
    }

    /// A question: term and stamp only.
    pub fn question(term: Term, stamp: Stamp) -> Self {
        Sentence {
            term,
            punctuation: Punctuation::Question,
            truth: None,
            stamp,
            best_solution: None,
        }
    }

    /// A goal: term, desire value, stamp.
    pub fn goal(term: Term, truth: Truth, stamp: Stamp) -> Self {
        Sentence {
            term,
            punctuation: Punctuation::Goal,
            truth: Some(truth),
            stamp,
            best_solution: None,
        }
    }

    pub fn term(&self) -> &Term {
        &self.term
    }

    pub fn punctuation(&self) -> Punctuation {
        self.punctuation
    }

    pub fn truth(&self) -> Option<&Truth> {
        self.truth.as_ref()
    }

    pub fn stamp(&self) -> &Stamp {
        &self.stamp
    }

    pub fn is_judgment(&self) -> bool {
        self.punctuation == Punctuation::Judgment
    }

    pub fn is_question(&self) -> bool {
        self.punctuation == Punctuation::Question
    }

    pub fn is_goal(&self) -> bool {
        self.punctuation == Punctuation::Goal
    }

    /// The best solution found for this sentence so far.
    pub fn best_solution(&self) -> Option<&Sentence> {
        self.best_solution.as_deref()
    }

    /// Remember a better solution.
    pub fn set_best_solution(&mut self, solution: Sentence) {
        self.best_solution = Some(Box::new(solution));
    }

    /// Whether revision may combine this judgment with another.
    ///
    /// Inheritance and equivalence statements are always revisable; other
    /// terms only when no dependent variable occurs in them.
    pub fn is_revisable(&self) -> bool {
        let by_copula = self
            .term
            .as_statement()
            .map(|s| matches!(s.copula(), Copula::Inheritance | Copula::Equivalence))
            .unwrap_or(false);
        by_copula || !self.term.has_dep_var()
    }

    /// The printable form that keys tasks and bag entries.
    pub fn key(&self) -> String {
        format!("{}{}", self.term, self.punctuation)
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.term, self.punctuation)?;
        if let Some(truth) = &self.truth {
            write!(f, " %{:.2};{:.2}%", truth.frequency(), truth.confidence())?;
        }
        Ok(())
    }
}

/// A sentence under a budget: the unit of work in the system.
#[derive(Debug, Clone)]
pub struct Task {
    sentence: Sentence,
    budget: Budget,
    task_type: TaskType,
    achievement: Option<f32>,
}

impl Task {
    pub fn new(sentence: Sentence, budget: Budget, task_type: TaskType) -> Self {
        Task {
            sentence,
            budget,
            task_type,
            achievement: None,
        }
    }

    pub fn sentence(&self) -> &Sentence {
        &self.sentence
    }

    pub fn sentence_mut(&mut self) -> &mut Sentence {
        &mut self.sentence
    }

    pub fn term(&self) -> &Term {
        self.sentence.term()
    }

    pub fn budget(&self) -> &Budget {
        &self.budget
    }

    pub fn budget_mut(&mut self) -> &mut Budget {
        &mut self.budget
    }

    /// Sentence and budget, borrowed apart.
    pub fn parts_mut(&mut self) -> (&mut Sentence, &mut Budget) {
        (&mut self.sentence, &mut self.budget)
    }

    pub fn task_type(&self) -> TaskType {
        self.task_type
    }

    pub fn set_task_type(&mut self, task_type: TaskType) {
        self.task_type = task_type;
    }

    pub fn is_input(&self) -> bool {
        self.task_type == TaskType::Input
    }

    /// How much the task changed the belief it revised against.
    pub fn achievement(&self) -> Option<f32> {
        self.achievement
    }

    pub fn set_achievement(&mut self, value: f32) {
        self.achievement = Some(value);
    }

    /// The printable form of the wrapped sentence.
    pub fn key(&self) -> String {
        self.sentence.key()
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.budget, self.sentence)
    }
}

/// How well `solution` answers `problem`.
///
/// With `rate_by_confidence` the solution's confidence decides; otherwise
/// its expectation discounted by term complexity. A solution that still
/// carries a query variable cannot answer a differently punctuated
/// problem.
pub fn solution_quality(
    problem: Option<&Sentence>,
    solution: &Sentence,
    rate_by_confidence: bool,
) -> f32 {
    let Some(truth) = solution.truth() else {
        return 0.0;
    };
    if let Some(problem) = problem {
        if problem.punctuation() != solution.punctuation()
            && solution.term().has_query_var()
        {
            return 0.0;
        }
    }
    if rate_by_confidence {
        truth.confidence()
    } else {
        truth.expectation()
            / (solution.term().complexity() as f32 * COMPLEXITY_UNIT).powf(0.125)
    }
}
