//! Concepts
//!
//! A concept is the per-term unit of memory: it remembers the judgments,
//! questions, and goals about its term, and owns the task-link and
//! term-link bags that connect it to the rest of the system. Concepts are
//! created on first reference and never destroyed; forgetting only lowers
//! their priority.

use ordered_float::OrderedFloat;

use crate::bag::{Bag, Item};
use crate::budget::{self, Budget};
use crate::config::{
    Params, BUDGET_THRESHOLD, CONCEPT_BELIEFS_MAX, CONCEPT_GOALS_MAX, CONCEPT_QUESTIONS_MAX,
    REVISION_MAX_OCCURRENCE_DISTANCE,
};
use crate::link::{TaskLink, TermLink};
use crate::stamp::{Stamp, Tense};
use crate::task::{solution_quality, Sentence, Task, TaskId, TaskType};
use crate::term::Term;
use crate::truth::Truth;

/// What processing a judgment did to the concept.
#[derive(Debug, Default)]
pub struct JudgmentOutcome {
    /// The new evidence was already present; nothing changed.
    pub duplicate: bool,

    /// The revision product, when the judgment merged with a belief.
    pub revised: Option<Task>,
}

/// The memory item of a single term.
#[derive(Debug)]
pub struct Concept {
    term: Term,
    key: String,
    budget: Budget,
    beliefs: Vec<Task>,
    questions: Vec<TaskId>,
    goals: Vec<Task>,
    task_links: Bag<TaskLink>,
    term_links: Bag<TermLink>,
}

impl Concept {
    /// Create the concept of `term` with its conceptualization budget.
    pub fn new(term: Term, budget: Budget, params: &Params) -> Self {
        let key = term.name();
        Concept {
            term,
            key,
            budget,
            beliefs: Vec::new(),
            questions: Vec::new(),
            goals: Vec::new(),
            task_links: Bag::new(params.task_link_bag_size, params.task_link_forget_cycles),
            term_links: Bag::new(params.term_link_bag_size, params.term_link_forget_cycles),
        }
    }

    /// The term this concept is about.
    pub fn term(&self) -> &Term {
        &self.term
    }

    /// The canonical name; equal to the term's canonical name.
    pub fn name(&self) -> &str {
        &self.key
    }

    pub fn beliefs(&self) -> &[Task] {
        &self.beliefs
    }

    pub fn beliefs_mut(&mut self) -> &mut [Task] {
        &mut self.beliefs
    }

    pub fn questions(&self) -> &[TaskId] {
        &self.questions
    }

    pub fn goals(&self) -> &[Task] {
        &self.goals
    }

    pub fn task_links(&self) -> &Bag<TaskLink> {
        &self.task_links
    }

    pub fn task_links_mut(&mut self) -> &mut Bag<TaskLink> {
        &mut self.task_links
    }

    pub fn term_links(&self) -> &Bag<TermLink> {
        &self.term_links
    }

    pub fn term_links_mut(&mut self) -> &mut Bag<TermLink> {
        &mut self.term_links
    }

    /// Process an incoming judgment task.
    ///
    /// Finds the best-matching remembered belief, drops duplicate
    /// evidence, revises against the match when allowed, and finally
    /// remembers the judgment (and any revision product) when its budget
    /// clears the threshold.
    pub fn process_judgment(&mut self, task: &mut Task, now: i64, duration: i64) -> JudgmentOutcome {
        let mut outcome = JudgmentOutcome::default();
        if let Some(index) = self.select_candidate(task) {
            let candidate = self.beliefs[index].clone();
            if candidate
                .sentence()
                .stamp()
                .equals(task.sentence().stamp(), false, true, true)
            {
                outcome.duplicate = true;
                return outcome;
            }
            if revisable(task.sentence(), candidate.sentence()) {
                outcome.revised = local_revision(task, &candidate, now, duration);
            }
        }
        if task.budget().summary() > BUDGET_THRESHOLD {
            self.add_belief(task.clone());
        }
        if let Some(revised) = &outcome.revised {
            if revised.budget().summary() > BUDGET_THRESHOLD {
                self.add_belief(revised.clone());
            }
        }
        outcome
    }

    /// The remembered belief that best matches `task`, by confidence.
    pub fn select_candidate(&self, task: &Task) -> Option<usize> {
        (0..self.beliefs.len()).max_by_key(|&i| {
            OrderedFloat(solution_quality(
                Some(task.sentence()),
                self.beliefs[i].sentence(),
                true,
            ))
        })
    }

    /// Remember a belief, evicting the lowest-quality one at capacity.
    pub fn add_belief(&mut self, task: Task) {
        self.beliefs.push(task);
        if self.beliefs.len() > CONCEPT_BELIEFS_MAX {
            if let Some(worst) = (0..self.beliefs.len())
                .min_by_key(|&i| OrderedFloat(self.beliefs[i].budget().quality()))
            {
                self.beliefs.remove(worst);
            }
        }
    }

    /// Remember a question, shifting the oldest out at capacity.
    pub fn add_question(&mut self, id: TaskId) {
        if self.questions.contains(&id) {
            return;
        }
        self.questions.push(id);
        if self.questions.len() > CONCEPT_QUESTIONS_MAX {
            self.questions.remove(0);
        }
    }

    /// Remember a goal, shifting the oldest out at capacity.
    pub fn add_goal(&mut self, task: Task) {
        self.goals.push(task);
        if self.goals.len() > CONCEPT_GOALS_MAX {
            self.goals.remove(0);
        }
    }

    /// Take a term link that passes the novelty gate against `task_link`,
    /// putting rejected ones back.
    pub fn take_novel_term_link(
        &mut self,
        task_link: &mut TaskLink,
        now: i64,
    ) -> Option<TermLink> {
        for _ in 0..self.term_links.len() {
            let link = self.term_links.take_out()?;
            if task_link.novel(&link, now) {
                return Some(link);
            }
            self.term_links.put_back(link);
        }
        None
    }
}

impl Item for Concept {
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

impl std::fmt::Display for Concept {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Concept: {}", self.key)?;
        writeln!(f, "  Budget: {}", self.budget)?;
        writeln!(f, "  Beliefs: {}", self.beliefs.len())?;
        writeln!(f, "  Questions: {}", self.questions.len())?;
        writeln!(f, "  Task links: {}", self.task_links.len())?;
        writeln!(f, "  Term links: {}", self.term_links.len())
    }
}

/// Whether two judgments may be merged by revision.
///
/// Both must sit at the same temporal layer (eternal, or close enough in
/// occurrence time), carry compatible tenses, be revisable sentences, and
/// rest on disjoint evidence.
fn revisable(new: &Sentence, old: &Sentence) -> bool {
    let temporally_close = match (new.stamp().is_eternal(), old.stamp().is_eternal()) {
        (true, true) => true,
        (false, false) => {
            (new.stamp().occurrence() - old.stamp().occurrence()).abs()
                <= REVISION_MAX_OCCURRENCE_DISTANCE
        }
        _ => false,
    };
    let order_compatible = new.stamp().tense() == old.stamp().tense()
        || new.stamp().tense() == Tense::None
        || old.stamp().tense() == Tense::None;
    temporally_close
        && order_compatible
        && new.is_revisable()
        && !new.stamp().overlaps(old.stamp())
}

/// Merge a judgment task with a matching belief into a revised task.
///
/// Also records on the task how far the revision moved the expectation.
fn local_revision(task: &mut Task, belief: &Task, now: i64, duration: i64) -> Option<Task> {
    let task_truth = *task.sentence().truth()?;
    let belief_truth = *belief.sentence().truth()?;
    let truth = Truth::revision(&task_truth, &belief_truth);
    task.set_achievement((truth.expectation() - belief_truth.expectation()).abs());
    let budget = budget::revise(
        &task_truth,
        &belief_truth,
        &truth,
        task.budget_mut(),
        None,
        None,
    );
    let stamp = Stamp::derive(
        task.sentence().stamp(),
        belief.sentence().stamp(),
        now,
        None,
        false,
        0,
        duration,
    );
    let sentence = Sentence::judgment(task.term().clone(), truth, stamp);
    Some(Task::new(sentence, budget, TaskType::Derived))
}
