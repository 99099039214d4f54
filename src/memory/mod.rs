//! Memory
//!
//! The memory façade owns the concept bag, the task arena, and the
//! memory-level overview bags. Every input task flows through
//! [`Memory::input`]: the task's concept is found or created, the task is
//! processed as a judgment, question, or goal, answers are collected, and
//! the task is fanned out into task links and term links.

use slotmap::SlotMap;

use crate::bag::{Bag, Item};
use crate::budget::Budget;
use crate::concept::Concept;
use crate::config::Params;
use crate::link::{TaskLink, TermLink};
use crate::num;
use crate::task::{solution_quality, Punctuation, Sentence, Task, TaskId};
use crate::term::unify::{unify, Bindings};
use crate::term::Term;
use crate::time::Clock;

/// A (key, budget) view of a link kept in the memory-level overview bags.
#[derive(Debug, Clone)]
pub struct BagEntry {
    key: String,
    budget: Budget,
}

impl BagEntry {
    fn new(key: &str, budget: Budget) -> Self {
        BagEntry {
            key: key.to_string(),
            budget,
        }
    }
}

impl Item for BagEntry {
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

/// A bag entry referring to a task in the arena.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    key: String,
    task: TaskId,
    budget: Budget,
}

impl TaskEntry {
    /// The arena id of the referenced task.
    pub fn task(&self) -> TaskId {
        self.task
    }
}

impl Item for TaskEntry {
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

/// What one call to [`Memory::input`] did.
#[derive(Debug)]
pub struct InputOutcome {
    /// Arena id of the stored task.
    pub task: TaskId,

    /// Keys displaced out of saturated bags along the way.
    pub overflow: Vec<String>,

    /// Answers produced for question tasks (or woken by a judgment).
    pub answers: Vec<Sentence>,
}

/// The concept memory and task arena.
#[derive(Debug)]
pub struct Memory {
    concepts: Bag<Concept>,
    tasks: SlotMap<TaskId, Task>,
    task_links: Bag<BagEntry>,
    term_links: Bag<BagEntry>,
    global_tasks: Bag<TaskEntry>,
    novel_tasks: Bag<TaskEntry>,
    current_concept: Option<String>,
    params: Params,
}

impl Memory {
    pub fn new(params: Params) -> Self {
        Memory {
            concepts: Bag::new(params.concept_bag_size, params.concept_forget_cycles),
            tasks: SlotMap::with_key(),
            task_links: Bag::new(params.task_bag_size, params.task_link_forget_cycles),
            term_links: Bag::new(params.task_bag_size, params.term_link_forget_cycles),
            global_tasks: Bag::new(params.task_bag_size, params.task_forget_cycles),
            novel_tasks: Bag::new(params.task_bag_size, params.task_forget_cycles),
            current_concept: None,
            params,
        }
    }

    /// Number of concepts in memory.
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Look up a concept by canonical name.
    pub fn concept(&self, name: &str) -> Option<&Concept> {
        self.concepts.peek(name)
    }

    /// The concept bag itself; the control loop draws from it.
    pub fn concepts_mut(&mut self) -> &mut Bag<Concept> {
        &mut self.concepts
    }

    pub fn concepts(&self) -> &Bag<Concept> {
        &self.concepts
    }

    /// Look up a task in the arena.
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// The concept most recently worked on.
    pub fn current_concept(&self) -> Option<&str> {
        self.current_concept.as_deref()
    }

    /// (name, priority) pairs of the concept bag, highest level first.
    pub fn concept_snapshot(&self) -> Vec<(String, f32)> {
        self.concepts
            .iter()
            .map(|c| (c.name().to_string(), c.budget().priority()))
            .collect()
    }

    /// (key, priority) pairs of the global task bag.
    pub fn global_task_snapshot(&self) -> Vec<(String, f32)> {
        self.global_tasks
            .iter()
            .map(|e| (e.key().to_string(), e.budget().priority()))
            .collect()
    }

    /// (key, priority) pairs of the novel task bag.
    pub fn novel_task_snapshot(&self) -> Vec<(String, f32)> {
        self.novel_tasks
            .iter()
            .map(|e| (e.key().to_string(), e.budget().priority()))
            .collect()
    }

    /// Route a task into memory; the heart of the system.
    pub fn input(&mut self, task: Task, clock: &Clock) -> InputOutcome {
        let term = task.term().clone();
        let budget = *task.budget();
        let punctuation = task.sentence().punctuation();
        let is_input = task.is_input();
        let key = task.key();
        let id = self.tasks.insert(task);
        let mut overflow = Vec::new();
        let mut answers = Vec::new();

        log::debug!("input {}", key);

        let entry = TaskEntry {
            key,
            task: id,
            budget,
        };
        let task_bag = if is_input {
            &mut self.global_tasks
        } else {
            &mut self.novel_tasks
        };
        if let Some(out) = task_bag.put_in(entry) {
            overflow.push(out.key);
        }

        let concept_budget =
            Budget::new(budget.priority(), budget.durability(), term.simplicity());
        let mut concept = self.pick_or_generate(&term, concept_budget);
        self.current_concept = Some(concept.name().to_string());

        match punctuation {
            Punctuation::Judgment => {
                let outcome = {
                    let task = self.tasks.get_mut(id).expect("task just inserted");
                    concept.process_judgment(task, clock.now(), self.params.duration)
                };
                if !outcome.duplicate {
                    self.answer_pending_questions(&concept, id, &mut answers);
                }
            }
            Punctuation::Question => {
                concept.add_question(id);
                if term.has_query_var() {
                    self.process_wh_question(id, &mut answers);
                } else {
                    self.process_yes_no_question(id, &mut concept, &mut answers);
                }
            }
            Punctuation::Goal => {
                let task = self.tasks[id].clone();
                concept.add_goal(task);
            }
        }

        if let Some(out) = self.concepts.put_in(concept) {
            overflow.push(out.name().to_string());
        }

        self.create_task_links(id, &mut overflow);
        self.create_term_links(&term, &budget, &mut overflow);

        InputOutcome {
            task: id,
            overflow,
            answers,
        }
    }

    /// Find a concept and refresh its budget, or create it.
    pub fn pick_or_generate(&mut self, term: &Term, budget: Budget) -> Concept {
        let name = term.name();
        match self.concepts.pick_out(&name) {
            Some(mut concept) => {
                let b = concept.budget_mut();
                b.set_priority(num::or(b.priority(), budget.priority()));
                b.set_durability(num::or(b.durability(), budget.durability()));
                b.set_quality(b.quality().max(budget.quality()));
                concept
            }
            None => {
                log::debug!("new concept {}", name);
                Concept::new(term.clone(), budget, &self.params)
            }
        }
    }

    /// Answer a question whose term is fully grounded: match it against
    /// the concept's remembered beliefs.
    fn process_yes_no_question(
        &mut self,
        id: TaskId,
        concept: &mut Concept,
        answers: &mut Vec<Sentence>,
    ) {
        let candidate = {
            let task = &self.tasks[id];
            concept.select_candidate(task)
        };
        if let Some(index) = candidate {
            let query = self.tasks.get_mut(id).expect("question in arena");
            let belief = &mut concept.beliefs_mut()[index];
            let (sentence, belief_budget) = belief.parts_mut();
            let solution = sentence.clone();
            if let Some(answer) = try_solution(query, &solution, belief_budget) {
                answers.push(answer);
            }
        }
    }

    /// Answer a question with query variables: follow the task links of
    /// the question's grounded subterms to candidate concepts, unify, and
    /// try each of their beliefs.
    fn process_wh_question(&mut self, id: TaskId, answers: &mut Vec<Sentence>) {
        let query_term = self.tasks[id].term().clone();
        let mut candidates: Vec<String> = Vec::new();
        for sub in query_term.subterms() {
            if sub.has_query_var() || sub.is_variable() {
                continue;
            }
            if let Some(linked) = self.concepts.peek(&sub.name()) {
                for link in linked.task_links().iter() {
                    let name = link.target_term().name();
                    if !candidates.contains(&name) {
                        candidates.push(name);
                    }
                }
            }
        }
        for name in candidates {
            let Some(mut concept) = self.concepts.pick_out(&name) else {
                continue;
            };
            let mut bindings = Bindings::new();
            if unify(&query_term, concept.term(), &mut bindings) && !bindings.is_empty() {
                for belief in concept.beliefs_mut() {
                    let (sentence, belief_budget) = belief.parts_mut();
                    let solution = sentence.clone();
                    let query = self.tasks.get_mut(id).expect("question in arena");
                    if let Some(answer) = try_solution(query, &solution, belief_budget) {
                        answers.push(answer);
                    }
                }
            }
            self.concepts.put_in(concept);
        }
    }

    /// Re-try the concept's pending questions against a new judgment.
    fn answer_pending_questions(
        &mut self,
        concept: &Concept,
        judgment: TaskId,
        answers: &mut Vec<Sentence>,
    ) {
        for qid in concept.questions().to_vec() {
            if qid == judgment {
                continue;
            }
            let Some([query, belief]) = self.tasks.get_disjoint_mut([qid, judgment]) else {
                continue;
            };
            let solution = belief.sentence().clone();
            if let Some(answer) = try_solution(query, &solution, belief.budget_mut()) {
                answers.push(answer);
            }
        }
    }

    /// Give every distinct subterm's concept a task link to the task.
    fn create_task_links(&mut self, id: TaskId, overflow: &mut Vec<String>) {
        let (term, key, budget) = {
            let task = &self.tasks[id];
            (task.term().clone(), task.key(), *task.budget())
        };
        let mut targets = vec![term.clone()];
        for sub in term.subterms() {
            if !targets.contains(&sub) {
                targets.push(sub);
            }
        }
        for sub in targets {
            if sub.is_variable() {
                continue;
            }
            let concept_budget =
                Budget::new(budget.priority(), budget.durability(), sub.simplicity());
            let mut concept = self.pick_or_generate(&sub, concept_budget);
            let link = TaskLink::new(concept.term(), id, &term, &key, budget);
            if let Some(out) = self.task_links.put_in(BagEntry::new(link.key(), budget)) {
                overflow.push(out.key);
            }
            concept.task_links_mut().put_in(link);
            if let Some(out) = self.concepts.put_in(concept) {
                overflow.push(out.name().to_string());
            }
        }
    }

    /// Insert bidirectional term links for every ancestor–descendant pair
    /// of the term tree.
    fn create_term_links(&mut self, term: &Term, budget: &Budget, overflow: &mut Vec<String>) {
        let mut nodes = vec![term.clone()];
        nodes.extend(term.subterms());
        let mut pairs: Vec<(Term, Term)> = Vec::new();
        for node in &nodes {
            for descendant in node.subterms() {
                if node.is_variable() || descendant.is_variable() {
                    continue;
                }
                let pair = (node.clone(), descendant);
                if !pairs.contains(&pair) {
                    pairs.push(pair);
                }
            }
        }
        for (ancestor, descendant) in pairs {
            self.insert_term_link(&ancestor, &descendant, budget, overflow);
            self.insert_term_link(&descendant, &ancestor, budget, overflow);
        }
    }

    fn insert_term_link(
        &mut self,
        source: &Term,
        target: &Term,
        budget: &Budget,
        overflow: &mut Vec<String>,
    ) {
        let concept_budget =
            Budget::new(budget.priority(), budget.durability(), source.simplicity());
        let mut concept = self.pick_or_generate(source, concept_budget);
        let link = TermLink::new(source, target, *budget);
        if let Some(out) = self.term_links.put_in(BagEntry::new(link.key(), *budget)) {
            overflow.push(out.key);
        }
        concept.term_links_mut().put_in(link);
        if let Some(out) = self.concepts.put_in(concept) {
            overflow.push(out.name().to_string());
        }
    }
}

/// Offer `solution` as an answer to `query`.
///
/// The first solution is always kept. A later one replaces it only when
/// its solution quality is strictly higher; the winning belief is
/// rewarded and the question's priority is damped so answered questions
/// fade.
pub fn try_solution(
    query: &mut Task,
    solution: &Sentence,
    solution_budget: &mut Budget,
) -> Option<Sentence> {
    let rate_by_confidence = !query.term().has_query_var();
    let (query_sentence, query_budget) = query.parts_mut();
    if query_sentence.best_solution().is_none() {
        query_sentence.set_best_solution(solution.clone());
        return Some(solution.clone());
    }
    let (old_quality, new_quality) = {
        let sentence: &Sentence = &*query_sentence;
        let best = sentence.best_solution().expect("checked above");
        (
            solution_quality(Some(sentence), best, rate_by_confidence),
            solution_quality(Some(sentence), solution, rate_by_confidence),
        )
    };
    if new_quality <= old_quality {
        return None;
    }
    query_sentence.set_best_solution(solution.clone());
    solution_budget.set_priority(num::or(query_budget.priority(), new_quality));
    solution_budget.set_durability(query_budget.durability());
    if let Some(truth) = solution.truth() {
        solution_budget.set_quality(truth.quality());
    }
    query_budget.set_priority(query_budget.priority().min(1.0 - new_quality));
    Some(solution.clone())
}
