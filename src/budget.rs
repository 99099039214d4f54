//! Budgets
//!
//! A budget governs how much attention an item receives: priority (current
//! importance), durability (resistance to forgetting), and quality
//! (long-term value). The budget functions here implement merging,
//! forgetting, activation, and the feedback applied during belief
//! revision.

use std::fmt;

use crate::config::{BUDGET_EPSILON, QUALITY_FLOOR};
use crate::num::{self, ShortFloat};
use crate::truth::Truth;

/// Attention budget of a task, link, or concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Budget {
    priority: ShortFloat,
    durability: ShortFloat,
    quality: ShortFloat,
}

impl Budget {
    /// Create a budget; values must already lie in [0, 1].
    pub fn new(priority: f32, durability: f32, quality: f32) -> Self {
        Budget {
            priority: ShortFloat::new(priority),
            durability: ShortFloat::new(durability),
            quality: ShortFloat::new(quality),
        }
    }

    pub fn priority(&self) -> f32 {
        self.priority.value()
    }

    pub fn durability(&self) -> f32 {
        self.durability.value()
    }

    pub fn quality(&self) -> f32 {
        self.quality.value()
    }

    pub fn set_priority(&mut self, value: f32) {
        self.priority.set(value.clamp(0.0, 1.0));
    }

    pub fn set_durability(&mut self, value: f32) {
        self.durability.set(value.clamp(0.0, 1.0));
    }

    pub fn set_quality(&mut self, value: f32) {
        self.quality.set(value.clamp(0.0, 1.0));
    }

    /// Budget summary `d * (p + q) / 2`.
    pub fn summary(&self) -> f32 {
        self.durability() * (self.priority() + self.quality()) / 2.0
    }

    /// Whether the budget is worth any processing at all.
    pub fn above_threshold(&self) -> bool {
        num::average_all(&[self.priority(), self.durability(), self.quality()]) > BUDGET_EPSILON
    }

    /// Merge a displaced copy into this one: priority stays, durability
    /// and quality keep the better value.
    pub fn merge(&mut self, old: &Budget) {
        self.set_durability(self.durability().max(old.durability()));
        self.set_quality(self.quality().max(old.quality()));
    }

    /// Decay priority towards the quality floor.
    ///
    /// `forget_cycles` is the number of cycles after which the distance to
    /// the floor has halved; changes below `relative_threshold` are
    /// skipped.
    pub fn forget(&mut self, forget_cycles: f32, relative_threshold: f32) {
        let p = self.priority();
        let floor = self.quality() * QUALITY_FLOOR;
        let distance = (p - floor).abs();
        if distance < relative_threshold {
            return;
        }
        let decay = self
            .durability()
            .powf(1.0 / (forget_cycles * distance));
        self.set_priority(floor + (p - floor) * decay);
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${};{};{}$",
            self.priority, self.durability, self.quality
        )
    }
}

/// Activate a concept budget with an incoming one: priority by
/// probabilistic OR, durability by arithmetic mean, quality untouched.
pub fn activate(budget: &mut Budget, incoming: &Budget) {
    budget.set_priority(num::or(budget.priority(), incoming.priority()));
    budget.set_durability(num::average(budget.durability(), incoming.durability()));
}

/// Budget feedback of a belief revision.
///
/// The task that triggered the revision loses priority and durability in
/// proportion to how much the revision changed its expectation; the
/// optional link budgets receive the complementary feedback. Returns the
/// budget of the revised conclusion.
pub fn revise(
    task_truth: &Truth,
    belief_truth: &Truth,
    derived: &Truth,
    task: &mut Budget,
    task_link: Option<&mut Budget>,
    term_link: Option<&mut Budget>,
) -> Budget {
    let dif_task = (task_truth.expectation() - derived.expectation()).abs();
    task.set_priority(num::and(task.priority(), 1.0 - dif_task));
    task.set_durability(num::and(task.durability(), 1.0 - dif_task));
    if let Some(link) = task_link {
        link.set_priority(num::and(task.priority(), dif_task));
        link.set_durability(num::and(task.durability(), dif_task));
    }
    if let Some(link) = term_link {
        let dif_belief = (belief_truth.expectation() - derived.expectation()).abs();
        link.set_priority(num::and(link.priority(), 1.0 - dif_belief));
        link.set_durability(num::and(link.durability(), 1.0 - dif_belief));
    }
    let dif = (derived.confidence() - task_truth.confidence().max(belief_truth.confidence()))
        .max(0.0);
    Budget::new(
        num::or(dif, task.priority()),
        num::average(dif, task.durability()),
        derived.quality(),
    )
}
