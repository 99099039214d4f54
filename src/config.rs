//! System parameters
//!
//! All tunable constants of the reasoner live here, together with the
//! `Params` struct that carries the per-instance configuration (bag sizes
//! and forgetting rates) through the system.

/// Number of priority levels in every bag.
pub const TOTAL_LEVEL: usize = 100;

/// Levels below this yield a single item per visit during take-out.
pub const BAG_THRESHOLD: usize = 10;

/// Minimum priority change that makes forgetting worthwhile.
pub const RELATIVE_THRESHOLD: f32 = 0.1;

/// Fraction of quality that priority decays towards when forgetting.
pub const QUALITY_FLOOR: f32 = 0.3;

/// Budget summary a task must exceed to be remembered as a belief.
pub const BUDGET_THRESHOLD: f32 = 0.01;

/// Mean budget a task must exceed to be considered active at all.
pub const BUDGET_EPSILON: f32 = 0.001;

/// Smallest truth difference treated as significant.
pub const TRUTH_EPSILON: f32 = 0.01;

/// Default evidential horizon (the `k` of the truth calculus).
pub const HORIZON: f32 = 1.0;

/// Term complexity discount unit used by solution quality.
pub const COMPLEXITY_UNIT: f32 = 1.0;

/// Priority of an input judgment without an explicit budget.
pub const DEFAULT_JUDGMENT_PRIORITY: f32 = 0.8;
/// Durability of an input judgment without an explicit budget.
pub const DEFAULT_JUDGMENT_DURABILITY: f32 = 0.5;
/// Confidence of an input judgment without an explicit truth.
pub const DEFAULT_JUDGMENT_CONFIDENCE: f32 = 0.9;
/// Priority of an input question without an explicit budget.
pub const DEFAULT_QUESTION_PRIORITY: f32 = 0.9;
/// Durability of an input question without an explicit budget.
pub const DEFAULT_QUESTION_DURABILITY: f32 = 0.9;

/// Logical cycles spanned by one tense step.
pub const DURATION: i64 = 5;

/// Minimum cycle gap before a (task-link, term-link) pair is reconsidered.
pub const NOVELTY_HORIZON: i64 = 100_000;

/// Maximum occurrence-time distance between two revisable beliefs.
pub const REVISION_MAX_OCCURRENCE_DISTANCE: i64 = 10;

/// Bound of the recency records kept by a task link.
pub const TERM_LINK_RECORD_LENGTH: usize = 10;

/// Capacity of the concept bag.
pub const CONCEPT_BAG_SIZE: usize = 10_000;
/// Capacity of each concept's task-link bag.
pub const TASK_LINK_BAG_SIZE: usize = 100;
/// Capacity of each concept's term-link bag.
pub const TERM_LINK_BAG_SIZE: usize = 100;
/// Capacity of the global and novel task bags.
pub const TASK_BAG_SIZE: usize = 1_000;

/// Beliefs remembered per concept.
pub const CONCEPT_BELIEFS_MAX: usize = 28;
/// Questions remembered per concept.
pub const CONCEPT_QUESTIONS_MAX: usize = 5;
/// Goals remembered per concept.
pub const CONCEPT_GOALS_MAX: usize = 7;

/// Hard cap on the evidential base of a stamp.
pub const MAX_EVIDENTIAL_BASE_LENGTH: usize = 20_000;

/// Per-instance configuration.
///
/// The forgetting rates are "cycles to half": the number of cycles after
/// which an untouched item's priority has decayed halfway to its quality
/// floor.
#[derive(Debug, Clone)]
pub struct Params {
    pub concept_bag_size: usize,
    pub task_link_bag_size: usize,
    pub term_link_bag_size: usize,
    pub task_bag_size: usize,
    pub concept_forget_cycles: f32,
    pub task_link_forget_cycles: f32,
    pub term_link_forget_cycles: f32,
    pub task_forget_cycles: f32,
    pub duration: i64,
    pub novelty_horizon: i64,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            concept_bag_size: CONCEPT_BAG_SIZE,
            task_link_bag_size: TASK_LINK_BAG_SIZE,
            term_link_bag_size: TERM_LINK_BAG_SIZE,
            task_bag_size: TASK_BAG_SIZE,
            concept_forget_cycles: 10.0,
            task_link_forget_cycles: 20.0,
            term_link_forget_cycles: 50.0,
            task_forget_cycles: 10.0,
            duration: DURATION,
            novelty_horizon: NOVELTY_HORIZON,
        }
    }
}
