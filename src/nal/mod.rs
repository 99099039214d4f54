//! Non-Axiomatic Logic
//!
//! The rule language and table, the pattern unifier, the single-shot
//! derivation engine, and the reasoner that drives them from memory.

pub mod engine;
pub mod nar;
pub mod rule;
pub mod unify;

pub use engine::{Derivation, RuleEngine};
pub use nar::{InputError, InputResult, NAR};
pub use rule::{Pattern, Rule, RuleError, RuleTable};
