//! NARS - a Non-Axiomatic Reasoning System core
//!
//! This crate implements the reasoning core of NARS: a memory-bounded,
//! priority-driven inference engine. Narsese sentences are parsed into
//! tasks, organized into concepts and cross-reference links, revised
//! under evidence-tracking truth semantics, and answered by unifying
//! questions against remembered beliefs, all under a fixed attention
//! budget managed by priority bags.

pub mod bag;
pub mod budget;
pub mod concept;
pub mod config;
pub mod link;
pub mod memory;
pub mod nal;
pub mod num;
pub mod parser;
pub mod stamp;
pub mod task;
pub mod term;
pub mod time;
pub mod truth;

// Re-export the main components for easier access
pub use budget::Budget;
pub use concept::Concept;
pub use memory::Memory;
pub use nal::NAR;
pub use num::ShortFloat;
pub use stamp::Stamp;
pub use task::{Sentence, Task};
pub use term::Term;
pub use time::Clock;
pub use truth::Truth;
