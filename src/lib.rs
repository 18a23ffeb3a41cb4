//! Minimum-derivation search for string rewrite puzzles.
//!
//! Given a production-rule rewriting system (`symbol => replacement`
//! lines, with multiple alternatives allowed per symbol), this crate
//! enumerates every one-step derivative of a string and searches for
//! the shortest derivation of a goal string from a start symbol,
//! guided and pruned by a goal-fixed Levenshtein heuristic.

pub mod distance;
pub mod error;
pub mod machine;
pub mod rules;
pub mod search;

// Re-export main types
pub use distance::GoalDistance;
pub use error::Error;
pub use machine::{Expansions, Machine, Occurrence, Segmentation};
pub use rules::{PuzzleInput, Rule, RuleSet};
pub use search::{shortest_derivation, Search, SearchConfig, SearchReport, StepOutcome};
