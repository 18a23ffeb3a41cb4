//! Typed failures for engine construction, input parsing, and search.
//!
//! Nothing in this crate retries: every failure is deterministic and is
//! surfaced to the caller synchronously.

use thiserror::Error;

/// Failures surfaced by the rewrite engine and the derivation search.
#[derive(Debug, Error)]
pub enum Error {
    /// The rule table cannot be compiled into a matcher.
    #[error("invalid rule configuration: {reason}")]
    Configuration { reason: String },

    /// An input line does not match the puzzle grammar.
    #[error("malformed input line {line_no}: {line:?}")]
    MalformedLine { line_no: usize, line: String },

    /// The search frontier emptied without ever reaching the goal.
    ///
    /// Distinct from a zero-length derivation (start already equals
    /// goal, reported as `0`).
    #[error("no derivation found for {goal:?}")]
    SearchExhausted { goal: String },
}
