//! Greedy-best-first search for the shortest derivation of a goal
//! string from a start symbol.
//!
//! The frontier is ordered by Levenshtein distance to the goal, so the
//! search expands the most promising state first. Two prunes keep the
//! frontier tractable on large rule systems: candidates longer than the
//! goal are dropped (the tested rule systems are length-non-decreasing),
//! and candidates whose heuristic is strictly worse than their parent's
//! are dropped. The second prune is not admissible, so a reported count
//! is a trusted minimum only once the frontier is exhausted; until then
//! it is a best-known upper bound.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use rustc_hash::FxHashSet;

use crate::distance::GoalDistance;
use crate::error::Error;
use crate::machine::Machine;

/// One frontier entry. The derived `Ord` compares `(dist, steps, text)`
/// lexicographically: heuristic first, shallower states on ties, and
/// the text itself as a stable deterministic tie-break.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct State {
    dist: usize,
    steps: usize,
    text: String,
}

/// Outcome of a single search step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// Derivation length discovered by this step, if the goal was among
    /// the one-step derivatives of the expanded state. The caller keeps
    /// the minimum across all steps.
    pub found: Option<usize>,
    /// True once the frontier is empty.
    pub exhausted: bool,
}

/// Budget for driving a search to completion.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum wall-clock time for one search run.
    pub timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
        }
    }
}

/// Result of driving a search until exhaustion or budget.
#[derive(Debug, Clone)]
pub struct SearchReport {
    /// Smallest derivation length discovered, if any.
    pub steps: Option<usize>,
    /// Whether the frontier was fully drained. When false, `steps` is
    /// an upper bound reached before the budget ran out.
    pub exhausted: bool,
    /// Number of states expanded.
    pub rounds: usize,
    pub time_elapsed_ms: u64,
}

/// One in-flight derivation search. Owns its frontier and seen-set, so
/// independent searches never interfere.
pub struct Search<'m> {
    machine: &'m Machine,
    dist: GoalDistance,
    goal_len: usize,
    frontier: BinaryHeap<Reverse<State>>,
    seen: FxHashSet<String>,
}

impl<'m> Search<'m> {
    /// Start a search for the shortest derivation of `goal` from
    /// `start`. The frontier is seeded with the start string at zero
    /// steps.
    pub fn new(machine: &'m Machine, start: &str, goal: &str) -> Self {
        let mut dist = GoalDistance::new(goal);
        let d0 = dist.distance(start);
        let goal_len = dist.goal_len();

        let mut frontier = BinaryHeap::new();
        frontier.push(Reverse(State {
            dist: d0,
            steps: 0,
            text: start.to_string(),
        }));

        Self {
            machine,
            dist,
            goal_len,
            frontier,
            seen: FxHashSet::default(),
        }
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Heuristic of the best frontier state, if any.
    pub fn best_dist(&self) -> Option<usize> {
        self.frontier.peek().map(|Reverse(s)| s.dist)
    }

    /// Expand the single best frontier state.
    ///
    /// Pops the minimum `(dist, steps, text)` state, enumerates its
    /// one-step derivatives, and either reports `steps + 1` when the
    /// goal is among them or pushes the surviving candidates back onto
    /// the frontier. Cheap and re-entrant-safe, so a host can wrap the
    /// call in its own loop to impose timeouts.
    pub fn step(&mut self) -> StepOutcome {
        let Some(Reverse(state)) = self.frontier.pop() else {
            return StepOutcome {
                found: None,
                exhausted: true,
            };
        };
        let next_steps = state.steps + 1;

        // Collapse duplicates within this one expansion while keeping
        // enumeration order, so nothing downstream depends on hash
        // iteration order.
        let seg = self.machine.segment(&state.text);
        let mut local: FxHashSet<String> = FxHashSet::default();
        let mut candidates: Vec<String> = Vec::new();
        for derived in self.machine.expand_one(&seg) {
            if local.insert(derived.clone()) {
                candidates.push(derived);
            }
        }

        if candidates.iter().any(|c| c == self.dist.goal()) {
            return StepOutcome {
                found: Some(next_steps),
                exhausted: self.frontier.is_empty(),
            };
        }

        for candidate in candidates {
            // mark visited even when pruned below, so no other path
            // re-expands the same string
            if !self.seen.insert(candidate.clone()) {
                continue;
            }
            if candidate.chars().count() > self.goal_len {
                continue;
            }
            let d = self.dist.distance(&candidate);
            if d > state.dist {
                continue;
            }
            self.frontier.push(Reverse(State {
                dist: d,
                steps: next_steps,
                text: candidate,
            }));
        }

        StepOutcome {
            found: None,
            exhausted: self.frontier.is_empty(),
        }
    }

    /// Drive [`Search::step`] until the frontier is exhausted or the
    /// budget elapses, retaining the minimum found derivation length.
    pub fn run(&mut self, config: &SearchConfig) -> SearchReport {
        let start_time = Instant::now();
        let deadline = start_time + config.timeout;

        let mut best: Option<usize> = None;
        let mut rounds = 0;
        while !self.frontier.is_empty() {
            if Instant::now() > deadline {
                break;
            }
            rounds += 1;
            if let Some(found) = self.step().found {
                if best.map_or(true, |b| found < b) {
                    best = Some(found);
                }
            }
        }

        SearchReport {
            steps: best,
            exhausted: self.frontier.is_empty(),
            rounds,
            time_elapsed_ms: start_time.elapsed().as_millis() as u64,
        }
    }
}

/// Shortest derivation of `goal` from `start` as a hard result: `Ok(0)`
/// when they already coincide, `Err(SearchExhausted)` when the pruned
/// space contains no derivation within the budget.
pub fn shortest_derivation(
    machine: &Machine,
    start: &str,
    goal: &str,
    config: &SearchConfig,
) -> Result<usize, Error> {
    if start == goal {
        return Ok(0);
    }
    let mut search = Search::new(machine, start, goal);
    search
        .run(config)
        .steps
        .ok_or_else(|| Error::SearchExhausted {
            goal: goal.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleSet;

    fn build_machine(rules: &[(&str, &str)]) -> Machine {
        Machine::new(rules.iter().copied().collect::<RuleSet>()).unwrap()
    }

    fn medicine_machine() -> Machine {
        build_machine(&[
            ("e", "H"),
            ("e", "O"),
            ("H", "HO"),
            ("H", "OH"),
            ("O", "HH"),
        ])
    }

    #[test]
    fn test_shortest_derivation_hoh() {
        let machine = medicine_machine();
        let steps =
            shortest_derivation(&machine, "e", "HOH", &SearchConfig::default()).unwrap();
        assert_eq!(steps, 3);
    }

    #[test]
    fn test_shortest_derivation_hohoho() {
        let machine = medicine_machine();
        let steps =
            shortest_derivation(&machine, "e", "HOHOHO", &SearchConfig::default()).unwrap();
        assert_eq!(steps, 6);
    }

    #[test]
    fn test_start_equal_to_goal_is_zero_steps() {
        let machine = medicine_machine();
        let steps = shortest_derivation(&machine, "HOH", "HOH", &SearchConfig::default()).unwrap();
        assert_eq!(steps, 0);
    }

    #[test]
    fn test_unreachable_goal_exhausts() {
        let machine = build_machine(&[("a", "b")]);
        let err =
            shortest_derivation(&machine, "a", "zzz", &SearchConfig::default()).unwrap_err();
        assert!(matches!(err, Error::SearchExhausted { .. }));
    }

    #[test]
    fn test_candidates_longer_than_goal_are_pruned() {
        // the only expansion overshoots the one-character goal
        let machine = build_machine(&[("e", "HH")]);
        let err = shortest_derivation(&machine, "e", "H", &SearchConfig::default()).unwrap_err();
        assert!(matches!(err, Error::SearchExhausted { .. }));
    }

    #[test]
    fn test_first_step_expands_start_symbol() {
        let machine = medicine_machine();
        let mut search = Search::new(&machine, "e", "HOH");
        assert_eq!(search.frontier_len(), 1);

        let outcome = search.step();
        assert_eq!(outcome.found, None);
        assert!(!outcome.exhausted);
        // "e" expands to "H" and "O", both no worse than their parent
        assert_eq!(search.frontier_len(), 2);
    }

    #[test]
    fn test_report_marks_exhaustion() {
        let machine = medicine_machine();
        let mut search = Search::new(&machine, "e", "HOH");
        let report = search.run(&SearchConfig::default());

        assert_eq!(report.steps, Some(3));
        assert!(report.exhausted);
        assert!(report.rounds > 0);
    }

    #[test]
    fn test_search_is_deterministic() {
        let machine = medicine_machine();
        for goal in ["HOH", "HOHOHO"] {
            let first = shortest_derivation(&machine, "e", goal, &SearchConfig::default());
            let second = shortest_derivation(&machine, "e", goal, &SearchConfig::default());
            assert_eq!(first.unwrap(), second.unwrap());
        }
    }

    #[test]
    fn test_independent_searches_do_not_interfere() {
        let machine = medicine_machine();
        let mut a = Search::new(&machine, "e", "HOH");
        let mut b = Search::new(&machine, "e", "HOHOHO");

        let ra = a.run(&SearchConfig::default());
        let rb = b.run(&SearchConfig::default());
        assert_eq!(ra.steps, Some(3));
        assert_eq!(rb.steps, Some(6));
    }
}
