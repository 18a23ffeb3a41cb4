//! Goal-fixed Levenshtein distance.
//!
//! The derivation search scores many candidate strings against one
//! fixed goal, so the DP rows are allocated once per goal and reused
//! across calls. The computed value is ordinary Levenshtein distance
//! (unit-cost insertions, deletions, and substitutions).

/// Edit distance to one fixed goal string.
#[derive(Debug, Clone)]
pub struct GoalDistance {
    goal: String,
    goal_chars: Vec<char>,
    prev: Vec<usize>,
    curr: Vec<usize>,
}

impl GoalDistance {
    pub fn new(goal: &str) -> Self {
        let goal_chars: Vec<char> = goal.chars().collect();
        let width = goal_chars.len() + 1;
        Self {
            goal: goal.to_string(),
            goal_chars,
            prev: vec![0; width],
            curr: vec![0; width],
        }
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    /// Goal length in characters.
    pub fn goal_len(&self) -> usize {
        self.goal_chars.len()
    }

    /// Levenshtein distance from `s` to the goal.
    ///
    /// Zero exactly when `s` equals the goal; equality short-circuits
    /// the DP.
    pub fn distance(&mut self, s: &str) -> usize {
        if s == self.goal {
            return 0;
        }
        let m = self.goal_chars.len();
        if m == 0 {
            return s.chars().count();
        }
        if s.is_empty() {
            return m;
        }

        for (j, cell) in self.prev.iter_mut().enumerate() {
            *cell = j;
        }

        for (i, sc) in s.chars().enumerate() {
            self.curr[0] = i + 1;
            for (j, &gc) in self.goal_chars.iter().enumerate() {
                let cost = usize::from(sc != gc);
                self.curr[j + 1] = (self.curr[j] + 1)
                    .min(self.prev[j + 1] + 1)
                    .min(self.prev[j] + cost);
            }
            std::mem::swap(&mut self.prev, &mut self.curr);
        }

        // the swap leaves the final row in `prev`
        self.prev[m]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(s: &str, goal: &str) -> usize {
        GoalDistance::new(goal).distance(s)
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        for s in ["", "a", "abc", "HOHOHO"] {
            assert_eq!(dist(s, s), 0);
        }
    }

    #[test]
    fn test_known_pairs() {
        assert_eq!(dist("", "abc"), 3);
        assert_eq!(dist("abc", ""), 3);
        assert_eq!(dist("kitten", "sitting"), 3);
        assert_eq!(dist("sitting", "kitten"), 3);
        assert_eq!(dist("H", "HOH"), 2);
        assert_eq!(dist("HH", "HOH"), 1);
    }

    #[test]
    fn test_triangle_inequality() {
        let triples = [
            ("abc", "abd", "xbd"),
            ("HOH", "HOHOHO", "e"),
            ("kitten", "sitting", "kitchen"),
        ];
        for (a, b, c) in triples {
            assert!(dist(a, c) <= dist(a, b) + dist(b, c));
        }
    }

    #[test]
    fn test_rows_are_reusable_across_calls() {
        let mut d = GoalDistance::new("sitting");
        assert_eq!(d.distance("kitten"), 3);
        assert_eq!(d.distance(""), 7);
        assert_eq!(d.distance("sitting"), 0);
        assert_eq!(d.distance("kitten"), 3);
    }
}
