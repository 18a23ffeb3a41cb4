//! The rewrite engine: multi-pattern matching, segmentation, and
//! one-step expansion.
//!
//! The engine replaces without regard for surrounding characters: given
//! `H => OO`, the string `H2O` becomes `OO2O`. Matching scans left to
//! right, keeps non-overlapping occurrences, and resolves same-position
//! ties by rule declaration order, so every enumeration this module
//! produces is reproducible.

use rustc_hash::FxHashSet;

use crate::error::Error;
use crate::rules::RuleSet;

/// Compiled rewrite engine. Owns the rule table plus a first-byte index
/// over patterns so one scan of the input only tries the rules that can
/// start at each position.
#[derive(Debug, Clone)]
pub struct Machine {
    rules: RuleSet,
    /// Rule indices bucketed by pattern first byte, declaration order
    /// preserved within each bucket.
    index: [Vec<usize>; 256],
}

/// One matched pattern occurrence inside a [`Segmentation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence<'a> {
    /// The matched text, borrowed from the segmented string.
    pub text: &'a str,
    /// Index of the matching rule in the rule table.
    pub rule: usize,
}

/// Decomposition of a string into alternating literal gaps and matched
/// pattern occurrences.
///
/// Invariant: `gaps.len() == occurrences.len() + 1`, and interleaving
/// them (gap, occurrence, gap, ..., gap) reconstructs the input exactly.
#[derive(Debug, Clone)]
pub struct Segmentation<'a> {
    pub gaps: Vec<&'a str>,
    pub occurrences: Vec<Occurrence<'a>>,
}

impl Segmentation<'_> {
    /// Reassemble the segmented string.
    pub fn reconstruct(&self) -> String {
        let mut out = String::new();
        for (i, gap) in self.gaps.iter().enumerate() {
            out.push_str(gap);
            if let Some(occ) = self.occurrences.get(i) {
                out.push_str(occ.text);
            }
        }
        out
    }
}

impl Machine {
    /// Compile a rule set into a matcher.
    ///
    /// Fails on an empty rule set or an empty pattern symbol; neither
    /// admits a meaningful matcher.
    pub fn new(rules: RuleSet) -> Result<Self, Error> {
        if rules.is_empty() {
            return Err(Error::Configuration {
                reason: "rule set is empty".to_string(),
            });
        }

        let mut index: [Vec<usize>; 256] = std::array::from_fn(|_| Vec::new());
        for (i, rule) in rules.rules().iter().enumerate() {
            let Some(&first) = rule.pattern.as_bytes().first() else {
                return Err(Error::Configuration {
                    reason: format!("rule {i} has an empty pattern symbol"),
                });
            };
            index[first as usize].push(i);
        }

        Ok(Self { rules, index })
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Scan `s` left to right for a maximal set of non-overlapping rule
    /// occurrences. At each position the first-declared matching rule
    /// wins and the scan resumes after the match.
    pub fn segment<'a>(&self, s: &'a str) -> Segmentation<'a> {
        let bytes = s.as_bytes();
        let mut gaps = Vec::new();
        let mut occurrences = Vec::new();

        let mut gap_start = 0;
        let mut i = 0;
        while i < bytes.len() {
            let mut matched = None;
            for &r in &self.index[bytes[i] as usize] {
                let pattern = self.rules.rules()[r].pattern.as_str();
                if s[i..].starts_with(pattern) {
                    matched = Some((r, pattern.len()));
                    break;
                }
            }

            if let Some((rule, len)) = matched {
                gaps.push(&s[gap_start..i]);
                occurrences.push(Occurrence {
                    text: &s[i..i + len],
                    rule,
                });
                i += len;
                gap_start = i;
            } else {
                // advance one whole character, not one byte
                i += s[i..].chars().next().map_or(1, char::len_utf8);
            }
        }
        gaps.push(&s[gap_start..]);

        Segmentation { gaps, occurrences }
    }

    /// Enumerate every one-step derivative of a segmentation.
    ///
    /// Yields exactly one string per (occurrence, alternative) pair:
    /// occurrence index ascending, then alternative declaration order.
    /// Duplicates across different occurrences are preserved; collapsing
    /// them is the caller's business. Each call returns a fresh,
    /// restartable iterator over the same segmentation.
    pub fn expand_one<'a>(&'a self, seg: &'a Segmentation<'a>) -> Expansions<'a> {
        Expansions::new(self, seg)
    }

    /// Count the distinct one-step derivatives of `s`.
    pub fn distinct_derivatives(&self, s: &str) -> usize {
        let seg = self.segment(s);
        let mut seen: FxHashSet<String> = FxHashSet::default();
        for derived in self.expand_one(&seg) {
            seen.insert(derived);
        }
        seen.len()
    }
}

/// Lazy enumeration of one-step derivatives. See
/// [`Machine::expand_one`] for the ordering contract.
pub struct Expansions<'a> {
    machine: &'a Machine,
    seg: &'a Segmentation<'a>,
    /// Everything before the current occurrence, materialized once per
    /// occurrence.
    prefix: String,
    /// Everything after the current occurrence.
    suffix: String,
    occurrence: usize,
    alternative: usize,
}

impl<'a> Expansions<'a> {
    fn new(machine: &'a Machine, seg: &'a Segmentation<'a>) -> Self {
        Self {
            machine,
            seg,
            prefix: seg.gaps.first().copied().unwrap_or_default().to_string(),
            suffix: Self::suffix_after(seg, 0),
            occurrence: 0,
            alternative: 0,
        }
    }

    /// The tail of the segmentation strictly after occurrence `i`.
    fn suffix_after(seg: &Segmentation<'_>, i: usize) -> String {
        let mut out = String::new();
        for j in (i + 1)..seg.gaps.len() {
            out.push_str(seg.gaps[j]);
            if let Some(occ) = seg.occurrences.get(j) {
                out.push_str(occ.text);
            }
        }
        out
    }
}

impl Iterator for Expansions<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while self.occurrence < self.seg.occurrences.len() {
            let occ = self.seg.occurrences[self.occurrence];
            let replacements = &self.machine.rules.rules()[occ.rule].replacements;

            if let Some(rep) = replacements.get(self.alternative) {
                self.alternative += 1;
                let mut out =
                    String::with_capacity(self.prefix.len() + rep.len() + self.suffix.len());
                out.push_str(&self.prefix);
                out.push_str(rep);
                out.push_str(&self.suffix);
                return Some(out);
            }

            // alternatives exhausted, shift to the next occurrence
            self.occurrence += 1;
            self.alternative = 0;
            if self.occurrence < self.seg.occurrences.len() {
                self.prefix.push_str(occ.text);
                self.prefix.push_str(self.seg.gaps[self.occurrence]);
                self.suffix = Self::suffix_after(self.seg, self.occurrence);
            }
        }
        None
    }
}
