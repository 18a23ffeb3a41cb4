//! Rewrite-rule representation and line-oriented puzzle input parsing.
//!
//! A puzzle file lists one `<symbol> => <replacement>` rule per line
//! (word characters on both sides, whitespace around `=>` tolerated),
//! then a blank line, then one target string per remaining non-empty
//! line.

use smallvec::SmallVec;

use crate::error::Error;

/// One rewrite rule: a pattern symbol plus its replacement alternatives
/// in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub pattern: String,
    /// Most symbols carry one or two alternatives, so the list lives
    /// inline.
    pub replacements: SmallVec<[String; 2]>,
}

/// Ordered rule table.
///
/// Pattern order is first-appearance order; a line that repeats an
/// already-seen pattern appends to that pattern's alternative list.
/// Immutable once handed to a [`crate::machine::Machine`].
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one `pattern => replacement` pair.
    pub fn push(&mut self, pattern: &str, replacement: &str) {
        if let Some(rule) = self.rules.iter_mut().find(|r| r.pattern == pattern) {
            rule.replacements.push(replacement.to_string());
        } else {
            self.rules.push(Rule {
                pattern: pattern.to_string(),
                replacements: SmallVec::from_iter([replacement.to_string()]),
            });
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut rules = Self::new();
        for (pattern, replacement) in iter {
            rules.push(pattern, replacement);
        }
        rules
    }
}

/// A parsed puzzle: the rule table plus the target strings to query.
#[derive(Debug, Clone)]
pub struct PuzzleInput {
    pub rules: RuleSet,
    pub targets: Vec<String>,
}

/// True for the word-character sequences the rule grammar allows.
fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Parse one rule line of the form `<symbol> => <replacement>`.
fn parse_rule_line(line: &str, line_no: usize) -> Result<(&str, &str), Error> {
    let malformed = || Error::MalformedLine {
        line_no,
        line: line.to_string(),
    };

    let (lhs, rhs) = line.split_once("=>").ok_or_else(malformed)?;
    let (pattern, replacement) = (lhs.trim(), rhs.trim());
    if !is_word(pattern) || !is_word(replacement) {
        return Err(malformed());
    }
    Ok((pattern, replacement))
}

impl PuzzleInput {
    /// Parse a whole puzzle text: rules up to the first blank line,
    /// targets afterwards.
    ///
    /// A line that fails the grammar aborts the run; skipping it could
    /// hide a parsing mismatch.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let mut rules = RuleSet::new();
        let mut lines = text.lines().enumerate();

        for (idx, line) in lines.by_ref() {
            if line.trim().is_empty() {
                break;
            }
            let (pattern, replacement) = parse_rule_line(line, idx + 1)?;
            rules.push(pattern, replacement);
        }

        let mut targets = Vec::new();
        for (idx, line) in lines {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if !is_word(line) {
                return Err(Error::MalformedLine {
                    line_no: idx + 1,
                    line: line.to_string(),
                });
            }
            targets.push(line.to_string());
        }

        Ok(Self { rules, targets })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rules_and_targets() {
        let input = PuzzleInput::parse("H => HO\nH => OH\nO => HH\n\nHOH\nHOHOHO\n").unwrap();

        assert_eq!(input.targets, vec!["HOH", "HOHOHO"]);
        assert_eq!(input.rules.len(), 2);

        let h = &input.rules.rules()[0];
        assert_eq!(h.pattern, "H");
        assert_eq!(h.replacements.as_slice(), ["HO", "OH"]);

        let o = &input.rules.rules()[1];
        assert_eq!(o.pattern, "O");
        assert_eq!(o.replacements.as_slice(), ["HH"]);
    }

    #[test]
    fn test_parse_tolerates_spacing() {
        let input = PuzzleInput::parse("e=>H\ne   =>   O\n\ne\n").unwrap();
        assert_eq!(input.rules.len(), 1);
        assert_eq!(input.rules.rules()[0].replacements.as_slice(), ["H", "O"]);
    }

    #[test]
    fn test_malformed_rule_line_aborts() {
        let err = PuzzleInput::parse("H -> HO\n\nHOH\n").unwrap_err();
        match err {
            Error::MalformedLine { line_no, line } => {
                assert_eq!(line_no, 1);
                assert_eq!(line, "H -> HO");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_replacement_is_malformed() {
        assert!(PuzzleInput::parse("H => \n\nHOH\n").is_err());
    }

    #[test]
    fn test_malformed_target_line_aborts() {
        let err = PuzzleInput::parse("H => HO\n\nHO H\n").unwrap_err();
        assert!(matches!(err, Error::MalformedLine { line_no: 3, .. }));
    }

    #[test]
    fn test_rule_set_from_iter_keeps_declaration_order() {
        let rules: RuleSet = [("H", "HO"), ("O", "HH"), ("H", "OH")].into_iter().collect();
        assert_eq!(rules.rules()[0].pattern, "H");
        assert_eq!(rules.rules()[0].replacements.as_slice(), ["HO", "OH"]);
        assert_eq!(rules.rules()[1].pattern, "O");
    }
}
