//! Domain entities: outcomes and outcome sets

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::domain::error::{DomainError, DomainResult};

/// Separator placed between path segments of a node label (`Coin-Heads-Tails`).
pub const DEFAULT_SEPARATOR: &str = "-";

/// Allowed deviation of an outcome set's total probability from 1.0.
pub const DEFAULT_PROBABILITY_TOLERANCE: f64 = 1e-9;

/// One possible result of a single trial.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub name: String,
    /// Independent probability of this outcome in one trial
    pub probability: f64,
}

impl Outcome {
    /// Create an outcome, rejecting probabilities outside `[0, 1]` (and NaN).
    pub fn new(name: impl Into<String>, probability: f64) -> DomainResult<Self> {
        let name = name.into();
        if !(0.0..=1.0).contains(&probability) {
            return Err(DomainError::InvalidProbability {
                outcome: name,
                value: probability,
            });
        }
        Ok(Self { name, probability })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.probability)
    }
}

/// Parses `NAME=PROB` (as given on the command line).
///
/// The split happens at the last `=`, so names may contain `=` themselves.
impl FromStr for Outcome {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| DomainError::InvalidOutcomeSpec {
            spec: s.to_string(),
            reason: reason.to_string(),
        };

        let (name, prob) = s.rsplit_once('=').ok_or_else(|| invalid("expected NAME=PROB"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid("name is empty"));
        }
        let probability: f64 = prob
            .trim()
            .parse()
            .map_err(|_| invalid("probability is not a number"))?;

        Outcome::new(name, probability)
    }
}

/// Ordered, non-empty collection of outcomes with unique names.
///
/// The order is significant: it fixes sibling order in the tree and therefore
/// the vertical order of nodes in every depth band.
///
/// Whether the probabilities sum to 1 is a precondition checked by whoever
/// collects the input (see [`OutcomeSet::sums_to_one`]), not by the set itself.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeSet {
    outcomes: Vec<Outcome>,
}

impl OutcomeSet {
    pub fn new(outcomes: Vec<Outcome>) -> DomainResult<Self> {
        if outcomes.is_empty() {
            return Err(DomainError::EmptyOutcomeSet);
        }

        let mut seen = HashSet::new();
        for outcome in &outcomes {
            if !seen.insert(outcome.name.as_str()) {
                return Err(DomainError::DuplicateOutcome(outcome.name.clone()));
            }
        }

        Ok(Self { outcomes })
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Outcome> {
        self.outcomes.iter()
    }

    pub fn as_slice(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn total_probability(&self) -> f64 {
        self.outcomes.iter().map(|o| o.probability).sum()
    }

    /// True if the total probability is within `tolerance` of 1.0.
    pub fn sums_to_one(&self, tolerance: f64) -> bool {
        (self.total_probability() - 1.0).abs() <= tolerance
    }
}

impl<'a> IntoIterator for &'a OutcomeSet {
    type Item = &'a Outcome;
    type IntoIter = std::slice::Iter<'a, Outcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}

impl TryFrom<Vec<Outcome>> for OutcomeSet {
    type Error = DomainError;

    fn try_from(outcomes: Vec<Outcome>) -> Result<Self, Self::Error> {
        Self::new(outcomes)
    }
}
