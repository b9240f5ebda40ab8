//! Consensus grade across a panel of grade-level formulas.
//!
//! Each score casts two votes: its value rounded half away from zero and
//! its ceiling. The most-voted grade `g` is reported as the band
//! `(g - 1, g)`, e.g. "9th and 10th grade". When several grades tie for the
//! most votes, the band starts below the lowest of them and extends over any
//! tied grades directly above it.

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::formulas::legacy_round;

/// An inclusive school-grade range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GradeBand {
    /// Lower grade.
    pub lower: u32,
    /// Upper grade.
    pub upper: u32,
}

impl fmt::Display for GradeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} and {} grade",
            ordinal(self.lower),
            ordinal(self.upper)
        )
    }
}

/// English ordinal: `1st`, `2nd`, `3rd`, `4th`, `11th`, `21st`.
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Clamp a score to a non-negative whole grade.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_grade(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

/// Tally the two votes each score casts.
pub fn tally(scores: &[f64]) -> BTreeMap<u32, usize> {
    let mut votes = BTreeMap::new();
    for &score in scores {
        for grade in [to_grade(legacy_round(score, 0)), to_grade(score.ceil())] {
            *votes.entry(grade).or_insert(0) += 1;
        }
    }
    votes
}

/// Consensus band for a panel of grade-level scores.
///
/// Non-finite or negative scores vote for grade 0; an empty panel yields the
/// band `(0, 1)`.
pub fn consensus(scores: &[f64]) -> GradeBand {
    let votes = tally(scores);
    let top = votes.values().copied().max().unwrap_or(0);

    let lowest = votes
        .iter()
        .find(|&(_, &count)| count == top)
        .map_or(0, |(&grade, _)| grade);
    let mut highest = lowest;
    while votes.get(&(highest + 1)) == Some(&top) {
        highest += 1;
    }

    match lowest {
        0 => GradeBand {
            lower: 0,
            upper: highest.max(1),
        },
        g => GradeBand {
            lower: g - 1,
            upper: highest,
        },
    }
}
