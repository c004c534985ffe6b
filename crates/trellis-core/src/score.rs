//! The score scale used to rate arguable parts of a topic.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when text does not name a score.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid score `{0}`, expected `-` or 1 through 10")]
pub struct ParseScoreError(String);

/// A score on the ordered scale `-, 1, 2, …, 10`.
///
/// `-` ([`Score::UNSCORED`]) is the "no score" sentinel and sorts lowest.
///
/// # Examples
///
/// ```
/// use trellis_core::score::Score;
///
/// let score: Score = "7".parse().unwrap();
/// assert_eq!(score, Score::new(7).unwrap());
/// assert!(Score::UNSCORED < score);
/// assert_eq!(Score::ALL.len(), 11);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Score(u8);

impl Score {
    /// The "no score" sentinel.
    pub const UNSCORED: Score = Score(0);

    /// Highest rating on the scale.
    pub const MAX: u8 = 10;

    /// Every score, in ascending order.
    pub const ALL: [Score; 11] = [
        Score(0),
        Score(1),
        Score(2),
        Score(3),
        Score(4),
        Score(5),
        Score(6),
        Score(7),
        Score(8),
        Score(9),
        Score(10),
    ];

    /// Create a rated score. Returns `None` outside `1..=10`.
    pub fn new(rating: u8) -> Option<Self> {
        (1..=Self::MAX).contains(&rating).then_some(Self(rating))
    }

    /// The numeric rating, or `None` for [`Score::UNSCORED`].
    pub fn rating(self) -> Option<u8> {
        (self.0 != 0).then_some(self.0)
    }

    /// Check whether this is the "no score" sentinel.
    pub fn is_unscored(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rating() {
            Some(rating) => write!(f, "{rating}"),
            None => f.write_str("-"),
        }
    }
}

impl FromStr for Score {
    type Err = ParseScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            return Ok(Self::UNSCORED);
        }
        s.parse::<u8>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| ParseScoreError(s.to_string()))
    }
}

impl From<Score> for String {
    fn from(score: Score) -> Self {
        score.to_string()
    }
}

impl TryFrom<String> for Score {
    type Error = ParseScoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
