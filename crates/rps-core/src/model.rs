//! Moves and the rule that decides between two of them.
//!
//! There is exactly one rule set, so it's a plain function over a closed
//! enum rather than a trait object. `match` on `(Move, Move)` lets the
//! compiler check that every pair is covered.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::MatchError;

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// One of the three legal choices.
///
/// The variants have no meaningful order. Use [`resolve`] to compare two
/// moves, never `<`/`>` (which is why `PartialOrd` isn't derived).
///
/// On the wire a move is its upper-case name: `"ROCK"`, `"PAPER"`,
/// `"SCISSORS"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    /// Every legal move.
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// The move this one defeats.
    ///
    /// ```text
    /// Rock ──beats──→ Scissors ──beats──→ Paper ──beats──→ Rock
    /// ```
    pub fn beats(self) -> Move {
        match self {
            Move::Rock => Move::Scissors,
            Move::Scissors => Move::Paper,
            Move::Paper => Move::Rock,
        }
    }

    /// The upper-case name used on the wire and in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Move::Rock => "ROCK",
            Move::Paper => "PAPER",
            Move::Scissors => "SCISSORS",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a move token from user input.
///
/// Matching is case-insensitive but otherwise exact: `"rock"` and
/// `"Rock"` parse, `" rock "` does not. Anything else is
/// [`MatchError::InvalidMove`].
impl FromStr for Move {
    type Err = MatchError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Move::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| MatchError::InvalidMove(token.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// The result of comparing a first move against a second one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    FirstWins,
    SecondWins,
    Tie,
}

impl Outcome {
    /// The outcome seen from the other side: `resolve(b, a)` is always
    /// `resolve(a, b).flip()`.
    pub fn flip(self) -> Outcome {
        match self {
            Outcome::FirstWins => Outcome::SecondWins,
            Outcome::SecondWins => Outcome::FirstWins,
            Outcome::Tie => Outcome::Tie,
        }
    }
}

/// Decides between two moves.
///
/// Equal moves tie. Otherwise the first move wins iff it beats the second.
pub fn resolve(first: Move, second: Move) -> Outcome {
    if first == second {
        Outcome::Tie
    } else if first.beats() == second {
        Outcome::FirstWins
    } else {
        Outcome::SecondWins
    }
}
