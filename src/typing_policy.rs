use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// What a wrong keystroke does to the cursor
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// record the miss and keep the cursor until the right key is typed
    #[default]
    HoldOnError,
    /// record the miss and move on regardless
    AdvanceAlways,
}

/// Position and counters the reducer works over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    pub cursor: usize,
    pub correct: usize,
    pub incorrect: usize,
}

impl Tally {
    pub fn attempts(&self) -> usize {
        self.correct + self.incorrect
    }
}

/// Result of judging one keystroke against the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Judgement {
    pub position: usize,
    pub expected: char,
    pub outcome: Outcome,
    pub next: Tally,
}

/// Judge `typed` against the character at the cursor and compute the next
/// tally. Returns `None` when the cursor is already past the end.
pub fn reduce(tally: Tally, target: &[char], typed: char, policy: ErrorPolicy) -> Option<Judgement> {
    let expected = *target.get(tally.cursor)?;

    let (outcome, next) = if typed == expected {
        (
            Outcome::Correct,
            Tally {
                cursor: tally.cursor + 1,
                correct: tally.correct + 1,
                ..tally
            },
        )
    } else {
        let cursor = match policy {
            ErrorPolicy::HoldOnError => tally.cursor,
            ErrorPolicy::AdvanceAlways => tally.cursor + 1,
        };
        (
            Outcome::Incorrect,
            Tally {
                cursor,
                incorrect: tally.incorrect + 1,
                ..tally
            },
        )
    };

    Some(Judgement {
        position: tally.cursor,
        expected,
        outcome,
        next,
    })
}
