use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::typing_policy::Outcome;

/// Coarse lifecycle stage of a typing session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum Phase {
    #[default]
    Idle,
    Playing,
    Finished,
}

/// Selects which tier of the text corpus a session draws from
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Code,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Code,
    ];

    /// Lowercase key used for corpus file names and config
    pub fn key(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Code => "code",
        }
    }
}

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
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Neon,
    Matrix,
    Cyberpunk,
}

impl Theme {
    pub fn next(&self) -> Theme {
        match self {
            Theme::Neon => Theme::Matrix,
            Theme::Matrix => Theme::Cyberpunk,
            Theme::Cyberpunk => Theme::Neon,
        }
    }
}

/// One accepted keystroke, as recorded in the append-only attempt log
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attempt {
    pub position: usize,
    pub typed: char,
    pub expected: char,
    pub outcome: Outcome,
    pub at_ms: i64,
}

/// How a single character of the target text should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharMark {
    Pending,
    Current,
    Correct,
    /// typed correctly after at least one miss at the same position
    Corrected,
    Incorrect,
}

/// Read surface of a session. Only the store writes these fields.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub(crate) phase: Phase,
    pub(crate) target_text: String,
    pub(crate) target_chars: Vec<char>,
    pub(crate) cursor: usize,
    pub(crate) started_at: Option<i64>,
    pub(crate) ended_at: Option<i64>,
    pub(crate) correct_count: usize,
    pub(crate) incorrect_count: usize,
    pub(crate) wpm: u32,
    pub(crate) accuracy: u8,
    pub(crate) difficulty: Difficulty,
    pub(crate) theme: Theme,
    pub(crate) results_visible: bool,
    pub(crate) attempts: Vec<Attempt>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            target_text: String::new(),
            target_chars: Vec::new(),
            cursor: 0,
            started_at: None,
            ended_at: None,
            correct_count: 0,
            incorrect_count: 0,
            wpm: 0,
            accuracy: 100,
            difficulty: Difficulty::default(),
            theme: Theme::default(),
            results_visible: false,
            attempts: Vec::new(),
        }
    }
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn target_text(&self) -> &str {
        &self.target_text
    }

    pub fn target_chars(&self) -> &[char] {
        &self.target_chars
    }

    /// Length of the target text in characters
    pub fn target_len(&self) -> usize {
        self.target_chars.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn started_at(&self) -> Option<i64> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<i64> {
        self.ended_at
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn incorrect_count(&self) -> usize {
        self.incorrect_count
    }

    pub fn wpm(&self) -> u32 {
        self.wpm
    }

    pub fn accuracy(&self) -> u8 {
        self.accuracy
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn results_visible(&self) -> bool {
        self.results_visible
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Character expected at the cursor, if any remain
    pub fn expected_char(&self) -> Option<char> {
        self.target_chars.get(self.cursor).copied()
    }

    /// Classify every character of the target text for rendering.
    ///
    /// Positions behind the cursor take the outcome of their last attempt,
    /// upgraded to `Corrected` when an earlier attempt at the same position
    /// missed. The character at the cursor is `Current` while playing.
    pub fn char_marks(&self) -> Vec<CharMark> {
        let mut marks = vec![CharMark::Pending; self.target_chars.len()];
        let mut missed = vec![false; self.target_chars.len()];

        for attempt in &self.attempts {
            let Some(mark) = marks.get_mut(attempt.position) else {
                continue;
            };
            match attempt.outcome {
                Outcome::Incorrect => {
                    missed[attempt.position] = true;
                    *mark = CharMark::Incorrect;
                }
                Outcome::Correct if missed[attempt.position] => *mark = CharMark::Corrected,
                Outcome::Correct => *mark = CharMark::Correct,
            }
        }

        // a held miss at the cursor is still pending input, not a verdict
        if self.phase == Phase::Playing {
            if let Some(mark) = marks.get_mut(self.cursor) {
                *mark = CharMark::Current;
            }
        }

        marks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(text: &str) -> SessionState {
        SessionState {
            phase: Phase::Playing,
            target_text: text.to_string(),
            target_chars: text.chars().collect(),
            ..SessionState::default()
        }
    }

    fn attempt(position: usize, typed: char, expected: char) -> Attempt {
        Attempt {
            position,
            typed,
            expected,
            outcome: if typed == expected {
                Outcome::Correct
            } else {
                Outcome::Incorrect
            },
            at_ms: 0,
        }
    }

    #[test]
    fn default_state_is_idle_with_full_accuracy() {
        let state = SessionState::default();
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.accuracy(), 100);
        assert_eq!(state.wpm(), 0);
        assert_eq!(state.cursor(), 0);
        assert!(state.ended_at().is_none());
        assert!(!state.results_visible());
    }

    #[test]
    fn target_len_counts_chars_not_bytes() {
        let state = state_with("héllo");
        assert_eq!(state.target_len(), 5);
        assert_eq!(state.expected_char(), Some('h'));
    }

    #[test]
    fn char_marks_track_corrections() {
        let mut state = state_with("abc");
        state.attempts = vec![attempt(0, 'a', 'a'), attempt(1, 'x', 'b'), attempt(1, 'b', 'b')];
        state.cursor = 2;

        assert_eq!(
            state.char_marks(),
            vec![CharMark::Correct, CharMark::Corrected, CharMark::Current]
        );
    }

    #[test]
    fn char_marks_keep_incorrect_when_cursor_moved_past() {
        let mut state = state_with("ab");
        state.attempts = vec![attempt(0, 'x', 'a')];
        state.cursor = 1;

        assert_eq!(
            state.char_marks(),
            vec![CharMark::Incorrect, CharMark::Current]
        );
    }

    #[test]
    fn char_marks_have_no_current_when_finished() {
        let mut state = state_with("a");
        state.attempts = vec![attempt(0, 'a', 'a')];
        state.cursor = 1;
        state.phase = Phase::Finished;

        assert_eq!(state.char_marks(), vec![CharMark::Correct]);
    }

    #[test]
    fn theme_cycles_through_all_variants() {
        assert_eq!(Theme::Neon.next(), Theme::Matrix);
        assert_eq!(Theme::Matrix.next(), Theme::Cyberpunk);
        assert_eq!(Theme::Cyberpunk.next(), Theme::Neon);
    }

    #[test]
    fn difficulty_keys_are_lowercase() {
        let keys: Vec<&str> = Difficulty::ALL.iter().map(|d| d.key()).collect();
        assert_eq!(keys, vec!["easy", "medium", "hard", "code"]);
        assert_eq!(Difficulty::Code.to_string(), "Code");
    }
}
