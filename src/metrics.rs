//! Pure speed and accuracy math.
//!
//! Everything in here is a function of counts and timestamps; nothing reads
//! the clock, so the store decides which instant a value is evaluated at.

/// Standard typing convention: five characters make a word
pub const CHARS_PER_WORD: f64 = 5.0;

const MS_PER_MINUTE: f64 = 60_000.0;

/// Milliseconds between two instants, never negative
pub fn elapsed_ms(started_at_ms: i64, now_ms: i64) -> i64 {
    (now_ms - started_at_ms).max(0)
}

/// Words per minute from correct characters over the elapsed span.
///
/// Zero elapsed time yields 0 rather than dividing by zero.
pub fn wpm(correct_count: usize, started_at_ms: i64, now_ms: i64) -> u32 {
    let elapsed = elapsed_ms(started_at_ms, now_ms);
    if elapsed == 0 || correct_count == 0 {
        return 0;
    }
    let minutes = elapsed as f64 / MS_PER_MINUTE;
    ((correct_count as f64 / CHARS_PER_WORD) / minutes).round() as u32
}

/// Percentage of attempts that matched; 100 when nothing was attempted
pub fn accuracy(correct_count: usize, incorrect_count: usize) -> u8 {
    let total = correct_count + incorrect_count;
    if total == 0 {
        return 100;
    }
    ((correct_count as f64 / total as f64) * 100.0).round() as u8
}

/// Snapshot of the derived statistics at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics {
    pub wpm: u32,
    pub accuracy: u8,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            wpm: 0,
            accuracy: 100,
        }
    }
}

impl Metrics {
    pub fn compute(
        correct_count: usize,
        incorrect_count: usize,
        started_at_ms: Option<i64>,
        now_ms: i64,
    ) -> Self {
        Self {
            wpm: started_at_ms.map_or(0, |start| wpm(correct_count, start, now_ms)),
            accuracy: accuracy(correct_count, incorrect_count),
        }
    }
}

/// Rank shown on the results screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum PerformanceLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
    Legendary,
}

pub fn performance_level(wpm: u32) -> PerformanceLevel {
    match wpm {
        80.. => PerformanceLevel::Legendary,
        60..=79 => PerformanceLevel::Expert,
        40..=59 => PerformanceLevel::Advanced,
        25..=39 => PerformanceLevel::Intermediate,
        _ => PerformanceLevel::Beginner,
    }
}

/// Accuracy-weighted speed
pub fn score(wpm: u32, accuracy: u8) -> u32 {
    wpm * accuracy as u32 / 100
}

pub fn streak(wpm: u32) -> u32 {
    wpm / 10
}

/// `m:ss` rendering of whole seconds
pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

pub fn share_text(wpm: u32, accuracy: u8) -> String {
    format!("I just typed at {wpm} WPM with {accuracy}% accuracy! Try to beat my score!")
}
