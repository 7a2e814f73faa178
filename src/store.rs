use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::error::ActionRejected;
use crate::metrics::{self, Metrics};
use crate::players::{Player, PlayerPatch, PlayerRegistry};
use crate::session::{Attempt, CharMark, Difficulty, Phase, SessionState, Theme};
use crate::typing_policy::{reduce, ErrorPolicy, Tally};

/// The single authority over a typing session and the player roster.
///
/// Every change goes through one of the action methods below. Invalid calls
/// (wrong phase, empty text, unknown player) are absorbed and logged rather
/// than returned, so a front end can fire actions without guarding each one.
pub struct SessionStore {
    clock: Box<dyn Clock>,
    policy: ErrorPolicy,
    state: SessionState,
    registry: PlayerRegistry,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("policy", &self.policy)
            .field("state", &self.state)
            .field("registry", &self.registry)
            .finish()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    pub fn with_clock<C: Clock>(clock: C) -> Self {
        Self {
            clock: Box::new(clock),
            policy: ErrorPolicy::default(),
            state: SessionState::default(),
            registry: PlayerRegistry::new(),
        }
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    // ---------------------------------------------------------------------
    // Session actions
    // ---------------------------------------------------------------------

    pub fn start_session(&mut self, text: impl Into<String>) {
        let text = text.into();
        absorb(self.try_start_session(text));
    }

    fn try_start_session(&mut self, text: String) -> Result<(), ActionRejected> {
        if text.is_empty() {
            return Err(ActionRejected::EmptyText);
        }

        let now = self.clock.now_ms();
        let previous = self.state.phase;
        self.state = SessionState {
            phase: Phase::Playing,
            target_chars: text.chars().collect(),
            target_text: text,
            started_at: Some(now),
            difficulty: self.state.difficulty,
            theme: self.state.theme,
            ..SessionState::default()
        };

        info!(
            from = %previous,
            chars = self.state.target_len(),
            difficulty = %self.state.difficulty,
            "session started"
        );
        Ok(())
    }

    pub fn submit_char(&mut self, typed: char) {
        absorb(self.try_submit_char(typed));
    }

    fn try_submit_char(&mut self, typed: char) -> Result<(), ActionRejected> {
        if self.state.phase != Phase::Playing {
            return Err(ActionRejected::InvalidPhase {
                action: "submit_char",
                phase: self.state.phase,
            });
        }

        let tally = Tally {
            cursor: self.state.cursor,
            correct: self.state.correct_count,
            incorrect: self.state.incorrect_count,
        };
        let Some(judgement) = reduce(tally, &self.state.target_chars, typed, self.policy) else {
            // cursor already at the end; completion would have fired
            return Err(ActionRejected::InvalidPhase {
                action: "submit_char",
                phase: self.state.phase,
            });
        };

        let now = self.clock.now_ms();
        self.state.attempts.push(Attempt {
            position: judgement.position,
            typed,
            expected: judgement.expected,
            outcome: judgement.outcome,
            at_ms: now,
        });
        self.state.cursor = judgement.next.cursor;
        self.state.correct_count = judgement.next.correct;
        self.state.incorrect_count = judgement.next.incorrect;
        self.refresh_metrics(now);

        debug!(
            position = judgement.position,
            ?typed,
            outcome = ?judgement.outcome,
            cursor = self.state.cursor,
            "keystroke"
        );

        if self.state.cursor == self.state.target_len() {
            self.end_session();
        }
        Ok(())
    }

    /// Force the session to finish. Only meaningful while playing.
    pub fn end_session(&mut self) {
        absorb(self.try_end_session());
    }

    fn try_end_session(&mut self) -> Result<(), ActionRejected> {
        if self.state.phase != Phase::Playing {
            return Err(ActionRejected::InvalidPhase {
                action: "end_session",
                phase: self.state.phase,
            });
        }

        let now = self.clock.now_ms();
        self.state.phase = Phase::Finished;
        self.state.ended_at = Some(now);
        self.refresh_metrics(now);
        self.state.results_visible = true;

        info!(
            wpm = self.state.wpm,
            accuracy = self.state.accuracy,
            completed = self.state.cursor == self.state.target_len(),
            "session finished"
        );
        Ok(())
    }

    /// Back to idle from any phase. Calling it twice is the same as once.
    pub fn reset_session(&mut self) {
        if self.state.phase != Phase::Idle {
            debug!(from = %self.state.phase, "session reset");
        }
        self.state = SessionState {
            difficulty: self.state.difficulty,
            theme: self.state.theme,
            ..SessionState::default()
        };
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.state.difficulty = difficulty;
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.state.theme = theme;
    }

    fn refresh_metrics(&mut self, now_ms: i64) {
        let Metrics { wpm, accuracy } = Metrics::compute(
            self.state.correct_count,
            self.state.incorrect_count,
            self.state.started_at,
            now_ms,
        );
        self.state.wpm = wpm;
        self.state.accuracy = accuracy;
    }

    // ---------------------------------------------------------------------
    // Derived reads
    // ---------------------------------------------------------------------

    /// Share of the target text behind the cursor, 0 to 100
    pub fn progress_percent(&self) -> f64 {
        let len = self.state.target_len();
        if len == 0 {
            return 0.0;
        }
        self.state.cursor as f64 / len as f64 * 100.0
    }

    /// Time spent in the current session: frozen once finished
    pub fn elapsed_ms(&self) -> i64 {
        match (self.state.phase, self.state.started_at) {
            (Phase::Playing, Some(start)) => metrics::elapsed_ms(start, self.clock.now_ms()),
            (Phase::Finished, Some(start)) => {
                metrics::elapsed_ms(start, self.state.ended_at.unwrap_or(start))
            }
            _ => 0,
        }
    }

    /// WPM evaluated at "now" for live display; does not touch the state
    pub fn live_wpm(&self) -> u32 {
        match self.state.phase {
            Phase::Playing => {
                Metrics::compute(
                    self.state.correct_count,
                    self.state.incorrect_count,
                    self.state.started_at,
                    self.clock.now_ms(),
                )
                .wpm
            }
            _ => self.state.wpm,
        }
    }

    pub fn char_marks(&self) -> Vec<CharMark> {
        self.state.char_marks()
    }

    // ---------------------------------------------------------------------
    // Roster actions
    // ---------------------------------------------------------------------

    pub fn join_room(&mut self, room_id: impl Into<String>, player_name: impl Into<String>) {
        let room_id = room_id.into();
        let player = self.registry.join_room(room_id.clone(), player_name);
        info!(room = %room_id, player = %player.name, id = %player.id, "joined room");
    }

    pub fn add_player(&mut self, player: Player) {
        debug!(id = %player.id, name = %player.name, "player added");
        self.registry.add_player(player);
    }

    pub fn remove_player(&mut self, id: &str) {
        if let Some(player) = absorb(self.registry.remove_player(id)) {
            debug!(id = %player.id, name = %player.name, "player removed");
        }
    }

    pub fn update_player(&mut self, id: &str, patch: &PlayerPatch) {
        absorb(self.registry.update_player(id, patch));
    }

    pub fn players(&self) -> &[Player] {
        self.registry.players()
    }

    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    pub fn leaderboard(&self) -> Vec<&Player> {
        self.registry.leaderboard()
    }
}

fn absorb<T>(result: Result<T, ActionRejected>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(rejected) => {
            debug!(%rejected, "action absorbed");
            None
        }
    }
}
