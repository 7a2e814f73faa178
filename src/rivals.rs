//! Locally simulated opponents.
//!
//! Rivals are plain roster entries driven through the store's
//! `update_player` action, the same entry point a network transport would
//! use to mirror remote sessions.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::metrics::CHARS_PER_WORD;
use crate::players::{Player, PlayerPatch};
use crate::store::SessionStore;

const RIVAL_NAMES: [&str; 8] = [
    "Nova", "Glitch", "Cipher", "Pixel", "Vector", "Byte", "Echo", "Flux",
];

/// A simulated roster entry typing at a fixed pace
#[derive(Debug, Clone, PartialEq)]
pub struct Rival {
    pub player_id: String,
    pub target_wpm: u32,
    pub accuracy: u8,
}

#[derive(Debug, Clone, Default)]
pub struct RivalPack {
    rivals: Vec<Rival>,
}

impl RivalPack {
    /// Add `count` rivals with random pace and accuracy to the roster
    pub fn spawn<R: Rng + ?Sized>(store: &mut SessionStore, count: usize, rng: &mut R) -> Self {
        let mut names = RIVAL_NAMES.to_vec();
        names.shuffle(rng);

        let rivals = (0..count)
            .map(|i| {
                let base = names[i % names.len()];
                let name = if i < names.len() {
                    base.to_string()
                } else {
                    format!("{base} {}", i / names.len() + 1)
                };
                let player = Player::new(name);
                let rival = Rival {
                    player_id: player.id.clone(),
                    target_wpm: rng.gen_range(25..=95),
                    accuracy: rng.gen_range(85..=100),
                };
                store.add_player(player);
                rival
            })
            .collect();

        Self { rivals }
    }

    pub fn rivals(&self) -> &[Rival] {
        &self.rivals
    }

    pub fn is_empty(&self) -> bool {
        self.rivals.is_empty()
    }

    /// Put every rival back on the start line
    pub fn reset(&self, store: &mut SessionStore) {
        let patch = PlayerPatch {
            wpm: Some(0),
            accuracy: Some(100),
            progress: Some(0.0),
            is_finished: Some(false),
            ..Default::default()
        };
        for rival in &self.rivals {
            store.update_player(&rival.player_id, &patch);
        }
    }

    /// Move every rival to where its pace puts it after `elapsed_ms`
    pub fn advance(&self, store: &mut SessionStore, elapsed_ms: i64, text_len: usize) {
        for rival in &self.rivals {
            let progress = simulated_progress(rival.target_wpm, elapsed_ms, text_len);
            store.update_player(
                &rival.player_id,
                &PlayerPatch {
                    wpm: Some(if elapsed_ms > 0 { rival.target_wpm } else { 0 }),
                    accuracy: Some(rival.accuracy),
                    progress: Some(progress),
                    is_finished: Some(progress >= 100.0),
                    ..Default::default()
                },
            );
        }
    }
}

/// Percent of a `text_len` passage typed at `target_wpm` after `elapsed_ms`
pub fn simulated_progress(target_wpm: u32, elapsed_ms: i64, text_len: usize) -> f64 {
    if text_len == 0 || elapsed_ms <= 0 {
        return 0.0;
    }
    let minutes = elapsed_ms as f64 / 60_000.0;
    let typed = target_wpm as f64 * CHARS_PER_WORD * minutes;
    (typed / text_len as f64 * 100.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn progress_follows_pace() {
        // 60 wpm is 300 chars a minute, so 150 chars take 30 seconds
        assert_eq!(simulated_progress(60, 15_000, 150), 50.0);
        assert_eq!(simulated_progress(60, 30_000, 150), 100.0);
        assert_eq!(simulated_progress(60, 90_000, 150), 100.0);
    }

    #[test]
    fn progress_zero_before_start_or_for_empty_text() {
        assert_eq!(simulated_progress(60, 0, 150), 0.0);
        assert_eq!(simulated_progress(60, 1_000, 0), 0.0);
    }

    #[test]
    fn spawn_adds_rivals_to_roster() {
        let mut store = SessionStore::with_clock(ManualClock::new(0));
        store.join_room("r", "Me");
        let mut rng = StdRng::seed_from_u64(1);

        let pack = RivalPack::spawn(&mut store, 3, &mut rng);

        assert_eq!(pack.rivals().len(), 3);
        assert_eq!(store.players().len(), 4);
        for rival in pack.rivals() {
            assert!((25..=95).contains(&rival.target_wpm));
            assert!((85..=100).contains(&rival.accuracy));
            assert!(store.registry().get(&rival.player_id).is_some());
        }
    }

    #[test]
    fn spawn_more_than_names_still_unique() {
        let mut store = SessionStore::with_clock(ManualClock::new(0));
        let mut rng = StdRng::seed_from_u64(3);
        let pack = RivalPack::spawn(&mut store, RIVAL_NAMES.len() + 2, &mut rng);

        let mut names: Vec<&str> = store.players().iter().map(|p| p.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), pack.rivals().len());
    }

    #[test]
    fn advance_and_reset_drive_roster_entries() {
        let mut store = SessionStore::with_clock(ManualClock::new(0));
        let mut rng = StdRng::seed_from_u64(9);
        let pack = RivalPack::spawn(&mut store, 2, &mut rng);

        pack.advance(&mut store, 10 * 60_000, 100);
        for p in store.players() {
            assert_eq!(p.progress, 100.0);
            assert!(p.is_finished);
            assert!(p.wpm > 0);
        }

        pack.reset(&mut store);
        for p in store.players() {
            assert_eq!(p.progress, 0.0);
            assert!(!p.is_finished);
            assert_eq!(p.wpm, 0);
        }
    }
}
