use itertools::Itertools;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ActionRejected;

/// A roster entry mirroring some session's metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub avatar_url: String,
    pub wpm: u32,
    pub accuracy: u8,
    /// 0 to 100
    pub progress: f64,
    pub is_finished: bool,
}

impl Player {
    /// Fresh player with a generated id and zeroed metrics
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: Uuid::new_v4().simple().to_string(),
            avatar_url: avatar_url_for(&name),
            name,
            wpm: 0,
            accuracy: 100,
            progress: 0.0,
            is_finished: false,
        }
    }
}

pub fn avatar_url_for(name: &str) -> String {
    format!("https://api.dicebear.com/7.x/avataaars/svg?seed={name}")
}

/// Partial update applied by `update_player`; `None` leaves a field alone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerPatch {
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub wpm: Option<u32>,
    pub accuracy: Option<u8>,
    pub progress: Option<f64>,
    pub is_finished: Option<bool>,
}

impl PlayerPatch {
    pub fn apply(&self, player: &mut Player) {
        if let Some(name) = &self.name {
            player.name = name.clone();
        }
        if let Some(avatar_url) = &self.avatar_url {
            player.avatar_url = avatar_url.clone();
        }
        if let Some(wpm) = self.wpm {
            player.wpm = wpm;
        }
        if let Some(accuracy) = self.accuracy {
            player.accuracy = clamp_accuracy(accuracy);
        }
        if let Some(progress) = self.progress {
            player.progress = clamp_progress(progress);
        }
        if let Some(is_finished) = self.is_finished {
            player.is_finished = is_finished;
        }
    }
}

fn clamp_accuracy(accuracy: u8) -> u8 {
    accuracy.min(100)
}

/// Percent in [0, 100]; NaN counts as no progress
fn clamp_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 100.0)
    }
}

/// Local roster for the multiplayer stub.
///
/// Entries are keyed by id and only change through whole or partial
/// replacement; nothing outside hands back a `&mut Player`.
#[derive(Debug, Clone, Default)]
pub struct PlayerRegistry {
    room_id: Option<String>,
    local_player_id: Option<String>,
    players: Vec<Player>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the local player and make it the whole roster
    pub fn join_room(&mut self, room_id: impl Into<String>, player_name: impl Into<String>) -> &Player {
        let player = Player::new(player_name);
        self.room_id = Some(room_id.into());
        self.local_player_id = Some(player.id.clone());
        self.players = vec![player];
        &self.players[0]
    }

    /// Append a player, replacing any existing entry with the same id
    pub fn add_player(&mut self, mut player: Player) {
        player.accuracy = clamp_accuracy(player.accuracy);
        player.progress = clamp_progress(player.progress);
        match self.players.iter_mut().find(|p| p.id == player.id) {
            Some(existing) => *existing = player,
            None => self.players.push(player),
        }
    }

    pub fn remove_player(&mut self, id: &str) -> Result<Player, ActionRejected> {
        let idx = self.index_of(id)?;
        Ok(self.players.remove(idx))
    }

    pub fn update_player(&mut self, id: &str, patch: &PlayerPatch) -> Result<(), ActionRejected> {
        let idx = self.index_of(id)?;
        patch.apply(&mut self.players[idx]);
        Ok(())
    }

    fn index_of(&self, id: &str) -> Result<usize, ActionRejected> {
        self.players
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ActionRejected::UnknownPlayer(id.to_string()))
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn get(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn room_id(&self) -> Option<&str> {
        self.room_id.as_deref()
    }

    pub fn local_player_id(&self) -> Option<&str> {
        self.local_player_id.as_deref()
    }

    pub fn local_player(&self) -> Option<&Player> {
        self.local_player_id.as_deref().and_then(|id| self.get(id))
    }

    pub fn is_multiplayer(&self) -> bool {
        self.room_id.is_some()
    }

    /// Roster ordered by wpm, fastest first. Equal wpm keeps roster order.
    pub fn leaderboard(&self) -> Vec<&Player> {
        self.players
            .iter()
            .sorted_by(|a, b| b.wpm.cmp(&a.wpm))
            .collect()
    }
}
