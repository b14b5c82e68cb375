// Use-case level inputs/outputs for the arena world task.

use crate::domain::state::{
    BuffSnapshot, PlatformSnapshot, PlayerSnapshot, ProjectileSnapshot, WeaponSnapshot,
};
use crate::domain::{ClassKind, MatchEvent, PlayerId, PlayerInput, Scores};
use std::fmt;
use tokio::sync::oneshot;

pub type JoinReply = oneshot::Sender<Result<JoinAccepted, JoinError>>;

#[derive(Debug)]
pub enum GameEvent {
    /// The arena answers on `reply` once the player is placed (or refused).
    Join {
        player_id: PlayerId,
        reply: JoinReply,
    },
    Leave {
        player_id: PlayerId,
    },
    Input {
        player_id: PlayerId,
        input: PlayerInput,
    },
    ChooseClass {
        player_id: PlayerId,
        class: ClassKind,
    },
    RequestLevelChange {
        player_id: PlayerId,
        level_name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinAccepted {
    pub player_id: PlayerId,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinError {
    ServerFull,
    MatchOver,
}

impl JoinError {
    pub fn reason(self) -> &'static str {
        match self {
            JoinError::ServerFull => "server full",
            JoinError::MatchOver => "match over",
        }
    }
}

impl fmt::Display for JoinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

impl std::error::Error for JoinError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerState {
    Lobby,
    MatchStarting { in_seconds: u32 },
    MatchRunning,
    MatchEnded,
}

/// Full arena snapshot for one tick.
#[derive(Debug, Clone)]
pub struct WorldUpdate {
    pub tick: u64,
    pub level: &'static str,
    pub round: u32,
    pub max_rounds: u32,
    pub round_timer: f32,
    pub players: Vec<PlayerSnapshot>,
    pub weapons: Vec<WeaponSnapshot>,
    pub platforms: Vec<PlatformSnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
    pub buffs: Vec<BuffSnapshot>,
    pub scores: Scores,
}

/// Everything the world task publishes, in emission order.
#[derive(Debug, Clone)]
pub enum WorldOutput {
    Update(WorldUpdate),
    Event(MatchEvent),
}
