// Discrete match events, published next to the periodic snapshot.

use crate::domain::entities::{BuffKind, ClassKind, PlayerId, WeaponKind};

pub type Scores = Vec<(PlayerId, u32)>;

/// Which boost an archer took from its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StolenBuff {
    Damage,
    Speed,
}

impl StolenBuff {
    pub fn as_str(self) -> &'static str {
        match self {
            StolenBuff::Damage => "damage",
            StolenBuff::Speed => "speed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchEvent {
    Attack {
        attacker: PlayerId,
        target: PlayerId,
        weapon: WeaponKind,
    },
    Shoot {
        attacker: PlayerId,
        class: ClassKind,
        direction: f32,
    },
    PlayerDied {
        player: PlayerId,
        killer: Option<PlayerId>,
    },
    WeaponCollected {
        player: PlayerId,
        weapon: WeaponKind,
    },
    BuffCollected {
        player: PlayerId,
        buff: BuffKind,
    },
    QueijadaSpawned {
        x: f32,
        y: f32,
    },
    GotQueijada {
        player: PlayerId,
    },
    StealBuff {
        stealer: PlayerId,
        target: PlayerId,
        buff: StolenBuff,
    },
    StealQueijada {
        stealer: PlayerId,
        target: PlayerId,
    },
    PomboRoubou,
    EasterEgg,
    RoundChange {
        next_level: &'static str,
        round: u32,
        max_rounds: u32,
        scores: Scores,
        winner: Option<PlayerId>,
    },
    GameOver {
        winner: Option<PlayerId>,
        scores: Scores,
    },
    LevelChanged {
        level_name: &'static str,
        level_title: &'static str,
    },
}
