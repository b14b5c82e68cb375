// Wire protocol DTOs and conversions for public game server messages.

use crate::domain::state::{
    BuffSnapshot, PlatformSnapshot, PlayerSnapshot, ProjectileSnapshot, WeaponSnapshot,
};
use crate::domain::{ClassKind, MatchEvent, PlayerInput, Scores};
use crate::use_cases::{ServerState, WorldUpdate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const POMBO_MESSAGE: &str = "Um pombo roubou a queijada! Todos perdem!";
const EASTER_EGG_EVENT: &str = "Os Três Mosqueteiros apareceram!";

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    // Sent once the arena accepted the connection.
    ChooseClass { player_id: String },
    // Snapshot of the arena for a given tick.
    GameState(GameStateDto),
    // High-level server state transitions (lobby, match start/end).
    MatchState(ServerStateDto),
    Attack {
        attacker: String,
        target: String,
        weapon: &'static str,
    },
    Shoot {
        attacker: String,
        class_type: &'static str,
        direction: f32,
    },
    PlayerDied {
        player: String,
        killer: Option<String>,
    },
    WeaponCollected {
        player: String,
        weapon: &'static str,
    },
    BuffCollected {
        player: String,
        buff_type: &'static str,
    },
    QueijadaSpawned {
        x: f32,
        y: f32,
    },
    GotQueijada {
        player: String,
    },
    StealBuff {
        stealer: String,
        target: String,
        buff: &'static str,
    },
    StealQueijada {
        stealer: String,
        target: String,
    },
    PomboRoubou {
        message: &'static str,
    },
    EasterEgg {
        event: &'static str,
    },
    RoundChange {
        next_level: &'static str,
        round: u32,
        max_rounds: u32,
        scores: BTreeMap<String, u32>,
        winner: Option<String>,
    },
    GameOver {
        winner: Option<String>,
        scores: BTreeMap<String, u32>,
    },
    LevelChanged {
        level_name: &'static str,
        level_title: &'static str,
    },
}

/// Messages the client sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    PlayerInput(PlayerInputDto),
    ClassChoice(ClassChoiceDto),
    RequestLevelChange(LevelChangeDto),
}

/// Per-tick input payload. Missing flags read as released.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerInputDto {
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    #[serde(default)]
    pub jump: bool,
    #[serde(default)]
    pub attack: bool,
    #[serde(default)]
    pub dodge: bool,
    #[serde(default)]
    pub climb: bool,
}

impl From<PlayerInputDto> for PlayerInput {
    fn from(input: PlayerInputDto) -> Self {
        Self {
            left: input.left,
            right: input.right,
            jump: input.jump,
            attack: input.attack,
            dodge: input.dodge,
            climb: input.climb,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassChoiceDto {
    pub class_type: ClassTypeDto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ClassTypeDto {
    Fighter,
    Mage,
    Archer,
}

impl From<ClassTypeDto> for ClassKind {
    fn from(class: ClassTypeDto) -> Self {
        match class {
            ClassTypeDto::Fighter => ClassKind::Fighter,
            ClassTypeDto::Mage => ClassKind::Mage,
            ClassTypeDto::Archer => ClassKind::Archer,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LevelChangeDto {
    // Absent or unknown names load the first level.
    #[serde(default)]
    pub level_name: Option<String>,
}

/// Snapshot of the arena sent to clients on each tick.
#[derive(Debug, Clone, Serialize)]
pub struct GameStateDto {
    pub tick: u64,
    pub level: &'static str,
    pub round: u32,
    pub max_rounds: u32,
    pub round_timer: f32,
    pub players: Vec<PlayerStateDto>,
    pub weapons: Vec<WeaponStateDto>,
    pub platforms: Vec<PlatformStateDto>,
    pub projectiles: Vec<ProjectileStateDto>,
    pub buffs: Vec<BuffStateDto>,
    pub scores: BTreeMap<String, u32>,
}

impl From<WorldUpdate> for GameStateDto {
    fn from(update: WorldUpdate) -> Self {
        Self {
            tick: update.tick,
            level: update.level,
            round: update.round,
            max_rounds: update.max_rounds,
            round_timer: update.round_timer,
            players: update.players.iter().map(PlayerStateDto::from).collect(),
            weapons: update.weapons.iter().map(WeaponStateDto::from).collect(),
            platforms: update.platforms.iter().map(PlatformStateDto::from).collect(),
            projectiles: update
                .projectiles
                .iter()
                .map(ProjectileStateDto::from)
                .collect(),
            buffs: update.buffs.iter().map(BuffStateDto::from).collect(),
            scores: scores_dto(&update.scores),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerStateDto {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub color: &'static str,
    pub class_type: &'static str,
    pub health: i32,
    pub max_health: i32,
    pub weapon: Option<&'static str>,
    pub facing_right: bool,
    pub can_jump: bool,
    pub is_dodging: bool,
    pub is_climbing: bool,
    pub damage_boost: f32,
    pub speed_boost: f32,
    pub buff_timer: f32,
    pub is_blinded: bool,
    pub blind_timer: f32,
    pub invincible_timer: f32,
    pub has_queijada: bool,
    pub animation: &'static str,
}

impl From<&PlayerSnapshot> for PlayerStateDto {
    fn from(player: &PlayerSnapshot) -> Self {
        Self {
            id: player.id.to_string(),
            x: player.x,
            y: player.y,
            velocity_x: player.velocity_x,
            velocity_y: player.velocity_y,
            color: player.color,
            class_type: player.class.as_str(),
            health: player.health,
            max_health: player.max_health,
            weapon: player.weapon.map(|w| w.as_str()),
            facing_right: player.facing_right,
            can_jump: player.can_jump,
            is_dodging: player.is_dodging,
            is_climbing: player.is_climbing,
            damage_boost: player.damage_boost,
            speed_boost: player.speed_boost,
            buff_timer: player.buff_timer,
            is_blinded: player.is_blinded,
            blind_timer: player.blind_timer,
            invincible_timer: player.invincible_timer,
            has_queijada: player.has_queijada,
            animation: player.animation.as_str(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WeaponStateDto {
    pub kind: &'static str,
    pub damage: i32,
    pub x: f32,
    pub y: f32,
}

impl From<&WeaponSnapshot> for WeaponStateDto {
    fn from(weapon: &WeaponSnapshot) -> Self {
        Self {
            kind: weapon.kind.as_str(),
            damage: weapon.damage,
            x: weapon.x,
            y: weapon.y,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformStateDto {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<&PlatformSnapshot> for PlatformStateDto {
    fn from(platform: &PlatformSnapshot) -> Self {
        Self {
            x: platform.x,
            y: platform.y,
            width: platform.width,
            height: platform.height,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectileStateDto {
    pub id: String,
    pub owner_id: String,
    pub x: f32,
    pub y: f32,
}

impl From<&ProjectileSnapshot> for ProjectileStateDto {
    fn from(projectile: &ProjectileSnapshot) -> Self {
        Self {
            id: projectile.id.to_string(),
            owner_id: projectile.owner_id.to_string(),
            x: projectile.x,
            y: projectile.y,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BuffStateDto {
    pub kind: &'static str,
    pub x: f32,
    pub y: f32,
}

impl From<&BuffSnapshot> for BuffStateDto {
    fn from(buff: &BuffSnapshot) -> Self {
        Self {
            kind: buff.kind.as_str(),
            x: buff.x,
            y: buff.y,
        }
    }
}

/// Server lifecycle state sent to clients for UI flow.
#[derive(Debug, Clone, Serialize)]
pub enum ServerStateDto {
    Lobby,
    MatchStarting { in_seconds: u32 },
    MatchRunning,
    MatchEnded,
}

impl From<ServerState> for ServerStateDto {
    fn from(state: ServerState) -> Self {
        match state {
            ServerState::Lobby => ServerStateDto::Lobby,
            ServerState::MatchStarting { in_seconds } => {
                ServerStateDto::MatchStarting { in_seconds }
            }
            ServerState::MatchRunning => ServerStateDto::MatchRunning,
            ServerState::MatchEnded => ServerStateDto::MatchEnded,
        }
    }
}

impl From<MatchEvent> for ServerMessage {
    fn from(event: MatchEvent) -> Self {
        match event {
            MatchEvent::Attack {
                attacker,
                target,
                weapon,
            } => ServerMessage::Attack {
                attacker: attacker.to_string(),
                target: target.to_string(),
                weapon: weapon.as_str(),
            },
            MatchEvent::Shoot {
                attacker,
                class,
                direction,
            } => ServerMessage::Shoot {
                attacker: attacker.to_string(),
                class_type: class.as_str(),
                direction,
            },
            MatchEvent::PlayerDied { player, killer } => ServerMessage::PlayerDied {
                player: player.to_string(),
                killer: killer.map(|id| id.to_string()),
            },
            MatchEvent::WeaponCollected { player, weapon } => ServerMessage::WeaponCollected {
                player: player.to_string(),
                weapon: weapon.as_str(),
            },
            MatchEvent::BuffCollected { player, buff } => ServerMessage::BuffCollected {
                player: player.to_string(),
                buff_type: buff.as_str(),
            },
            MatchEvent::QueijadaSpawned { x, y } => ServerMessage::QueijadaSpawned { x, y },
            MatchEvent::GotQueijada { player } => ServerMessage::GotQueijada {
                player: player.to_string(),
            },
            MatchEvent::StealBuff {
                stealer,
                target,
                buff,
            } => ServerMessage::StealBuff {
                stealer: stealer.to_string(),
                target: target.to_string(),
                buff: buff.as_str(),
            },
            MatchEvent::StealQueijada { stealer, target } => ServerMessage::StealQueijada {
                stealer: stealer.to_string(),
                target: target.to_string(),
            },
            MatchEvent::PomboRoubou => ServerMessage::PomboRoubou {
                message: POMBO_MESSAGE,
            },
            MatchEvent::EasterEgg => ServerMessage::EasterEgg {
                event: EASTER_EGG_EVENT,
            },
            MatchEvent::RoundChange {
                next_level,
                round,
                max_rounds,
                scores,
                winner,
            } => ServerMessage::RoundChange {
                next_level,
                round,
                max_rounds,
                scores: scores_dto(&scores),
                winner: winner.map(|id| id.to_string()),
            },
            MatchEvent::GameOver { winner, scores } => ServerMessage::GameOver {
                winner: winner.map(|id| id.to_string()),
                scores: scores_dto(&scores),
            },
            MatchEvent::LevelChanged {
                level_name,
                level_title,
            } => ServerMessage::LevelChanged {
                level_name,
                level_title,
            },
        }
    }
}

fn scores_dto(scores: &Scores) -> BTreeMap<String, u32> {
    scores
        .iter()
        .map(|(id, score)| (id.to_string(), *score))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WeaponKind;

    #[test]
    fn when_input_omits_flags_then_they_read_as_released() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"player_input","data":{"left":true}}"#)
                .expect("valid input");

        let ClientMessage::PlayerInput(dto) = msg else {
            panic!("expected player_input");
        };
        let input = PlayerInput::from(dto);
        assert!(input.left);
        assert!(!input.right && !input.jump && !input.attack && !input.dodge && !input.climb);
    }

    #[test]
    fn when_class_choice_names_a_class_then_it_maps_to_the_domain_kind() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"class_choice","data":{"class_type":"Archer"}}"#)
                .expect("valid class choice");

        let ClientMessage::ClassChoice(dto) = msg else {
            panic!("expected class_choice");
        };
        assert_eq!(ClassKind::from(dto.class_type), ClassKind::Archer);
    }

    #[test]
    fn when_class_is_unknown_then_parsing_fails() {
        let parsed = serde_json::from_str::<ClientMessage>(
            r#"{"type":"class_choice","data":{"class_type":"Necromancer"}}"#,
        );

        assert!(parsed.is_err());
    }

    #[test]
    fn when_level_change_has_no_name_then_it_parses_as_none() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"request_level_change","data":{}}"#)
                .expect("valid level change");

        let ClientMessage::RequestLevelChange(dto) = msg else {
            panic!("expected request_level_change");
        };
        assert_eq!(dto.level_name, None);
    }

    #[test]
    fn when_event_is_serialized_then_ids_are_strings_under_the_event_name() {
        let msg = ServerMessage::from(MatchEvent::Attack {
            attacker: 7,
            target: 9,
            weapon: WeaponKind::Sword,
        });

        let value = serde_json::to_value(&msg).expect("serializable");
        assert_eq!(value["type"], "attack");
        assert_eq!(value["data"]["attacker"], "7");
        assert_eq!(value["data"]["target"], "9");
        assert_eq!(value["data"]["weapon"], "sword");
    }

    #[test]
    fn when_game_over_is_serialized_then_scores_are_keyed_by_player_id() {
        let msg = ServerMessage::from(MatchEvent::GameOver {
            winner: Some(3),
            scores: vec![(3, 2), (4, 1)],
        });

        let value = serde_json::to_value(&msg).expect("serializable");
        assert_eq!(value["type"], "game_over");
        assert_eq!(value["data"]["winner"], "3");
        assert_eq!(value["data"]["scores"]["3"], 2);
        assert_eq!(value["data"]["scores"]["4"], 1);
    }

    #[test]
    fn when_match_state_is_serialized_then_variant_is_externally_tagged() {
        let msg = ServerMessage::MatchState(ServerStateDto::from(ServerState::MatchStarting {
            in_seconds: 3,
        }));

        let value = serde_json::to_value(&msg).expect("serializable");
        assert_eq!(value["type"], "match_state");
        assert_eq!(value["data"]["MatchStarting"]["in_seconds"], 3);
    }

    #[test]
    fn when_weapon_is_serialized_then_its_damage_is_included() {
        let dto = WeaponStateDto::from(&WeaponSnapshot {
            kind: WeaponKind::Sword,
            damage: 30,
            x: 120.0,
            y: 40.0,
        });

        let value = serde_json::to_value(&dto).expect("serializable");
        assert_eq!(value["kind"], "sword");
        assert_eq!(value["damage"], 30);
    }
}
