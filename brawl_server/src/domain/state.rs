// Domain-level input and snapshot types.

use crate::domain::entities::{
    AnimationState, Buff, BuffKind, ClassKind, Platform, Player, PlayerId, Projectile, Weapon,
    WeaponKind,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub attack: bool,
    pub dodge: bool,
    pub climb: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub x: f32,
    pub y: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub color: &'static str,
    pub class: ClassKind,
    pub health: i32,
    pub max_health: i32,
    pub weapon: Option<WeaponKind>,
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
    pub animation: AnimationState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeaponSnapshot {
    pub kind: WeaponKind,
    pub damage: i32,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlatformSnapshot {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileSnapshot {
    pub id: u64,
    pub owner_id: PlayerId,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuffSnapshot {
    pub kind: BuffKind,
    pub x: f32,
    pub y: f32,
}

impl From<&Player> for PlayerSnapshot {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id,
            x: p.position.x,
            y: p.position.y,
            velocity_x: p.velocity.x,
            velocity_y: p.velocity.y,
            color: p.color,
            class: p.class,
            health: p.health,
            max_health: p.max_health,
            weapon: p.weapon,
            facing_right: p.facing_right,
            can_jump: p.can_jump,
            is_dodging: p.is_dodging,
            is_climbing: p.is_climbing,
            damage_boost: p.damage_boost,
            speed_boost: p.speed_boost,
            buff_timer: p.buff_timer,
            is_blinded: p.is_blinded,
            blind_timer: p.blind_timer,
            invincible_timer: p.invincible_timer,
            has_queijada: p.has_queijada,
            animation: p.animation,
        }
    }
}

impl From<&Weapon> for WeaponSnapshot {
    fn from(w: &Weapon) -> Self {
        Self {
            kind: w.kind,
            damage: w.damage,
            x: w.position.x,
            y: w.position.y,
        }
    }
}

impl From<&Platform> for PlatformSnapshot {
    fn from(p: &Platform) -> Self {
        Self {
            x: p.position.x,
            y: p.position.y,
            width: p.width,
            height: p.height,
        }
    }
}

impl From<&Projectile> for ProjectileSnapshot {
    fn from(p: &Projectile) -> Self {
        Self {
            id: p.id,
            owner_id: p.owner_id,
            x: p.position.x,
            y: p.position.y,
        }
    }
}

impl From<&Buff> for BuffSnapshot {
    fn from(b: &Buff) -> Self {
        Self {
            kind: b.kind,
            x: b.position.x,
            y: b.position.y,
        }
    }
}
