// Simulation entities. Each one owns a body in the physics world and mirrors its position
// after every step for snapshots and rule checks.

use crate::domain::physics::{BodyHandle, Vec2};

pub type PlayerId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Fighter,
    Mage,
    Archer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassStats {
    pub max_health: i32,
    pub damage_boost: f32,
    pub speed_boost: f32,
    pub projectile_speed: f32,
    pub weapon: WeaponKind,
}

impl ClassKind {
    pub fn stats(self) -> ClassStats {
        match self {
            ClassKind::Fighter => ClassStats {
                max_health: 150,
                damage_boost: 1.3,
                speed_boost: 1.0,
                projectile_speed: 400.0,
                weapon: WeaponKind::Sword,
            },
            ClassKind::Mage => ClassStats {
                max_health: 100,
                damage_boost: 1.0,
                speed_boost: 1.0,
                projectile_speed: 500.0,
                weapon: WeaponKind::Gun,
            },
            ClassKind::Archer => ClassStats {
                max_health: 90,
                damage_boost: 1.0,
                speed_boost: 1.2,
                projectile_speed: 600.0,
                weapon: WeaponKind::Gun,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClassKind::Fighter => "Fighter",
            ClassKind::Mage => "Mage",
            ClassKind::Archer => "Archer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponKind {
    Sword,
    Gun,
}

impl WeaponKind {
    pub fn as_str(self) -> &'static str {
        match self {
            WeaponKind::Sword => "sword",
            WeaponKind::Gun => "gun",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuffKind {
    Damage,
    Speed,
    Heal,
    Invincible,
    Bite,
    Queijada,
}

impl BuffKind {
    /// Kinds that spawn at random on the field.
    pub const FIELD: [BuffKind; 5] = [
        BuffKind::Damage,
        BuffKind::Speed,
        BuffKind::Heal,
        BuffKind::Invincible,
        BuffKind::Bite,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BuffKind::Damage => "damage",
            BuffKind::Speed => "speed",
            BuffKind::Heal => "heal",
            BuffKind::Invincible => "invincible",
            BuffKind::Bite => "bite",
            BuffKind::Queijada => "queijada",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Idle,
    Attacking,
    Hit,
    Dodging,
    Climbing,
}

impl AnimationState {
    pub fn as_str(self) -> &'static str {
        match self {
            AnimationState::Idle => "idle",
            AnimationState::Attacking => "attacking",
            AnimationState::Hit => "hit",
            AnimationState::Dodging => "dodging",
            AnimationState::Climbing => "climbing",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub body: BodyHandle,
    pub color: &'static str,
    pub class: ClassKind,
    /// False until the player answers the class prompt.
    pub class_chosen: bool,

    pub position: Vec2,
    pub velocity: Vec2,
    pub facing_right: bool,
    pub can_jump: bool,

    pub health: i32,
    pub max_health: i32,
    pub weapon: Option<WeaponKind>,
    pub projectile_speed: f32,
    pub attack_cooldown: f32,

    pub damage_boost: f32,
    pub speed_boost: f32,
    /// Shared expiry for both boosts.
    pub buff_timer: f32,

    pub is_dodging: bool,
    pub dodge_timer: f32,
    pub is_climbing: bool,
    pub climb_target: Option<Vec2>,
    pub is_blinded: bool,
    pub blind_timer: f32,
    pub invincible_timer: f32,
    pub has_queijada: bool,

    pub animation: AnimationState,
    pub animation_timer: f32,
}

impl Player {
    pub fn new(id: PlayerId, body: BodyHandle, color: &'static str, position: Vec2) -> Self {
        let mut player = Self {
            id,
            body,
            color,
            class: ClassKind::Fighter,
            class_chosen: false,
            position,
            velocity: Vec2::zeros(),
            facing_right: true,
            can_jump: false,
            health: 0,
            max_health: 0,
            weapon: None,
            projectile_speed: 0.0,
            attack_cooldown: 0.0,
            damage_boost: 1.0,
            speed_boost: 1.0,
            buff_timer: 0.0,
            is_dodging: false,
            dodge_timer: 0.0,
            is_climbing: false,
            climb_target: None,
            is_blinded: false,
            blind_timer: 0.0,
            invincible_timer: 0.0,
            has_queijada: false,
            animation: AnimationState::Idle,
            animation_timer: 0.0,
        };
        player.apply_class(ClassKind::Fighter);
        player
    }

    /// Applies the class base stats and clears every status.
    pub fn apply_class(&mut self, class: ClassKind) {
        let stats = class.stats();
        self.class = class;
        self.max_health = stats.max_health;
        self.projectile_speed = stats.projectile_speed;
        self.weapon = Some(stats.weapon);
        self.reset_status();
    }

    /// Full health, baseline boosts, no timers. Position is left to the caller.
    pub fn reset_status(&mut self) {
        let stats = self.class.stats();
        self.health = self.max_health;
        self.damage_boost = stats.damage_boost;
        self.speed_boost = stats.speed_boost;
        self.buff_timer = 0.0;
        self.attack_cooldown = 0.0;
        self.is_dodging = false;
        self.dodge_timer = 0.0;
        self.is_climbing = false;
        self.climb_target = None;
        self.is_blinded = false;
        self.blind_timer = 0.0;
        self.invincible_timer = 0.0;
        self.has_queijada = false;
        self.can_jump = false;
        self.animation = AnimationState::Idle;
        self.animation_timer = 0.0;
    }

    pub fn baseline_damage_boost(&self) -> f32 {
        self.class.stats().damage_boost
    }

    pub fn baseline_speed_boost(&self) -> f32 {
        self.class.stats().speed_boost
    }

    pub fn facing_sign(&self) -> f32 {
        if self.facing_right { 1.0 } else { -1.0 }
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_timer > 0.0
    }

    /// Subtracts health, clamped at zero. Returns true when this brought the player to zero.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if self.health <= 0 {
            return false;
        }
        self.health = (self.health - amount.max(0)).max(0);
        self.health == 0
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount.max(0)).min(self.max_health);
    }

    pub fn play(&mut self, animation: AnimationState, seconds: f32) {
        self.animation = animation;
        self.animation_timer = seconds;
    }
}

/// Parametric motion of a kinematic platform along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillation {
    pub amplitude: f32,
    /// Cycles per second.
    pub frequency: f32,
    pub phase: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlatformMotion {
    Static,
    Horizontal(Oscillation),
    Vertical(Oscillation),
}

#[derive(Debug, Clone)]
pub struct Platform {
    pub body: BodyHandle,
    pub width: f32,
    pub height: f32,
    pub motion: PlatformMotion,
    /// Position at offset zero.
    pub anchor: Vec2,
    pub position: Vec2,
}

impl Platform {
    pub fn top(&self) -> f32 {
        self.position.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.height / 2.0
    }
}

#[derive(Debug, Clone)]
pub struct Weapon {
    pub id: u64,
    pub body: BodyHandle,
    pub kind: WeaponKind,
    pub damage: i32,
    pub position: Vec2,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u64,
    pub body: BodyHandle,
    pub owner_id: PlayerId,
    /// Class of the shooter when fired; decides the on-hit effect.
    pub class: ClassKind,
    pub damage: i32,
    pub position: Vec2,
    pub velocity: Vec2,
}

#[derive(Debug, Clone)]
pub struct Buff {
    pub id: u64,
    pub body: BodyHandle,
    pub kind: BuffKind,
    pub position: Vec2,
}

/// Two distinct mutable elements of a slice.
pub fn pair_mut<T>(items: &mut [T], first: usize, second: usize) -> Option<(&mut T, &mut T)> {
    if first == second || first >= items.len() || second >= items.len() {
        return None;
    }
    if first < second {
        let (head, tail) = items.split_at_mut(second);
        Some((&mut head[first], &mut tail[0]))
    } else {
        let (head, tail) = items.split_at_mut(first);
        Some((&mut tail[0], &mut head[second]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::physics::{BodyDesc, CollisionType, Shape, World};

    fn player() -> Player {
        let mut world = World::new(Vec2::zeros(), 1.0);
        let body = world.add(BodyDesc::dynamic(
            Shape::rect(25.0, 45.0),
            CollisionType::Player,
            10.0,
        ));
        Player::new(7, body, "red", Vec2::zeros())
    }

    #[test]
    fn when_class_is_applied_then_base_stats_follow_the_class() {
        let mut p = player();

        p.apply_class(ClassKind::Archer);

        assert_eq!(p.max_health, 90);
        assert_eq!(p.health, 90);
        assert_eq!(p.speed_boost, 1.2);
        assert_eq!(p.projectile_speed, 600.0);
        assert_eq!(p.weapon, Some(WeaponKind::Gun));
    }

    #[test]
    fn when_damage_exceeds_health_then_health_clamps_at_zero_once() {
        let mut p = player();
        p.apply_class(ClassKind::Mage);

        assert!(!p.take_damage(60));
        assert!(p.take_damage(60));
        assert_eq!(p.health, 0);
        // Already down: no second knockout.
        assert!(!p.take_damage(10));
    }

    #[test]
    fn when_healing_then_health_never_exceeds_class_max() {
        let mut p = player();
        p.apply_class(ClassKind::Archer);
        p.take_damage(10);

        p.heal(25);

        assert_eq!(p.health, 90);
    }

    #[test]
    fn when_pair_mut_gets_distinct_indices_then_both_orders_work() {
        let mut values = [1, 2, 3];
        {
            let (a, b) = pair_mut(&mut values, 2, 0).expect("distinct");
            std::mem::swap(a, b);
        }
        assert_eq!(values, [3, 2, 1]);
        assert!(pair_mut(&mut values, 1, 1).is_none());
        assert!(pair_mut(&mut values, 0, 3).is_none());
    }
}
