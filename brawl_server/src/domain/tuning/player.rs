/// Gameplay tuning for player movement and actions.
///
/// Keep this separate from runtime/server configuration (tick rates, buffer sizes, etc.).

#[derive(Debug, Clone, Copy)]
pub struct PlayerTuning {
    /// Collision box size in pixels.
    pub width: f32,
    pub height: f32,
    pub mass: f32,

    /// Horizontal run speed in pixels per second, before speed boosts.
    pub move_speed: f32,

    /// Vertical velocity set on jump (negative is up).
    pub jump_velocity: f32,

    /// Cap on downward speed in pixels per second.
    pub max_fall_speed: f32,

    pub dodge_impulse: f32,
    pub dodge_seconds: f32,

    /// Minimum time between two attacks.
    pub attack_cooldown: f32,

    /// Damage taken when falling out of the level.
    pub fall_damage: i32,

    /// Extra horizontal reach beyond a platform's half width when climbing.
    pub climb_margin: f32,
    /// How far below a platform's top a player may start a climb.
    pub climb_reach: f32,
    /// Velocity gain applied to the remaining climb offset.
    pub climb_gain: f32,
    /// Distance at which a climb snaps to its target.
    pub climb_snap: f32,

    /// How long the attack/hit animation state is held.
    pub action_animation_seconds: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: 25.0,
            height: 45.0,
            mass: 10.0,
            move_speed: 400.0,
            jump_velocity: -800.0,
            max_fall_speed: 800.0,
            dodge_impulse: 5000.0,
            dodge_seconds: 0.5,
            attack_cooldown: 0.5,
            fall_damage: 10,
            climb_margin: 10.0,
            climb_reach: 50.0,
            climb_gain: 5.0,
            climb_snap: 5.0,
            action_animation_seconds: 10.0 / 60.0,
        }
    }
}
