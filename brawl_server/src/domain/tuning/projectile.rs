/// Gameplay tuning for projectiles.

#[derive(Debug, Clone, Copy)]
pub struct ProjectileTuning {
    /// Distance ahead of the shooter where projectiles appear.
    pub spawn_offset: f32,

    /// Collision radius in pixels.
    pub radius: f32,
    pub mage_radius: f32,

    /// Base damage for shots without a class ability, scaled by damage boost.
    pub damage: i32,
    /// Flat damage for archer shots that have nothing to steal.
    pub archer_damage: i32,

    /// Knockback impulse on a damaging hit (x is signed away from the projectile).
    pub knockback_x: f32,
    pub knockback_y: f32,

    pub blind_seconds: f32,

    /// Boost timer granted to an archer that steals a buff.
    pub steal_seconds: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            spawn_offset: 30.0,
            radius: 5.0,
            mage_radius: 8.0,
            damage: 20,
            archer_damage: 10,
            knockback_x: 1000.0,
            knockback_y: -500.0,
            blind_seconds: 3.0,
            steal_seconds: 5.0,
        }
    }
}
