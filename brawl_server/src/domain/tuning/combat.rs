/// Gameplay tuning for melee attacks.

#[derive(Debug, Clone, Copy)]
pub struct CombatTuning {
    /// Maximum distance between attacker and defender centers.
    pub melee_range: f32,

    /// Full width of the hit cone in radians, centered on the facing direction.
    pub melee_arc: f32,

    /// Damage before the attacker's damage boost.
    pub melee_damage: i32,

    pub melee_knockback: f32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            melee_range: 90.0,
            melee_arc: std::f32::consts::FRAC_PI_2,
            melee_damage: 35,
            melee_knockback: 2500.0,
        }
    }
}
