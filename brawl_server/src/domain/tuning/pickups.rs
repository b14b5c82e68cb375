/// Gameplay tuning for weapons, buffs and the queijada.

#[derive(Debug, Clone, Copy)]
pub struct PickupTuning {
    pub max_weapons: usize,
    /// Chance per tick of dropping a weapon while under the cap.
    pub weapon_spawn_chance: f64,
    pub weapon_radius: f32,
    pub sword_damage: i32,
    pub gun_damage: i32,

    pub max_buffs: usize,
    pub buff_spawn_chance: f64,
    pub buff_radius: f32,

    pub boost_seconds: f32,
    pub damage_multiplier: f32,
    pub speed_multiplier: f32,
    pub bite_multiplier: f32,
    pub bite_seconds: f32,
    pub invincible_seconds: f32,
    pub heal_amount: i32,

    pub queijada_radius: f32,
    /// Height above the chosen platform's top.
    pub queijada_lift: f32,

    /// Chance per active tick of boosting every player at once.
    pub easter_egg_chance: f64,
}

impl Default for PickupTuning {
    fn default() -> Self {
        Self {
            max_weapons: 3,
            weapon_spawn_chance: 0.01,
            weapon_radius: 10.0,
            sword_damage: 30,
            gun_damage: 20,
            max_buffs: 3,
            buff_spawn_chance: 0.02,
            buff_radius: 15.0,
            boost_seconds: 10.0,
            damage_multiplier: 1.5,
            speed_multiplier: 1.5,
            bite_multiplier: 2.0,
            bite_seconds: 5.0,
            invincible_seconds: 5.0,
            heal_amount: 25,
            queijada_radius: 25.0,
            queijada_lift: 30.0,
            easter_egg_chance: 0.0005,
        }
    }
}

impl PickupTuning {
    /// No random spawns at all. Used by deterministic simulations.
    pub fn without_random_spawns(mut self) -> Self {
        self.weapon_spawn_chance = 0.0;
        self.buff_spawn_chance = 0.0;
        self.easter_egg_chance = 0.0;
        self
    }
}
