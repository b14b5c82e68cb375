use crate::domain::entities::{Buff, BuffKind, Platform, Player, Weapon, WeaponKind};
use crate::domain::levels::{JUMP_HEIGHT, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::domain::physics::{BodyDesc, CollisionType, Shape, Vec2, World};
use crate::domain::tuning::pickups::PickupTuning;
use rand::Rng;

const SPAWN_MARGIN: f32 = 100.0;
const BUFF_MIN_Y: f32 = 100.0;
const BUFF_MAX_Y: f32 = 400.0;

/// Drops a random weapon from the top edge. It falls until a platform catches it.
pub fn spawn_weapon(
    world: &mut World,
    tuning: &PickupTuning,
    rng: &mut impl Rng,
    id: u64,
) -> Weapon {
    let kind = if rng.gen_bool(0.5) {
        WeaponKind::Sword
    } else {
        WeaponKind::Gun
    };
    let damage = match kind {
        WeaponKind::Sword => tuning.sword_damage,
        WeaponKind::Gun => tuning.gun_damage,
    };
    let position = Vec2::new(
        rng.gen_range(SPAWN_MARGIN..=SCREEN_WIDTH - SPAWN_MARGIN),
        0.0,
    );
    // Solid so platforms catch it; players only overlap it.
    let body = world.add(
        BodyDesc::dynamic(
            Shape::circle(tuning.weapon_radius),
            CollisionType::Pickup,
            1.0,
        )
        .at(position),
    );
    Weapon {
        id,
        body,
        kind,
        damage,
        position,
    }
}

/// Places a random field buff somewhere in the air.
pub fn spawn_buff(world: &mut World, tuning: &PickupTuning, rng: &mut impl Rng, id: u64) -> Buff {
    let kind = BuffKind::FIELD[rng.gen_range(0..BuffKind::FIELD.len())];
    let position = Vec2::new(
        rng.gen_range(SPAWN_MARGIN..=SCREEN_WIDTH - SPAWN_MARGIN),
        rng.gen_range(BUFF_MIN_Y..=BUFF_MAX_Y),
    );
    place_buff(world, kind, position, tuning.buff_radius, id)
}

/// Places the round's queijada above a central platform.
pub fn spawn_queijada(
    world: &mut World,
    platforms: &[Platform],
    tuning: &PickupTuning,
    rng: &mut impl Rng,
    id: u64,
) -> Buff {
    let position = queijada_spot(platforms, tuning, rng);
    place_buff(
        world,
        BuffKind::Queijada,
        position,
        tuning.queijada_radius,
        id,
    )
}

/// A random central platform that sits above the bottom tier, or a fixed fallback point.
pub fn queijada_spot(platforms: &[Platform], tuning: &PickupTuning, rng: &mut impl Rng) -> Vec2 {
    let central: Vec<&Platform> = platforms
        .iter()
        .filter(|p| {
            p.position.x > SCREEN_WIDTH / 4.0
                && p.position.x < SCREEN_WIDTH * 3.0 / 4.0
                && p.position.y < SCREEN_HEIGHT - JUMP_HEIGHT
        })
        .collect();
    if central.is_empty() {
        return Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT - JUMP_HEIGHT - 50.0);
    }
    let platform = central[rng.gen_range(0..central.len())];
    Vec2::new(platform.position.x, platform.top() - tuning.queijada_lift)
}

fn place_buff(world: &mut World, kind: BuffKind, position: Vec2, radius: f32, id: u64) -> Buff {
    let body = world.add(
        BodyDesc::fixed(Shape::circle(radius), CollisionType::Pickup)
            .at(position)
            .as_sensor(),
    );
    Buff {
        id,
        body,
        kind,
        position,
    }
}

/// Applies a collected buff. The queijada only marks its holder; the round controller
/// settles it.
pub fn apply_buff(player: &mut Player, kind: BuffKind, tuning: &PickupTuning) {
    match kind {
        BuffKind::Damage => {
            player.damage_boost = player.baseline_damage_boost() * tuning.damage_multiplier;
            player.buff_timer = tuning.boost_seconds;
        }
        BuffKind::Speed => {
            player.speed_boost = player.baseline_speed_boost() * tuning.speed_multiplier;
            player.buff_timer = tuning.boost_seconds;
        }
        BuffKind::Heal => player.heal(tuning.heal_amount),
        BuffKind::Invincible => player.invincible_timer = tuning.invincible_seconds,
        BuffKind::Bite => {
            player.damage_boost = player.baseline_damage_boost() * tuning.bite_multiplier;
            player.buff_timer = tuning.bite_seconds;
        }
        BuffKind::Queijada => player.has_queijada = true,
    }
}

pub fn collect_weapon(player: &mut Player, weapon: &Weapon) {
    player.weapon = Some(weapon.kind);
}

/// Every player gets both boosts at once.
pub fn apply_easter_egg(players: &mut [Player], tuning: &PickupTuning) {
    for player in players {
        player.damage_boost = player.baseline_damage_boost() * tuning.damage_multiplier;
        player.speed_boost = player.baseline_speed_boost() * tuning.speed_multiplier;
        player.buff_timer = tuning.boost_seconds;
    }
}
