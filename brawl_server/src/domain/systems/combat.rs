use crate::domain::entities::{
    AnimationState, ClassKind, Player, PlayerId, Projectile, WeaponKind, pair_mut,
};
use crate::domain::errors::SimError;
use crate::domain::events::{MatchEvent, StolenBuff};
use crate::domain::physics::{BodyDesc, CollisionType, Shape, Vec2, World, apply_impulse};
use crate::domain::tuning::combat::CombatTuning;
use crate::domain::tuning::player::PlayerTuning;
use crate::domain::tuning::projectile::ProjectileTuning;
use std::f32::consts::{PI, TAU};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackMode {
    Melee,
    Ranged,
}

/// What an attack input does for a class holding `weapon`. Unarmed players cannot attack.
pub fn attack_mode(class: ClassKind, weapon: Option<WeaponKind>) -> Option<AttackMode> {
    match (class, weapon?) {
        (ClassKind::Fighter, WeaponKind::Sword) => Some(AttackMode::Melee),
        _ => Some(AttackMode::Ranged),
    }
}

/// Outcome of a projectile reaching a defender.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    Damage { amount: i32 },
    Blind { seconds: f32 },
    StealBuff { buff: StolenBuff },
    StealQueijada,
}

/// A player brought to zero health, with the player credited for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Knockout {
    pub victim: PlayerId,
    pub killer: Option<PlayerId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// The projectile keeps flying (owner or dodging defender).
    Ignored,
    Consumed { knockout: Option<Knockout> },
}

/// Absolute angular distance between two bearings, in `[0, PI]`.
pub fn angle_between(a: f32, b: f32) -> f32 {
    let mut difference = (a - b) % TAU;
    if difference > PI {
        difference -= TAU;
    } else if difference < -PI {
        difference += TAU;
    }
    difference.abs()
}

/// Range and facing-cone test for melee hits.
pub fn in_melee_arc(origin: Vec2, facing_right: bool, target: Vec2, range: f32, arc: f32) -> bool {
    let offset = target - origin;
    let distance = offset.norm();
    if distance > range {
        return false;
    }
    if distance <= f32::EPSILON {
        return true;
    }
    let bearing = offset.y.atan2(offset.x);
    let facing = if facing_right { 0.0 } else { PI };
    angle_between(bearing, facing) <= arc / 2.0
}

/// Decides what a projectile fired by `class` does to `defender`. The archer can only steal
/// while its shooter is still in the match.
pub fn resolve_special_ability(
    class: ClassKind,
    attacker: Option<&Player>,
    defender: &Player,
    damage: i32,
    tuning: &ProjectileTuning,
) -> Effect {
    match class {
        ClassKind::Mage => Effect::Blind {
            seconds: tuning.blind_seconds,
        },
        ClassKind::Archer if attacker.is_some() => {
            if defender.damage_boost > defender.baseline_damage_boost() {
                Effect::StealBuff {
                    buff: StolenBuff::Damage,
                }
            } else if defender.speed_boost > defender.baseline_speed_boost() {
                Effect::StealBuff {
                    buff: StolenBuff::Speed,
                }
            } else if defender.has_queijada {
                Effect::StealQueijada
            } else {
                Effect::Damage { amount: damage }
            }
        }
        ClassKind::Archer | ClassKind::Fighter => Effect::Damage { amount: damage },
    }
}

/// Swings at every eligible player in the attacker's facing cone.
pub fn resolve_melee(
    attacker_index: usize,
    players: &mut [Player],
    world: &mut World,
    tuning: &CombatTuning,
    player_tuning: &PlayerTuning,
    events: &mut Vec<MatchEvent>,
) -> Vec<Knockout> {
    let Some(attacker) = players.get(attacker_index) else {
        return Vec::new();
    };
    let (attacker_id, origin, facing_right) =
        (attacker.id, attacker.position, attacker.facing_right);
    let damage = (tuning.melee_damage as f32 * attacker.damage_boost) as i32;

    let mut knockouts = Vec::new();
    for defender in players.iter_mut().filter(|p| p.id != attacker_id) {
        if defender.is_dodging || defender.is_invincible() {
            continue;
        }
        if !in_melee_arc(
            origin,
            facing_right,
            defender.position,
            tuning.melee_range,
            tuning.melee_arc,
        ) {
            continue;
        }

        let offset = defender.position - origin;
        let bearing = offset.y.atan2(offset.x);
        if let Some(body) = world.body_mut(defender.body) {
            apply_impulse(
                body,
                Vec2::new(bearing.cos(), bearing.sin()) * tuning.melee_knockback,
                player_tuning.mass,
            );
        }
        defender.play(AnimationState::Hit, player_tuning.action_animation_seconds);
        let down = defender.take_damage(damage);
        debug!(
            attacker_id,
            target_id = defender.id,
            damage,
            health = defender.health,
            "melee hit"
        );
        events.push(MatchEvent::Attack {
            attacker: attacker_id,
            target: defender.id,
            weapon: WeaponKind::Sword,
        });
        if down {
            knockouts.push(Knockout {
                victim: defender.id,
                killer: Some(attacker_id),
            });
        }
    }
    knockouts
}

/// Spawns a projectile in front of the shooter.
pub fn fire_projectile(
    shooter: &Player,
    world: &mut World,
    tuning: &ProjectileTuning,
    id: u64,
) -> Projectile {
    let direction = shooter.facing_sign();
    let radius = match shooter.class {
        ClassKind::Mage => tuning.mage_radius,
        _ => tuning.radius,
    };
    let damage = match shooter.class {
        ClassKind::Archer => tuning.archer_damage,
        _ => (tuning.damage as f32 * shooter.damage_boost) as i32,
    };
    let position = shooter.position + Vec2::new(direction * tuning.spawn_offset, 0.0);
    let velocity = Vec2::new(shooter.projectile_speed * direction, 0.0);
    let body = world.add(
        BodyDesc::kinematic_velocity_based(Shape::circle(radius), CollisionType::Projectile)
            .at(position)
            .with_velocity(velocity)
            .as_sensor(),
    );
    Projectile {
        id,
        body,
        owner_id: shooter.id,
        class: shooter.class,
        damage,
        position,
        velocity,
    }
}

/// Applies a projectile touching `players[defender_index]`. The caller removes consumed
/// projectiles from the world.
pub fn resolve_projectile_hit(
    projectile: &Projectile,
    defender_index: usize,
    players: &mut [Player],
    world: &mut World,
    tuning: &ProjectileTuning,
    player_tuning: &PlayerTuning,
    events: &mut Vec<MatchEvent>,
) -> Result<HitOutcome, SimError> {
    let Some(defender) = players.get(defender_index) else {
        return Ok(HitOutcome::Ignored);
    };
    if defender.id == projectile.owner_id || defender.is_dodging {
        return Ok(HitOutcome::Ignored);
    }
    let attacker_index = players.iter().position(|p| p.id == projectile.owner_id);
    let effect = resolve_special_ability(
        projectile.class,
        attacker_index.map(|i| &players[i]),
        &players[defender_index],
        projectile.damage,
        tuning,
    );

    let mut knockout = None;
    match effect {
        Effect::Damage { amount } => {
            let defender = &mut players[defender_index];
            if !defender.is_invincible() {
                let away = (defender.position.x - projectile.position.x).signum();
                let body = world.body_mut(defender.body).ok_or(SimError::MissingBody {
                    entity: "player",
                    id: defender.id,
                })?;
                apply_impulse(
                    body,
                    Vec2::new(tuning.knockback_x * away, tuning.knockback_y),
                    player_tuning.mass,
                );
                defender.play(AnimationState::Hit, player_tuning.action_animation_seconds);
                if defender.take_damage(amount) {
                    knockout = Some(Knockout {
                        victim: defender.id,
                        killer: Some(projectile.owner_id),
                    });
                }
            }
            events.push(MatchEvent::Attack {
                attacker: projectile.owner_id,
                target: defender.id,
                weapon: WeaponKind::Gun,
            });
        }
        Effect::Blind { seconds } => {
            let defender = &mut players[defender_index];
            defender.is_blinded = true;
            defender.blind_timer = seconds;
            events.push(MatchEvent::Attack {
                attacker: projectile.owner_id,
                target: defender.id,
                weapon: WeaponKind::Gun,
            });
        }
        Effect::StealBuff { buff } => {
            let Some((attacker, defender)) = attacker_index
                .and_then(|attacker_index| pair_mut(players, attacker_index, defender_index))
            else {
                return Ok(HitOutcome::Ignored);
            };
            match buff {
                StolenBuff::Damage => {
                    attacker.damage_boost = defender.damage_boost;
                    defender.damage_boost = defender.baseline_damage_boost();
                }
                StolenBuff::Speed => {
                    attacker.speed_boost = defender.speed_boost;
                    defender.speed_boost = defender.baseline_speed_boost();
                }
            }
            attacker.buff_timer = tuning.steal_seconds;
            events.push(MatchEvent::StealBuff {
                stealer: attacker.id,
                target: defender.id,
                buff,
            });
        }
        Effect::StealQueijada => {
            let Some((attacker, defender)) = attacker_index
                .and_then(|attacker_index| pair_mut(players, attacker_index, defender_index))
            else {
                return Ok(HitOutcome::Ignored);
            };
            defender.has_queijada = false;
            attacker.has_queijada = true;
            events.push(MatchEvent::StealQueijada {
                stealer: attacker.id,
                target: defender.id,
            });
        }
    }
    Ok(HitOutcome::Consumed { knockout })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    struct Arena {
        world: World,
        players: Vec<Player>,
    }

    fn arena(specs: &[(PlayerId, ClassKind, Vec2)]) -> Arena {
        let mut world = World::new(Vec2::zeros(), 1.0);
        let players = specs
            .iter()
            .map(|&(id, class, position)| {
                let body = world.add(
                    BodyDesc::dynamic(Shape::rect(25.0, 45.0), CollisionType::Player, 10.0)
                        .at(position),
                );
                let mut player = Player::new(id, body, "red", position);
                player.apply_class(class);
                player
            })
            .collect();
        Arena { world, players }
    }

    fn velocity(arena: &Arena, index: usize) -> Vec2 {
        *arena
            .world
            .body(arena.players[index].body)
            .expect("player body")
            .linvel()
    }

    #[test]
    fn when_defender_is_ahead_within_range_then_melee_hits() {
        let origin = Vec2::zeros();
        assert!(in_melee_arc(origin, true, Vec2::new(50.0, 0.0), 90.0, FRAC_PI_2));
        // Bearing ~58 degrees, outside the 45 degree half arc.
        assert!(!in_melee_arc(origin, true, Vec2::new(50.0, 80.0), 200.0, FRAC_PI_2));
        assert!(!in_melee_arc(origin, true, Vec2::new(50.0, 80.0), 90.0, FRAC_PI_2));
        assert!(!in_melee_arc(origin, true, Vec2::new(200.0, 0.0), 90.0, FRAC_PI_2));
    }

    #[test]
    fn when_facing_left_then_targets_just_above_or_below_the_axis_are_hit() {
        let origin = Vec2::zeros();
        assert!(in_melee_arc(origin, false, Vec2::new(-50.0, -10.0), 90.0, FRAC_PI_2));
        assert!(in_melee_arc(origin, false, Vec2::new(-50.0, 10.0), 90.0, FRAC_PI_2));
        assert!(!in_melee_arc(origin, false, Vec2::new(50.0, 0.0), 90.0, FRAC_PI_2));
    }

    #[test]
    fn when_class_and_weapon_pair_then_attack_mode_follows() {
        assert_eq!(
            attack_mode(ClassKind::Fighter, Some(WeaponKind::Sword)),
            Some(AttackMode::Melee)
        );
        assert_eq!(
            attack_mode(ClassKind::Fighter, Some(WeaponKind::Gun)),
            Some(AttackMode::Ranged)
        );
        assert_eq!(
            attack_mode(ClassKind::Mage, Some(WeaponKind::Sword)),
            Some(AttackMode::Ranged)
        );
        assert_eq!(attack_mode(ClassKind::Archer, None), None);
    }

    #[test]
    fn when_melee_lands_then_damage_scales_with_boost_and_knockback_points_away() {
        let mut arena = arena(&[
            (1, ClassKind::Fighter, Vec2::new(300.0, 500.0)),
            (2, ClassKind::Mage, Vec2::new(350.0, 500.0)),
        ]);
        let mut events = Vec::new();

        let knockouts = resolve_melee(
            0,
            &mut arena.players,
            &mut arena.world,
            &CombatTuning::default(),
            &PlayerTuning::default(),
            &mut events,
        );

        // 35 * 1.3 = 45.5, truncated.
        assert_eq!(arena.players[1].health, 55);
        assert!(knockouts.is_empty());
        assert!(velocity(&arena, 1).x > 249.0);
        assert_eq!(arena.players[1].animation, AnimationState::Hit);
        assert_eq!(
            events,
            vec![MatchEvent::Attack {
                attacker: 1,
                target: 2,
                weapon: WeaponKind::Sword,
            }]
        );
    }

    #[test]
    fn when_defender_is_dodging_or_invincible_then_melee_does_nothing() {
        let mut arena = arena(&[
            (1, ClassKind::Fighter, Vec2::new(300.0, 500.0)),
            (2, ClassKind::Mage, Vec2::new(350.0, 500.0)),
            (3, ClassKind::Mage, Vec2::new(340.0, 490.0)),
        ]);
        arena.players[1].is_dodging = true;
        arena.players[2].invincible_timer = 1.0;
        let mut events = Vec::new();

        resolve_melee(
            0,
            &mut arena.players,
            &mut arena.world,
            &CombatTuning::default(),
            &PlayerTuning::default(),
            &mut events,
        );

        assert_eq!(arena.players[1].health, 100);
        assert_eq!(arena.players[2].health, 100);
        assert!(events.is_empty());
    }

    #[test]
    fn when_melee_drops_health_to_zero_then_knockout_credits_attacker() {
        let mut arena = arena(&[
            (1, ClassKind::Fighter, Vec2::new(300.0, 500.0)),
            (2, ClassKind::Archer, Vec2::new(350.0, 500.0)),
        ]);
        arena.players[1].health = 20;
        let mut events = Vec::new();

        let knockouts = resolve_melee(
            0,
            &mut arena.players,
            &mut arena.world,
            &CombatTuning::default(),
            &PlayerTuning::default(),
            &mut events,
        );

        assert_eq!(arena.players[1].health, 0);
        assert_eq!(
            knockouts,
            vec![Knockout {
                victim: 2,
                killer: Some(1)
            }]
        );
    }

    #[test]
    fn when_classes_differ_then_special_ability_resolves_per_class() {
        let arena = arena(&[
            (1, ClassKind::Archer, Vec2::zeros()),
            (2, ClassKind::Fighter, Vec2::zeros()),
        ]);
        let tuning = ProjectileTuning::default();
        let (shooter, target) = (&arena.players[0], &arena.players[1]);

        assert_eq!(
            resolve_special_ability(ClassKind::Mage, Some(shooter), target, 15, &tuning),
            Effect::Blind { seconds: 3.0 }
        );
        // Fighter baseline boost (1.3) is not a buff to steal.
        assert_eq!(
            resolve_special_ability(ClassKind::Archer, Some(shooter), target, 10, &tuning),
            Effect::Damage { amount: 10 }
        );

        let mut buffed = target.clone();
        buffed.damage_boost = 1.95;
        assert_eq!(
            resolve_special_ability(ClassKind::Archer, Some(shooter), &buffed, 10, &tuning),
            Effect::StealBuff {
                buff: StolenBuff::Damage
            }
        );
        assert_eq!(
            resolve_special_ability(ClassKind::Archer, None, &buffed, 10, &tuning),
            Effect::Damage { amount: 10 }
        );

        let mut holder = target.clone();
        holder.has_queijada = true;
        assert_eq!(
            resolve_special_ability(ClassKind::Archer, Some(shooter), &holder, 10, &tuning),
            Effect::StealQueijada
        );
    }

    #[test]
    fn when_projectile_touches_owner_or_dodger_then_it_is_ignored() {
        let mut arena = arena(&[
            (1, ClassKind::Fighter, Vec2::new(100.0, 500.0)),
            (2, ClassKind::Mage, Vec2::new(200.0, 500.0)),
        ]);
        arena.players[0].weapon = Some(WeaponKind::Gun);
        let tuning = ProjectileTuning::default();
        let projectile = fire_projectile(&arena.players[0], &mut arena.world, &tuning, 1);
        arena.players[1].is_dodging = true;
        let mut events = Vec::new();

        for index in 0..2 {
            let outcome = resolve_projectile_hit(
                &projectile,
                index,
                &mut arena.players,
                &mut arena.world,
                &tuning,
                &PlayerTuning::default(),
                &mut events,
            )
            .expect("bodies exist");
            assert_eq!(outcome, HitOutcome::Ignored);
        }
        assert_eq!(arena.players[1].health, 100);
        assert!(events.is_empty());
    }

    #[test]
    fn when_fighter_projectile_hits_then_boosted_damage_and_knockback_apply() {
        let mut arena = arena(&[
            (1, ClassKind::Fighter, Vec2::new(100.0, 500.0)),
            (2, ClassKind::Mage, Vec2::new(200.0, 500.0)),
        ]);
        let tuning = ProjectileTuning::default();
        let projectile = fire_projectile(&arena.players[0], &mut arena.world, &tuning, 1);
        // 20 * 1.3 = 26.
        assert_eq!(projectile.damage, 26);
        assert_eq!(projectile.position, Vec2::new(130.0, 500.0));
        assert_eq!(projectile.velocity, Vec2::new(400.0, 0.0));
        let shot = arena.world.body(projectile.body).expect("projectile body");
        assert!(shot.is_kinematic());
        assert_eq!(*shot.linvel(), Vec2::new(400.0, 0.0));
        let mut events = Vec::new();

        let outcome = resolve_projectile_hit(
            &projectile,
            1,
            &mut arena.players,
            &mut arena.world,
            &tuning,
            &PlayerTuning::default(),
            &mut events,
        )
        .expect("bodies exist");

        assert_eq!(outcome, HitOutcome::Consumed { knockout: None });
        assert_eq!(arena.players[1].health, 74);
        assert_eq!(velocity(&arena, 1), Vec2::new(100.0, -50.0));
    }

    #[test]
    fn when_archer_steals_a_damage_buff_then_boost_moves_to_the_shooter() {
        let mut arena = arena(&[
            (1, ClassKind::Archer, Vec2::new(100.0, 500.0)),
            (2, ClassKind::Mage, Vec2::new(200.0, 500.0)),
        ]);
        arena.players[1].damage_boost = 1.5;
        arena.players[1].buff_timer = 8.0;
        let tuning = ProjectileTuning::default();
        let projectile = fire_projectile(&arena.players[0], &mut arena.world, &tuning, 1);
        let mut events = Vec::new();

        resolve_projectile_hit(
            &projectile,
            1,
            &mut arena.players,
            &mut arena.world,
            &tuning,
            &PlayerTuning::default(),
            &mut events,
        )
        .expect("bodies exist");

        assert_eq!(arena.players[0].damage_boost, 1.5);
        assert_eq!(arena.players[0].buff_timer, 5.0);
        assert_eq!(arena.players[1].damage_boost, 1.0);
        assert_eq!(arena.players[1].health, 100);
        assert_eq!(
            events,
            vec![MatchEvent::StealBuff {
                stealer: 1,
                target: 2,
                buff: StolenBuff::Damage,
            }]
        );
    }

    #[test]
    fn when_mage_projectile_hits_then_target_is_blinded_without_damage() {
        let mut arena = arena(&[
            (1, ClassKind::Mage, Vec2::new(100.0, 500.0)),
            (2, ClassKind::Fighter, Vec2::new(200.0, 500.0)),
        ]);
        let tuning = ProjectileTuning::default();
        let projectile = fire_projectile(&arena.players[0], &mut arena.world, &tuning, 1);
        let mut events = Vec::new();

        resolve_projectile_hit(
            &projectile,
            1,
            &mut arena.players,
            &mut arena.world,
            &tuning,
            &PlayerTuning::default(),
            &mut events,
        )
        .expect("bodies exist");

        assert!(arena.players[1].is_blinded);
        assert_eq!(arena.players[1].blind_timer, 3.0);
        assert_eq!(arena.players[1].health, 150);
    }
}
