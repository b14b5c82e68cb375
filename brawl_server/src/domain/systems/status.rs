use crate::domain::entities::{AnimationState, Player};

/// Counts every per-player timer down by `dt` and clears the state each one guards.
pub fn tick_timers(player: &mut Player, dt: f32) {
    player.attack_cooldown = (player.attack_cooldown - dt).max(0.0);

    if player.is_dodging {
        player.dodge_timer -= dt;
        if player.dodge_timer <= 0.0 {
            player.is_dodging = false;
            player.dodge_timer = 0.0;
        }
    }

    if player.buff_timer > 0.0 {
        player.buff_timer -= dt;
        if player.buff_timer <= 0.0 {
            player.buff_timer = 0.0;
            player.damage_boost = player.baseline_damage_boost();
            player.speed_boost = player.baseline_speed_boost();
        }
    }

    if player.is_blinded {
        player.blind_timer -= dt;
        if player.blind_timer <= 0.0 {
            player.is_blinded = false;
            player.blind_timer = 0.0;
        }
    }

    player.invincible_timer = (player.invincible_timer - dt).max(0.0);

    // Climbing runs until the climb finishes, not on a timer.
    if player.animation != AnimationState::Idle && player.animation != AnimationState::Climbing {
        player.animation_timer -= dt;
        if player.animation_timer <= 0.0 {
            player.animation = AnimationState::Idle;
            player.animation_timer = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{BuffKind, ClassKind};
    use crate::domain::physics::{BodyDesc, CollisionType, Shape, Vec2, World};
    use crate::domain::systems::pickups::apply_buff;
    use crate::domain::tuning::pickups::PickupTuning;

    fn player(class: ClassKind) -> Player {
        let mut world = World::new(Vec2::zeros(), 1.0);
        let body = world.add(BodyDesc::dynamic(
            Shape::rect(25.0, 45.0),
            CollisionType::Player,
            10.0,
        ));
        let mut player = Player::new(3, body, "blue", Vec2::zeros());
        player.apply_class(class);
        player
    }

    #[test]
    fn when_buff_expires_then_boosts_return_to_class_baseline() {
        let mut p = player(ClassKind::Archer);
        p.damage_boost = 1.5;
        p.speed_boost = 1.8;
        p.buff_timer = 0.1;

        tick_timers(&mut p, 0.05);
        assert_eq!(p.damage_boost, 1.5);

        tick_timers(&mut p, 0.1);
        assert_eq!(p.damage_boost, 1.0);
        assert_eq!(p.speed_boost, 1.2);
        assert_eq!(p.buff_timer, 0.0);
    }

    #[test]
    fn when_ten_second_buff_is_ticked_at_sixty_hertz_then_it_reverts_around_tick_600() {
        let mut p = player(ClassKind::Fighter);
        apply_buff(&mut p, BuffKind::Damage, &PickupTuning::default());
        let boosted = p.damage_boost;
        assert!(boosted > p.baseline_damage_boost());

        let dt = 1.0 / 60.0;
        let mut reverted_at = None;
        for tick in 1..=605 {
            tick_timers(&mut p, dt);
            if tick <= 598 {
                assert_eq!(p.damage_boost, boosted, "reverted early at tick {tick}");
            }
            if reverted_at.is_none() && p.damage_boost == p.baseline_damage_boost() {
                reverted_at = Some(tick);
            }
        }

        let tick = reverted_at.expect("buff expired");
        assert!((599..=601).contains(&tick), "reverted at tick {tick}");
        assert_eq!(p.buff_timer, 0.0);
    }

    #[test]
    fn when_dodge_and_blind_run_out_then_flags_clear() {
        let mut p = player(ClassKind::Mage);
        p.is_dodging = true;
        p.dodge_timer = 0.5;
        p.is_blinded = true;
        p.blind_timer = 0.2;

        tick_timers(&mut p, 0.3);
        assert!(p.is_dodging);
        assert!(!p.is_blinded);

        tick_timers(&mut p, 0.3);
        assert!(!p.is_dodging);
    }

    #[test]
    fn when_action_animation_ends_then_player_returns_to_idle() {
        let mut p = player(ClassKind::Fighter);
        p.play(AnimationState::Attacking, 0.1);
        p.attack_cooldown = 0.5;

        tick_timers(&mut p, 0.2);

        assert_eq!(p.animation, AnimationState::Idle);
        assert!((p.attack_cooldown - 0.3).abs() < 1e-6);
    }

    #[test]
    fn when_climbing_then_animation_is_kept() {
        let mut p = player(ClassKind::Fighter);
        p.play(AnimationState::Climbing, 0.0);

        tick_timers(&mut p, 1.0);

        assert_eq!(p.animation, AnimationState::Climbing);
    }
}
