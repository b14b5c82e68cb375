use crate::domain::entities::{AnimationState, Platform, Player};
use crate::domain::physics::{Arbiter, RigidBody, Surface, Vec2, apply_impulse, teleport};
use crate::domain::state::PlayerInput;
use crate::domain::tuning::player::PlayerTuning;

/// How far a rider's lower edge may sit below a platform's top and still land on it.
pub const GROUND_TOLERANCE: f32 = 5.0;

/// Pre-solve filter for platform (a) against a rider (b). One-way platforms only hold riders
/// that come down onto their top face.
pub fn platform_pre_solve(arbiter: &Arbiter) -> bool {
    !arbiter.a.one_way || lands_on_top(&arbiter.a, &arbiter.b)
}

/// Rider is at or above the platform top at the start of the step and is not moving up
/// relative to it.
pub fn lands_on_top(platform: &Surface, rider: &Surface) -> bool {
    let rising = rider.velocity.y - platform.velocity.y < 0.0;
    rider.bottom <= platform.top + GROUND_TOLERANCE && !rising
}

/// True when an accepted platform contact is holding the rider up from below.
pub fn supports(normal: Vec2, platform_velocity: Vec2, rider_velocity: Vec2) -> bool {
    // Normal points from the platform to the rider; up is -y.
    normal.y < -0.5 && rider_velocity.y - platform_velocity.y > -1e-3
}

/// Applies the movement part of an input message: run, jump, dodge.
pub fn apply_movement(
    player: &mut Player,
    body: &mut RigidBody,
    input: &PlayerInput,
    tuning: &PlayerTuning,
) {
    let speed = tuning.move_speed * player.speed_boost;
    let mut velocity = *body.linvel();
    if input.left {
        velocity.x = -speed;
        player.facing_right = false;
    } else if input.right {
        velocity.x = speed;
        player.facing_right = true;
    } else {
        velocity.x = 0.0;
    }

    if input.jump && player.can_jump {
        velocity.y = tuning.jump_velocity;
        player.can_jump = false;
    }
    body.set_linvel(velocity, true);

    if input.dodge && !player.is_dodging {
        player.is_dodging = true;
        player.dodge_timer = tuning.dodge_seconds;
        player.play(AnimationState::Dodging, tuning.dodge_seconds);
        apply_impulse(
            body,
            Vec2::new(player.facing_sign() * tuning.dodge_impulse, 0.0),
            tuning.mass,
        );
    }
}

/// Looks for a platform edge within reach and starts climbing onto it.
pub fn try_climb(player: &mut Player, platforms: &[Platform], tuning: &PlayerTuning) -> bool {
    if player.is_climbing {
        return false;
    }
    let position = player.position;
    let target = platforms.iter().find(|platform| {
        (position.x - platform.position.x).abs() < platform.width / 2.0 + tuning.climb_margin
            && position.y > platform.top() - tuning.climb_reach
            && position.y < platform.bottom()
    });
    let Some(platform) = target else {
        return false;
    };

    player.is_climbing = true;
    player.climb_target = Some(Vec2::new(
        platform.position.x,
        platform.top() - tuning.height / 2.0,
    ));
    player.play(AnimationState::Climbing, 0.0);
    true
}

/// Steers a climbing player towards the target and snaps once close enough.
pub fn update_climb(player: &mut Player, body: &mut RigidBody, tuning: &PlayerTuning) {
    if !player.is_climbing {
        return;
    }
    let Some(target) = player.climb_target else {
        player.is_climbing = false;
        return;
    };

    let offset = target - body.translation();
    if offset.x.abs() < tuning.climb_snap && offset.y.abs() < tuning.climb_snap {
        teleport(body, target);
        player.is_climbing = false;
        player.climb_target = None;
        player.can_jump = true;
        player.animation = AnimationState::Idle;
    } else {
        body.set_linvel(offset * tuning.climb_gain, true);
    }
}

pub fn clamp_fall_speed(body: &mut RigidBody, tuning: &PlayerTuning) {
    let velocity = *body.linvel();
    if velocity.y > tuning.max_fall_speed {
        body.set_linvel(Vec2::new(velocity.x, tuning.max_fall_speed), true);
    }
}
