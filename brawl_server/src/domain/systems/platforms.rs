use crate::domain::entities::{Oscillation, Platform, PlatformMotion};
use crate::domain::errors::SimError;
use crate::domain::physics::{Vec2, World};
use std::f32::consts::TAU;

/// Displacement from the anchor at time `t`.
pub fn oscillation_offset(oscillation: Oscillation, t: f32) -> f32 {
    oscillation.amplitude * (TAU * oscillation.frequency * t + oscillation.phase).sin()
}

/// Time derivative of `oscillation_offset`.
pub fn oscillation_velocity(oscillation: Oscillation, t: f32) -> f32 {
    oscillation.amplitude
        * TAU
        * oscillation.frequency
        * (TAU * oscillation.frequency * t + oscillation.phase).cos()
}

/// Position and velocity of a platform at time `t`.
pub fn platform_state(motion: PlatformMotion, anchor: Vec2, t: f32) -> (Vec2, Vec2) {
    match motion {
        PlatformMotion::Static => (anchor, Vec2::zeros()),
        PlatformMotion::Horizontal(o) => (
            Vec2::new(anchor.x + oscillation_offset(o, t), anchor.y),
            Vec2::new(oscillation_velocity(o, t), 0.0),
        ),
        PlatformMotion::Vertical(o) => (
            Vec2::new(anchor.x, anchor.y + oscillation_offset(o, t)),
            Vec2::new(0.0, oscillation_velocity(o, t)),
        ),
    }
}

/// Schedules every kinematic platform to reach its path position for time `t` at the end of
/// the next world step. Riders are carried by the velocity this implies.
pub fn advance_platforms(
    world: &mut World,
    platforms: &mut [Platform],
    t: f32,
) -> Result<(), SimError> {
    for (index, platform) in platforms.iter_mut().enumerate() {
        if platform.motion == PlatformMotion::Static {
            continue;
        }
        let (position, _) = platform_state(platform.motion, platform.anchor, t);
        let body = world
            .body_mut(platform.body)
            .ok_or(SimError::MissingBody {
                entity: "platform",
                id: index as u64,
            })?;
        body.set_next_kinematic_translation(position);
        platform.position = position;
    }
    Ok(())
}
