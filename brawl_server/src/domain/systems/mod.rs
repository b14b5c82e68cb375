// Per-tick gameplay systems operating on entities and the physics world.

pub mod combat;
pub mod movement;
pub mod pickups;
pub mod platforms;
pub mod status;
