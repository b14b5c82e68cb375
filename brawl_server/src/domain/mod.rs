// Domain layer: physics, entities and match rules.

pub mod entities;
pub mod errors;
pub mod events;
pub mod levels;
pub mod physics;
pub mod round;
pub mod state;
pub mod systems;
pub mod tuning;

pub use entities::{BuffKind, ClassKind, PlayerId, WeaponKind};
pub use errors::SimError;
pub use events::{MatchEvent, Scores};
pub use state::PlayerInput;
