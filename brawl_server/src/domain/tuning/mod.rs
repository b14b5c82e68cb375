// Gameplay tuning, kept apart from runtime/server configuration.

pub mod combat;
pub mod pickups;
pub mod player;
pub mod projectile;

use combat::CombatTuning;
use pickups::PickupTuning;
use player::PlayerTuning;
use projectile::ProjectileTuning;

#[derive(Debug, Clone, Copy, Default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub projectile: ProjectileTuning,
    pub combat: CombatTuning,
    pub pickups: PickupTuning,
}
