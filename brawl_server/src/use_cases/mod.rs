// Use cases layer: the arena, its world task and hosting.

pub mod arena;
pub mod game;
pub mod host;
pub mod types;

pub use arena::Arena;
pub use host::{ArenaHandle, ArenaSettings, spawn_arena};
pub use types::{GameEvent, JoinAccepted, JoinError, ServerState, WorldOutput, WorldUpdate};
