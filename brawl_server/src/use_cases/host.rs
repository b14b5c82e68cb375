// Arena hosting: channel wiring and spawning of the world task.

use crate::domain::round::RoundRules;
use crate::domain::tuning::Tuning;
use crate::use_cases::arena::Arena;
use crate::use_cases::game::world_task;
use crate::use_cases::{GameEvent, ServerState, WorldOutput};
use axum::extract::ws::Utf8Bytes;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, broadcast, mpsc, watch};
use tokio::task::JoinHandle;

/// Configuration for spawning the arena world.
#[derive(Debug, Clone)]
pub struct ArenaSettings {
    /// Capacity for inbound player events.
    pub input_channel_capacity: usize,
    /// Capacity for broadcast world output.
    pub world_broadcast_capacity: usize,
    /// Fixed step of the simulation.
    pub tick_interval: Duration,
    /// Cap on steps run in one scheduler tick when catching up.
    pub max_catch_up_steps: u32,
    pub max_players: usize,
    pub rules: RoundRules,
    pub tuning: Tuning,
    /// Seed for reproducible matches; random when unset.
    pub seed: Option<u64>,
}

/// Channels into and out of the running arena.
#[derive(Clone)]
pub struct ArenaHandle {
    /// Sender for game events into the world task.
    pub input_tx: mpsc::Sender<GameEvent>,
    /// Broadcast sender for raw world output (snapshots and match events).
    pub output_tx: broadcast::Sender<WorldOutput>,
    /// Broadcast sender for serialized world output.
    pub output_bytes_tx: broadcast::Sender<Utf8Bytes>,
    /// Watch sender holding the latest serialized snapshot.
    pub snapshot_latest_tx: watch::Sender<Utf8Bytes>,
    /// Watch sender for high-level server state changes.
    pub server_state_tx: watch::Sender<ServerState>,
    /// Stops the world task after its current tick.
    pub shutdown: Arc<Notify>,
}

/// Creates the arena and spawns its authoritative world loop.
pub fn spawn_arena(settings: &ArenaSettings) -> (ArenaHandle, JoinHandle<()>) {
    let (input_tx, input_rx) = mpsc::channel::<GameEvent>(settings.input_channel_capacity);
    let (output_tx, _output_rx) =
        broadcast::channel::<WorldOutput>(settings.world_broadcast_capacity);
    let (output_bytes_tx, _output_bytes_rx) =
        broadcast::channel::<Utf8Bytes>(settings.world_broadcast_capacity);
    let (snapshot_latest_tx, _snapshot_latest_rx) =
        watch::channel::<Utf8Bytes>(Utf8Bytes::from(""));
    let (server_state_tx, _server_state_rx) = watch::channel::<ServerState>(ServerState::Lobby);
    let shutdown = Arc::new(Notify::new());

    let arena = Arena::new(
        settings.rules,
        settings.tuning,
        settings.max_players,
        settings.seed,
    );
    let world = tokio::spawn(world_task(
        input_rx,
        output_tx.clone(),
        server_state_tx.clone(),
        settings.tick_interval,
        settings.max_catch_up_steps,
        shutdown.clone(),
        arena,
    ));

    let handle = ArenaHandle {
        input_tx,
        output_tx,
        output_bytes_tx,
        snapshot_latest_tx,
        server_state_tx,
        shutdown,
    };
    (handle, world)
}
