use super::arena::Arena;
use super::types::{GameEvent, ServerState, WorldOutput};
use crate::domain::errors::SimError;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Notify, broadcast, mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// Turns wall-clock time into a whole number of fixed simulation steps.
#[derive(Debug, Clone)]
pub struct FixedStep {
    step: Duration,
    max_steps: u32,
    accumulator: Duration,
}

impl FixedStep {
    pub fn new(step: Duration, max_steps: u32) -> Self {
        Self {
            step,
            max_steps,
            accumulator: Duration::ZERO,
        }
    }

    pub fn step_seconds(&self) -> f32 {
        self.step.as_secs_f32()
    }

    /// Adds `elapsed` and returns how many steps are due. Anything past `max_steps` is
    /// dropped instead of being carried into the next tick.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.step.is_zero() {
            return 0;
        }
        self.accumulator += elapsed;
        let mut due = 0;
        while self.accumulator >= self.step && due < self.max_steps {
            self.accumulator -= self.step;
            due += 1;
        }
        if self.accumulator >= self.step {
            warn!(
                backlog_ms = self.accumulator.as_millis() as u64,
                "simulation fell behind; dropping backlog"
            );
            self.accumulator = Duration::ZERO;
        }
        due
    }
}

/// Runs one unit of world work. Errors and panics are logged and reported as `false` so the
/// loop keeps ticking.
fn guarded<F>(tick: u64, work: &'static str, run: F) -> bool
where
    F: FnOnce() -> Result<(), SimError>,
{
    match catch_unwind(AssertUnwindSafe(run)) {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            error!(tick, work, error = %e, "world work failed");
            false
        }
        Err(_) => {
            error!(tick, work, "world work panicked");
            false
        }
    }
}

pub async fn world_task(
    mut input_rx: mpsc::Receiver<GameEvent>,
    output_tx: broadcast::Sender<WorldOutput>,
    server_state_tx: watch::Sender<ServerState>,
    tick_interval: Duration,
    max_catch_up_steps: u32,
    shutdown: Arc<Notify>,
    mut arena: Arena,
) {
    let mut tick: u64 = 0;
    let mut clock = FixedStep::new(tick_interval, max_catch_up_steps);
    let dt = clock.step_seconds();

    // Drive the fixed-step game loop at the configured tick rate.
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_tick = Instant::now();

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                info!(tick, "world task shutting down");
                break;
            }
            _ = interval.tick() => {}
        }

        // Handlers run between steps, never during one.
        while let Ok(event) = input_rx.try_recv() {
            guarded(tick, "game event", || arena.handle_event(event));
        }

        let now = Instant::now();
        let steps = clock.advance(now - last_tick);
        last_tick = now;

        for _ in 0..steps {
            tick += 1;
            // A failed step skips the rest of this tick.
            if !guarded(tick, "simulation step", || arena.step(dt)) {
                break;
            }
        }

        // Events first so clients see them before the snapshot that reflects them.
        for event in arena.drain_events() {
            let _ = output_tx.send(WorldOutput::Event(event));
        }
        if steps > 0 {
            let _ = output_tx.send(WorldOutput::Update(arena.snapshot(tick)));
        }

        let state = arena.server_state();
        server_state_tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                info!(tick, state = ?state, "server state changed");
                *current = state;
                true
            }
        });
    }
}
