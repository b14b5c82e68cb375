// Framework bootstrap for the game server runtime.

use crate::domain::tuning::Tuning;
use crate::frameworks::config;
use crate::interface_adapters::net::{spawn_arena_serializer, ws_handler};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{ArenaSettings, spawn_arena};

use axum::{Router, routing::get};
use std::future::Future;
use std::{io::Result, sync::Arc};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

fn arena_settings() -> ArenaSettings {
    ArenaSettings {
        input_channel_capacity: config::INPUT_CHANNEL_CAPACITY,
        world_broadcast_capacity: config::WORLD_BROADCAST_CAPACITY,
        tick_interval: config::TICK_INTERVAL,
        max_catch_up_steps: config::MAX_CATCH_UP_STEPS,
        max_players: config::MAX_PLAYERS,
        rules: config::round_rules(),
        tuning: Tuning::default(),
        seed: config::match_seed(),
    }
}

/// Serves until ctrl-c or SIGTERM.
pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    run_until(listener, shutdown_signal()).await
}

/// Serves until `shutdown` resolves, then lets the world task finish its current tick.
pub async fn run_until(
    listener: tokio::net::TcpListener,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let address = listener.local_addr()?;

    let settings = arena_settings();
    tracing::debug!(
        round_time = settings.rules.round_time,
        max_rounds = settings.rules.max_rounds,
        win_rule = ?settings.rules.win_rule,
        seeded = settings.seed.is_some(),
        "arena configured"
    );
    let (arena, world) = spawn_arena(&settings);
    spawn_arena_serializer(&arena);
    let arena_shutdown = arena.shutdown.clone();

    let state = Arc::new(AppState { arena });
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .with_state(state);

    tracing::info!(%address, "listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .inspect_err(|e| {
            tracing::error!(error = %e, "server error");
        });

    // A stored permit is picked up even if the world task is mid-tick.
    arena_shutdown.notify_one();
    if let Err(e) = world.await {
        tracing::error!(error = %e, "world task ended abnormally");
    }
    tracing::info!("server stopped");
    served
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let host = config::host();
    let port = config::http_port();
    let address = format!("{host}:{port}");

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
