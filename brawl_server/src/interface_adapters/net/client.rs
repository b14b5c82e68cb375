use crate::domain::PlayerId;
use crate::interface_adapters::protocol::{ClientMessage, GameStateDto, ServerMessage};
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::utils::rng::rand_id;
use crate::use_cases::{ArenaHandle, GameEvent, JoinError, ServerState, WorldOutput};

use axum::{
    Error,
    extract::{
        State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures::SinkExt;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{Instrument, Span, debug, error, info, info_span, warn};

const LOG_THROTTLE: Duration = Duration::from_secs(2);
const MAX_INVALID_JSON: u32 = 10;

#[derive(Debug)]
enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
    InputClosed,
    WorldOutputClosed,
    ServerStateClosed,
    JoinRejected(JoinError),
    JoinDropped,
}

impl From<axum::Error> for NetError {
    fn from(e: axum::Error) -> Self {
        NetError::Ws(e)
    }
}

/// Serializes everything the world task publishes exactly once and fans the bytes out.
pub async fn world_output_serializer(
    mut output_rx: broadcast::Receiver<WorldOutput>,
    output_bytes_tx: broadcast::Sender<Utf8Bytes>,
    snapshot_latest_tx: watch::Sender<Utf8Bytes>,
) {
    loop {
        let output = match output_rx.recv().await {
            Ok(output) => output,
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(missed = n, "world serializer lagged; skipping to latest output");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => {
                warn!("world output channel closed; serializer exiting");
                break;
            }
        };

        let (msg, is_snapshot) = match output {
            WorldOutput::Update(update) => {
                (ServerMessage::GameState(GameStateDto::from(update)), true)
            }
            WorldOutput::Event(event) => (ServerMessage::from(event), false),
        };
        let bytes = match serde_json::to_string(&msg) {
            Ok(txt) => Utf8Bytes::from(txt),
            Err(e) => {
                error!(error = ?e, "failed to serialize world output");
                continue;
            }
        };

        if is_snapshot {
            // Only snapshots are useful for lag recovery.
            let _ = snapshot_latest_tx.send(bytes.clone());
        }
        let _ = output_bytes_tx.send(bytes);
    }
}

pub fn spawn_arena_serializer(arena: &ArenaHandle) {
    tokio::spawn(world_output_serializer(
        arena.output_tx.subscribe(),
        arena.output_bytes_tx.clone(),
        arena.snapshot_latest_tx.clone(),
    ));
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let arena = state.arena.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, arena))
}

async fn handle_socket(socket: WebSocket, arena: ArenaHandle) {
    // Separate connection id for correlating logs before/after a player_id exists.
    let conn_id = rand_id();
    let span = info_span!("conn", conn_id, player_id = tracing::field::Empty);
    serve_connection(socket, arena).instrument(span).await;
}

async fn serve_connection(mut socket: WebSocket, arena: ArenaHandle) {
    let mut session = match join_arena(&mut socket, &arena).await {
        Ok(session) => session,
        Err(NetError::JoinRejected(reason)) => {
            info!(%reason, "connection refused");
            return;
        }
        Err(e) => {
            error!(error = ?e, "failed to bootstrap connection");
            let _ = send_close_with_reason(&mut socket, close_code::POLICY, "bootstrap failed")
                .await;
            return;
        }
    };

    Span::current().record("player_id", session.player_id);
    info!(player_id = session.player_id, color = session.color, "client connected");

    if let Err(e) = session.run(&mut socket).await {
        warn!(error = ?e, "client loop exited with error");
    }
}

enum LoopControl {
    Continue,
    Disconnect,
}

/// Rate limit for one kind of hot-path warning.
struct LogThrottle {
    last: Instant,
}

impl LogThrottle {
    fn new() -> Self {
        Self {
            last: Instant::now() - LOG_THROTTLE,
        }
    }

    fn ready(&mut self) -> bool {
        if self.last.elapsed() >= LOG_THROTTLE {
            self.last = Instant::now();
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Default)]
struct ConnStats {
    msgs_in: u64,
    msgs_out: u64,
    bytes_in: u64,
    bytes_out: u64,
    invalid_json: u32,
    // Snapshots resent because this client fell behind the broadcast.
    lag_recoveries: u64,
}

impl ConnStats {
    fn received(&mut self, len: usize) {
        self.msgs_in += 1;
        self.bytes_in += len as u64;
    }

    fn sent(&mut self, len: usize) {
        self.msgs_out += 1;
        self.bytes_out += len as u64;
    }
}

/// One attached player: the arena channels plus per-connection bookkeeping.
struct Session {
    player_id: PlayerId,
    color: &'static str,
    input_tx: mpsc::Sender<GameEvent>,
    output_bytes_rx: broadcast::Receiver<Utf8Bytes>,
    snapshot_latest_rx: watch::Receiver<Utf8Bytes>,
    server_state_rx: watch::Receiver<ServerState>,
    stats: ConnStats,
    input_full_log: LogThrottle,
    lag_log: LogThrottle,
    invalid_log: LogThrottle,
    close_frame: Option<CloseFrame>,
}

/// Asks the arena for a slot and sends the class prompt plus the current match state.
async fn join_arena(socket: &mut WebSocket, arena: &ArenaHandle) -> Result<Session, NetError> {
    // Subscribe before joining so nothing published after the join is missed.
    let output_bytes_rx = arena.output_bytes_tx.subscribe();
    let snapshot_latest_rx = arena.snapshot_latest_tx.subscribe();
    let server_state_rx = arena.server_state_tx.subscribe();

    let player_id = rand_id();
    let (reply_tx, reply_rx) = oneshot::channel();
    arena
        .input_tx
        .send(GameEvent::Join {
            player_id,
            reply: reply_tx,
        })
        .await
        .map_err(|_| NetError::InputClosed)?;

    let accepted = match reply_rx.await {
        Ok(Ok(accepted)) => accepted,
        Ok(Err(reason)) => {
            let _ = send_close_with_reason(socket, close_code::POLICY, reason.reason()).await;
            return Err(NetError::JoinRejected(reason));
        }
        Err(_) => return Err(NetError::JoinDropped),
    };

    let mut session = Session {
        player_id,
        color: accepted.color,
        input_tx: arena.input_tx.clone(),
        output_bytes_rx,
        snapshot_latest_rx,
        server_state_rx,
        stats: ConnStats::default(),
        input_full_log: LogThrottle::new(),
        lag_log: LogThrottle::new(),
        invalid_log: LogThrottle::new(),
        close_frame: None,
    };

    // The arena now holds a player, so a failed greeting must be undone with Leave.
    if let Err(e) = session.greet(socket).await {
        arena
            .input_tx
            .send(GameEvent::Leave { player_id })
            .await
            .map_err(|_| NetError::InputClosed)?;
        return Err(e);
    }
    Ok(session)
}

impl Session {
    async fn greet(&mut self, socket: &mut WebSocket) -> Result<(), NetError> {
        let prompt = ServerMessage::ChooseClass {
            player_id: self.player_id.to_string(),
        };
        let len = send_message(socket, &prompt).await?;
        self.stats.sent(len);

        // Clone out of the watch so the borrow is not held across the await.
        let state = self.server_state_rx.borrow_and_update().clone();
        let len = send_message(socket, &ServerMessage::MatchState(state.into())).await?;
        self.stats.sent(len);
        Ok(())
    }

    async fn run(&mut self, socket: &mut WebSocket) -> Result<(), NetError> {
        let fatal = loop {
            let step = tokio::select! {
                incoming = socket.recv() => self.on_incoming(incoming),
                output = self.output_bytes_rx.recv() => self.on_world_output(socket, output).await,
                changed = self.server_state_rx.changed() => self.on_state_change(socket, changed).await,
            };
            match step {
                Ok(LoopControl::Continue) => {}
                Ok(LoopControl::Disconnect) => break None,
                Err(e) => break Some(e),
            }
        };

        if let Some(frame) = self.close_frame.take() {
            let _ = socket.send(Message::Close(Some(frame))).await;
        }
        if let Err(err) = socket.close().await.map_err(NetError::Ws) {
            debug!(error = ?err, "socket close error");
        }

        let cleanup = self.leave().await;
        if let Err(e) = &cleanup {
            warn!(error = ?e, "error during disconnect cleanup");
        }
        match fatal {
            Some(err) => Err(err),
            None => cleanup,
        }
    }

    fn on_incoming(
        &mut self,
        incoming: Option<Result<Message, Error>>,
    ) -> Result<LoopControl, NetError> {
        let player_id = self.player_id;
        let msg = match incoming {
            Some(Ok(msg)) => msg,
            Some(Err(e)) => {
                warn!(player_id, error = %e, "websocket recv error");
                return Ok(LoopControl::Disconnect);
            }
            None => {
                info!(player_id, "websocket closed");
                return Ok(LoopControl::Disconnect);
            }
        };

        let text = match msg {
            Message::Text(text) => text,
            Message::Binary(_) => {
                self.close_frame = Some(CloseFrame {
                    code: close_code::UNSUPPORTED,
                    reason: "unsupported".into(),
                });
                return Ok(LoopControl::Disconnect);
            }
            Message::Ping(_) | Message::Pong(_) => return Ok(LoopControl::Continue),
            Message::Close(_) => return Ok(LoopControl::Disconnect),
        };
        self.stats.received(text.len());

        match serde_json::from_str::<ClientMessage>(&text) {
            Ok(message) => {
                let event = self.game_event(message);
                self.queue(event)
            }
            Err(parse_err) => {
                self.stats.invalid_json += 1;
                if self.invalid_log.ready() {
                    warn!(
                        player_id,
                        bytes = text.len(),
                        error = %parse_err,
                        "failed to parse client message"
                    );
                }
                if self.stats.invalid_json > MAX_INVALID_JSON {
                    self.close_frame = Some(CloseFrame {
                        code: close_code::POLICY,
                        reason: "too many invalid messages".into(),
                    });
                    return Ok(LoopControl::Disconnect);
                }
                Ok(LoopControl::Continue)
            }
        }
    }

    fn game_event(&self, message: ClientMessage) -> GameEvent {
        let player_id = self.player_id;
        match message {
            ClientMessage::PlayerInput(input) => GameEvent::Input {
                player_id,
                input: input.into(),
            },
            ClientMessage::ClassChoice(choice) => GameEvent::ChooseClass {
                player_id,
                class: choice.class_type.into(),
            },
            ClientMessage::RequestLevelChange(request) => GameEvent::RequestLevelChange {
                player_id,
                level_name: request.level_name.unwrap_or_default(),
            },
        }
    }

    // Never waits on the world task; a full channel drops the event.
    fn queue(&mut self, event: GameEvent) -> Result<LoopControl, NetError> {
        match self.input_tx.try_send(event) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(mpsc::error::TrySendError::Full(_evt)) => {
                if self.input_full_log.ready() {
                    warn!(player_id = self.player_id, "input channel full; dropping event");
                }
                Ok(LoopControl::Continue)
            }
            Err(mpsc::error::TrySendError::Closed(_evt)) => Err(NetError::InputClosed),
        }
    }

    async fn on_world_output(
        &mut self,
        socket: &mut WebSocket,
        output: Result<Utf8Bytes, broadcast::error::RecvError>,
    ) -> Result<LoopControl, NetError> {
        match output {
            Ok(bytes) => Ok(self.forward(socket, bytes).await),
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                Ok(self.recover_from_lag(socket, missed).await)
            }
            Err(broadcast::error::RecvError::Closed) => Err(NetError::WorldOutputClosed),
        }
    }

    // Missed events are gone; the latest snapshot restores positions and scores.
    async fn recover_from_lag(&mut self, socket: &mut WebSocket, missed: u64) -> LoopControl {
        if self.lag_log.ready() {
            warn!(missed, "world output lagged; sending snapshot");
        }
        let latest = self.snapshot_latest_rx.borrow().clone();
        if latest.is_empty() {
            return LoopControl::Continue;
        }

        self.stats.lag_recoveries += 1;
        let bytes = latest.len();
        let outcome = self.forward(socket, latest).await;
        debug!(
            player_id = self.player_id,
            bytes,
            count = self.stats.lag_recoveries,
            "sent lag recovery snapshot"
        );
        outcome
    }

    async fn on_state_change(
        &mut self,
        socket: &mut WebSocket,
        changed: Result<(), watch::error::RecvError>,
    ) -> Result<LoopControl, NetError> {
        if changed.is_err() {
            warn!(player_id = self.player_id, "server state channel closed; disconnecting");
            return Err(NetError::ServerStateClosed);
        }

        let state = self.server_state_rx.borrow_and_update().clone();
        match send_message(socket, &ServerMessage::MatchState(state.into())).await {
            Ok(len) => {
                self.stats.sent(len);
                Ok(LoopControl::Continue)
            }
            Err(err) => {
                warn!(error = ?err, "failed to send server state");
                Ok(LoopControl::Disconnect)
            }
        }
    }

    async fn forward(&mut self, socket: &mut WebSocket, bytes: Utf8Bytes) -> LoopControl {
        let len = bytes.len();
        match socket.send(Message::Text(bytes)).await {
            Ok(()) => {
                self.stats.sent(len);
                LoopControl::Continue
            }
            Err(err) => {
                warn!(error = ?err, "failed to send world output");
                LoopControl::Disconnect
            }
        }
    }

    async fn leave(&self) -> Result<(), NetError> {
        // Leave must not be dropped, so wait for channel capacity.
        self.input_tx
            .send(GameEvent::Leave {
                player_id: self.player_id,
            })
            .await
            .map_err(|_| NetError::InputClosed)?;

        debug!(player_id = self.player_id, stats = ?self.stats, "connection stats");
        info!(player_id = self.player_id, "client disconnected");
        Ok(())
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<usize, NetError> {
    let txt = serde_json::to_string(msg).map_err(NetError::Serialization)?;
    let len = txt.len();
    socket
        .send(Message::Text(txt.into()))
        .await
        .map_err(NetError::Ws)?;
    Ok(len)
}

async fn send_close_with_reason(
    socket: &mut WebSocket,
    code: u16,
    reason: &'static str,
) -> Result<(), NetError> {
    socket
        .send(Message::Close(Some(CloseFrame {
            code,
            reason: reason.into(),
        })))
        .await
        .map_err(NetError::Ws)?;
    socket.close().await.map_err(NetError::Ws)
}
