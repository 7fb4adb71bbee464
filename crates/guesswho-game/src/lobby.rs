//! The lobby actor: one Tokio task that owns all game state.
//!
//! Client events (join, guess, new round, disconnect) become commands on
//! a single mpsc channel and are handled to completion in arrival order,
//! so the waiting slot and the room store never see concurrent mutation
//! and turn validation cannot race. Outbound notifications are
//! fire-and-forget sends into per-connection channels; a dead receiver is
//! silently dropped.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use guesswho_protocol::{ConnectionId, Recipient, RoomId, ServerEvent};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{mpsc, oneshot};

use crate::{
    Catalog, GameError, JoinOutcome, Matchmaker, Room, RoomStore,
};

/// Counter for generating unique room IDs.
static NEXT_ROOM_ID: AtomicU64 = AtomicU64::new(1);

/// Command channel size. Fills only if clients outpace the actor, in
/// which case senders wait (bounded channel backpressure).
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Channel sender for delivering outbound events to one connection.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// Commands sent to the lobby actor through its channel.
pub(crate) enum LobbyCommand {
    /// Register a connection's outbound route. Sent once per connection
    /// before any game event.
    Connect {
        conn: ConnectionId,
        sender: EventSender,
    },

    /// The connection wants to enter matchmaking.
    JoinGame { conn: ConnectionId, name: String },

    /// The connection submitted a guess.
    Guess {
        conn: ConnectionId,
        room_id: RoomId,
        guessed_name: String,
    },

    /// The connection requested the next round.
    NewRound { conn: ConnectionId, room_id: RoomId },

    /// The connection went away. Clears the waiting slot if held and
    /// tears down any room containing the connection.
    Disconnect { conn: ConnectionId },

    /// Request lobby-wide counters.
    Stats { reply: oneshot::Sender<LobbyStats> },

    /// Request a read-only view of one room.
    Snapshot {
        room_id: RoomId,
        reply: oneshot::Sender<Option<RoomSnapshot>>,
    },
}

/// Lobby-wide counters, returned by [`LobbyHandle::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LobbyStats {
    /// Number of live rooms.
    pub rooms: usize,
    /// Whether the waiting slot is occupied.
    pub waiting: bool,
    /// Number of registered connections.
    pub connections: usize,
}

/// A read-only view of one room's state, returned by
/// [`LobbyHandle::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSnapshot {
    pub room_id: RoomId,
    /// Players in turn order.
    pub players: [ConnectionId; 2],
    pub round_active: bool,
    pub current_turn: Option<ConnectionId>,
    pub last_winner: Option<ConnectionId>,
}

/// Handle to the running lobby actor. Cheap to clone; every connection
/// handler holds one.
#[derive(Clone)]
pub struct LobbyHandle {
    sender: mpsc::Sender<LobbyCommand>,
}

impl LobbyHandle {
    /// Registers a connection's outbound event channel.
    pub async fn connect(
        &self,
        conn: ConnectionId,
        sender: EventSender,
    ) -> Result<(), GameError> {
        self.send(LobbyCommand::Connect { conn, sender }).await
    }

    /// Enters the connection into matchmaking.
    pub async fn join_game(
        &self,
        conn: ConnectionId,
        name: String,
    ) -> Result<(), GameError> {
        self.send(LobbyCommand::JoinGame { conn, name }).await
    }

    /// Submits a guess (fire-and-forget; outcomes arrive as events).
    pub async fn guess(
        &self,
        conn: ConnectionId,
        room_id: RoomId,
        guessed_name: String,
    ) -> Result<(), GameError> {
        self.send(LobbyCommand::Guess { conn, room_id, guessed_name })
            .await
    }

    /// Requests the next round for a resolved room.
    pub async fn new_round(
        &self,
        conn: ConnectionId,
        room_id: RoomId,
    ) -> Result<(), GameError> {
        self.send(LobbyCommand::NewRound { conn, room_id }).await
    }

    /// Removes the connection from the waiting slot and any rooms.
    pub async fn disconnect(
        &self,
        conn: ConnectionId,
    ) -> Result<(), GameError> {
        self.send(LobbyCommand::Disconnect { conn }).await
    }

    /// Returns lobby-wide counters. Because commands are processed in
    /// order, the reply also acts as a barrier: every command sent
    /// before this call has been fully handled once it returns.
    pub async fn stats(&self) -> Result<LobbyStats, GameError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(LobbyCommand::Stats { reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| GameError::LobbyUnavailable)
    }

    /// Returns a read-only view of one room, if it exists.
    pub async fn snapshot(
        &self,
        room_id: RoomId,
    ) -> Result<Option<RoomSnapshot>, GameError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(LobbyCommand::Snapshot { room_id, reply: reply_tx })
            .await?;
        reply_rx.await.map_err(|_| GameError::LobbyUnavailable)
    }

    async fn send(&self, cmd: LobbyCommand) -> Result<(), GameError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| GameError::LobbyUnavailable)
    }
}

/// The internal lobby state. Runs inside a Tokio task.
struct LobbyActor<S: RoomStore> {
    catalog: Catalog,
    matchmaker: Matchmaker,
    rooms: S,
    /// Per-connection outbound channels.
    senders: HashMap<ConnectionId, EventSender>,
    rng: StdRng,
    receiver: mpsc::Receiver<LobbyCommand>,
}

impl<S: RoomStore> LobbyActor<S> {
    /// Runs the actor loop until every handle is dropped.
    async fn run(mut self) {
        tracing::info!(characters = self.catalog.len(), "lobby started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                LobbyCommand::Connect { conn, sender } => {
                    self.senders.insert(conn, sender);
                    tracing::debug!(%conn, "connection registered");
                }
                LobbyCommand::JoinGame { conn, name } => {
                    self.handle_join(conn, name);
                }
                LobbyCommand::Guess { conn, room_id, guessed_name } => {
                    self.handle_guess(conn, room_id, &guessed_name);
                }
                LobbyCommand::NewRound { conn, room_id } => {
                    self.handle_new_round(conn, room_id);
                }
                LobbyCommand::Disconnect { conn } => {
                    self.handle_disconnect(conn);
                }
                LobbyCommand::Stats { reply } => {
                    let _ = reply.send(self.stats());
                }
                LobbyCommand::Snapshot { room_id, reply } => {
                    let _ = reply
                        .send(self.rooms.get(room_id).map(snapshot_of));
                }
            }
        }

        tracing::info!("lobby stopped");
    }

    fn handle_join(&mut self, conn: ConnectionId, name: String) {
        match self.matchmaker.join(conn, name) {
            JoinOutcome::Waiting => {
                if let Some(waiting) = self.matchmaker.waiting() {
                    let text = format!(
                        "Welcome, {}! Waiting for an opponent...",
                        waiting.name
                    );
                    self.send_to(conn, ServerEvent::Message { text });
                }
                tracing::info!(%conn, "player waiting for an opponent");
            }
            JoinOutcome::AlreadyWaiting => {
                tracing::debug!(
                    %conn,
                    "join ignored: connection already holds the waiting slot"
                );
            }
            JoinOutcome::Paired { first, second } => {
                let room_id =
                    RoomId(NEXT_ROOM_ID.fetch_add(1, Ordering::Relaxed));
                let (room, events) = Room::create(
                    room_id,
                    (first.conn, first.name),
                    (second.conn, second.name),
                    &self.catalog,
                    &mut self.rng,
                );
                let players = room.players();
                tracing::info!(
                    %room_id,
                    first = %players[0],
                    second = %players[1],
                    "room created"
                );
                self.rooms.put(room);
                self.dispatch(&players, events);
            }
        }
    }

    fn handle_guess(
        &mut self,
        conn: ConnectionId,
        room_id: RoomId,
        guessed_name: &str,
    ) {
        let Some(room) = self.rooms.get_mut(room_id) else {
            tracing::debug!(%conn, %room_id, "guess for unknown room ignored");
            return;
        };

        let events = room.guess(conn, guessed_name);
        let players = room.players();
        if events.iter().any(|(_, event)| {
            matches!(event, ServerEvent::GameOver { .. })
        }) {
            tracing::info!(%room_id, winner = %conn, "round resolved");
        }
        self.dispatch(&players, events);
    }

    fn handle_new_round(&mut self, conn: ConnectionId, room_id: RoomId) {
        let Some(room) = self.rooms.get_mut(room_id) else {
            tracing::debug!(
                %conn, %room_id,
                "new-round request for unknown room ignored"
            );
            return;
        };

        let events = room.new_round(&self.catalog, &mut self.rng);
        if events.is_empty() {
            tracing::debug!(
                %conn, %room_id,
                "new-round request ignored: round still active"
            );
            return;
        }
        let players = room.players();
        tracing::info!(%room_id, first = %players[0], "new round started");
        self.dispatch(&players, events);
    }

    fn handle_disconnect(&mut self, conn: ConnectionId) {
        self.senders.remove(&conn);

        if self.matchmaker.clear_if(conn) {
            tracing::info!(%conn, "waiting player disconnected");
        }

        for room in self.rooms.delete_rooms_with(conn) {
            tracing::info!(
                room_id = %room.room_id(),
                %conn,
                "room closed: player disconnected"
            );
            self.dispatch(
                &room.players(),
                vec![(
                    Recipient::AllExcept(conn),
                    ServerEvent::Message {
                        text: "Opponent disconnected. Game over.".into(),
                    },
                )],
            );
        }
    }

    /// Dispatches events to the correct recipients within one room's
    /// player list.
    fn dispatch(
        &self,
        players: &[ConnectionId],
        events: Vec<(Recipient, ServerEvent)>,
    ) {
        for (recipient, event) in events {
            match recipient {
                Recipient::All => {
                    for player in players {
                        self.send_to(*player, event.clone());
                    }
                }
                Recipient::Player(player) => {
                    self.send_to(player, event);
                }
                Recipient::AllExcept(excluded) => {
                    for player in players {
                        if *player != excluded {
                            self.send_to(*player, event.clone());
                        }
                    }
                }
            }
        }
    }

    /// Sends one event to a single connection. Silently drops if the
    /// receiver is gone (connection closed).
    fn send_to(&self, conn: ConnectionId, event: ServerEvent) {
        if let Some(sender) = self.senders.get(&conn) {
            let _ = sender.send(event);
        }
    }

    fn stats(&self) -> LobbyStats {
        LobbyStats {
            rooms: self.rooms.len(),
            waiting: self.matchmaker.waiting().is_some(),
            connections: self.senders.len(),
        }
    }
}

fn snapshot_of(room: &Room) -> RoomSnapshot {
    RoomSnapshot {
        room_id: room.room_id(),
        players: room.players(),
        round_active: room.round_active(),
        current_turn: room.current_turn(),
        last_winner: room.last_winner(),
    }
}

/// Spawns the lobby actor task and returns a handle to it.
pub fn spawn_lobby<S: RoomStore>(catalog: Catalog, rooms: S) -> LobbyHandle {
    let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_SIZE);

    let actor = LobbyActor {
        catalog,
        matchmaker: Matchmaker::new(),
        rooms,
        senders: HashMap::new(),
        rng: StdRng::from_os_rng(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    LobbyHandle { sender: tx }
}
