//! Room state: the turn/guess engine and the round lifecycle.
//!
//! A room is pure state. Every operation returns a list of
//! `(Recipient, ServerEvent)` pairs for the lobby to dispatch; nothing
//! here performs I/O, which keeps the rules trivially testable.

use std::collections::HashMap;

use guesswho_protocol::{
    Character, ConnectionId, Recipient, RoomId, ServerEvent,
};
use rand::Rng;

use crate::Catalog;

/// Where a room is in its round lifecycle.
///
/// This replaces a `roundActive` flag plus separate turn and last-winner
/// fields with one tagged state: a guess is only accepted while
/// `InProgress`, and starting a new round is only a valid transition out
/// of `Resolved` (which also carries the winner until the next round
/// consumes it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// A round is running; `turn` indexes into the room's player order.
    InProgress { turn: usize },
    /// The round has a winner and waits for a new-round request.
    Resolved { winner: ConnectionId },
}

/// One two-player game session.
#[derive(Debug)]
pub struct Room {
    room_id: RoomId,
    /// Order fixes the turn sequence. Reordered between rounds so the
    /// last winner moves first.
    players: [ConnectionId; 2],
    /// Display names, set at creation and never changed.
    names: HashMap<ConnectionId, String>,
    /// One secret per player, fully regenerated every round.
    secrets: HashMap<ConnectionId, Character>,
    phase: RoundPhase,
}

impl Room {
    /// Pairs two connections into a new room and produces the opening
    /// notifications: a game-start per player (each with its own board
    /// order), the private secrets, and the first turn announcement.
    ///
    /// `first` is the player who had been waiting; they move first.
    pub fn create<R: Rng>(
        room_id: RoomId,
        first: (ConnectionId, String),
        second: (ConnectionId, String),
        catalog: &Catalog,
        rng: &mut R,
    ) -> (Self, Vec<(Recipient, ServerEvent)>) {
        let players = [first.0, second.0];
        let names = HashMap::from([first, second]);

        // Two independent draws; the players may share a secret by chance.
        let first_secret = catalog.draw(rng);
        let second_secret = catalog.draw(rng);
        let secrets = HashMap::from([
            (players[0], first_secret.clone()),
            (players[1], second_secret.clone()),
        ]);

        let room = Self {
            room_id,
            players,
            names,
            secrets,
            phase: RoundPhase::InProgress { turn: 0 },
        };

        let mut events = Vec::with_capacity(5);
        for player in players {
            events.push((
                Recipient::Player(player),
                ServerEvent::GameStart {
                    room_id,
                    characters: catalog.shuffled(rng),
                    current_turn: players[0],
                    names: room.names.clone(),
                },
            ));
        }
        events.push((
            Recipient::Player(players[0]),
            ServerEvent::SecretAssigned { secret: first_secret },
        ));
        events.push((
            Recipient::Player(players[1]),
            ServerEvent::SecretAssigned { secret: second_secret },
        ));
        events.push((
            Recipient::All,
            ServerEvent::TurnChange { current_turn: players[0] },
        ));

        (room, events)
    }

    /// Resolves a guess from `conn` against the opponent's secret.
    pub fn guess(
        &mut self,
        conn: ConnectionId,
        guessed_name: &str,
    ) -> Vec<(Recipient, ServerEvent)> {
        let turn = match self.phase {
            RoundPhase::InProgress { turn } => turn,
            RoundPhase::Resolved { .. } => {
                // A guess can arrive in the window between a win and the
                // next round's setup; the turn check alone would not
                // catch it, so the phase is checked explicitly.
                return vec![(
                    Recipient::Player(conn),
                    ServerEvent::Message {
                        text: "The round is over. Request a new round to keep playing.".into(),
                    },
                )];
            }
        };

        if self.players[turn] != conn {
            return vec![(
                Recipient::Player(conn),
                ServerEvent::Message { text: "Not your turn!".into() },
            )];
        }

        let mut events = vec![(
            Recipient::All,
            ServerEvent::GuessMade {
                guesser: conn,
                guesser_name: self
                    .names
                    .get(&conn)
                    .cloned()
                    .unwrap_or_default(),
                guessed_name: guessed_name.to_string(),
            },
        )];

        let opponent = self.players[1 - turn];
        let correct = self
            .secrets
            .get(&opponent)
            .is_some_and(|secret| secret.name == guessed_name);

        if correct {
            self.phase = RoundPhase::Resolved { winner: conn };
            events.push((
                Recipient::All,
                ServerEvent::GameOver {
                    winner: conn,
                    guessed_name: guessed_name.to_string(),
                },
            ));
        } else {
            events.push((
                Recipient::Player(conn),
                ServerEvent::Message {
                    text: "Wrong guess! Turn passes.".into(),
                },
            ));
            let next = (turn + 1) % 2;
            self.phase = RoundPhase::InProgress { turn: next };
            events.push((
                Recipient::All,
                ServerEvent::TurnChange {
                    current_turn: self.players[next],
                },
            ));
        }

        events
    }

    /// Starts the next round: the winner moves to the front of the turn
    /// order, both secrets are redrawn, and the turn pointer resets so
    /// the winner moves first. Each player gets a private next-round
    /// payload carrying their own new secret and a fresh board order.
    ///
    /// A no-op while a round is still in progress.
    pub fn new_round<R: Rng>(
        &mut self,
        catalog: &Catalog,
        rng: &mut R,
    ) -> Vec<(Recipient, ServerEvent)> {
        let winner = match self.phase {
            RoundPhase::InProgress { .. } => return Vec::new(),
            RoundPhase::Resolved { winner } => winner,
        };

        if self.players[0] != winner {
            self.players.swap(0, 1);
        }

        self.secrets.clear();
        let mut events = Vec::with_capacity(2);
        for player in self.players {
            let secret = catalog.draw(rng);
            self.secrets.insert(player, secret.clone());
            events.push((
                Recipient::Player(player),
                ServerEvent::NewRound {
                    room_id: self.room_id,
                    characters: catalog.shuffled(rng),
                    current_turn: self.players[0],
                    secret,
                },
            ));
        }

        self.phase = RoundPhase::InProgress { turn: 0 };
        events
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// The players in turn order.
    pub fn players(&self) -> [ConnectionId; 2] {
        self.players
    }

    pub fn contains(&self, conn: ConnectionId) -> bool {
        self.players.contains(&conn)
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Whether a round is currently running.
    pub fn round_active(&self) -> bool {
        matches!(self.phase, RoundPhase::InProgress { .. })
    }

    /// The connection whose guess is currently accepted, if any.
    pub fn current_turn(&self) -> Option<ConnectionId> {
        match self.phase {
            RoundPhase::InProgress { turn } => Some(self.players[turn]),
            RoundPhase::Resolved { .. } => None,
        }
    }

    /// The winner of the resolved round, until the next round consumes it.
    pub fn last_winner(&self) -> Option<ConnectionId> {
        match self.phase {
            RoundPhase::Resolved { winner } => Some(winner),
            RoundPhase::InProgress { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const X: ConnectionId = ConnectionId(1);
    const Y: ConnectionId = ConnectionId(2);

    fn catalog() -> Catalog {
        Catalog::default() // Alice, Bob, Charlie, Diana
    }

    fn character(name: &str) -> Character {
        Character {
            image_url: format!("https://img.test/{name}.png"),
            name: name.into(),
        }
    }

    fn new_room() -> Room {
        let mut rng = StdRng::seed_from_u64(42);
        let (room, _events) = Room::create(
            RoomId(1),
            (X, "Xena".into()),
            (Y, "Yuri".into()),
            &catalog(),
            &mut rng,
        );
        room
    }

    /// A room with known secrets: X holds Bob, Y holds Charlie.
    /// X moves first.
    fn rigged_room() -> Room {
        let mut room = new_room();
        room.secrets = HashMap::from([
            (X, character("Bob")),
            (Y, character("Charlie")),
        ]);
        room
    }

    fn events_of(events: &[(Recipient, ServerEvent)]) -> Vec<&ServerEvent> {
        events.iter().map(|(_, event)| event).collect()
    }

    // =====================================================================
    // Creation
    // =====================================================================

    #[test]
    fn test_create_starts_with_first_player_to_move() {
        let room = new_room();
        assert_eq!(room.players(), [X, Y]);
        assert_eq!(room.current_turn(), Some(X));
        assert!(room.round_active());
    }

    #[test]
    fn test_create_assigns_one_secret_per_player() {
        let mut rng = StdRng::seed_from_u64(42);
        let (room, events) = Room::create(
            RoomId(1),
            (X, "Xena".into()),
            (Y, "Yuri".into()),
            &catalog(),
            &mut rng,
        );

        assert_eq!(room.secrets.len(), 2);

        // Each secret is delivered privately to its owner only.
        let deliveries: Vec<_> = events
            .iter()
            .filter(|(_, event)| {
                matches!(event, ServerEvent::SecretAssigned { .. })
            })
            .collect();
        assert_eq!(deliveries.len(), 2);
        assert_eq!(deliveries[0].0, Recipient::Player(X));
        assert_eq!(deliveries[1].0, Recipient::Player(Y));
    }

    #[test]
    fn test_create_sends_game_start_per_player_then_turn_change() {
        let mut rng = StdRng::seed_from_u64(42);
        let (_room, events) = Room::create(
            RoomId(7),
            (X, "Xena".into()),
            (Y, "Yuri".into()),
            &catalog(),
            &mut rng,
        );

        // gameStart to each player, both naming X as current turn.
        let starts: Vec<_> = events
            .iter()
            .filter_map(|(recipient, event)| match event {
                ServerEvent::GameStart { current_turn, names, .. } => {
                    Some((recipient, current_turn, names))
                }
                _ => None,
            })
            .collect();
        assert_eq!(starts.len(), 2);
        for (_, current_turn, names) in &starts {
            assert_eq!(**current_turn, X);
            assert_eq!(names.get(&X).map(String::as_str), Some("Xena"));
            assert_eq!(names.get(&Y).map(String::as_str), Some("Yuri"));
        }

        // The final event is the broadcast turn announcement.
        match events.last() {
            Some((Recipient::All, ServerEvent::TurnChange { current_turn })) => {
                assert_eq!(*current_turn, X);
            }
            other => panic!("expected broadcast TurnChange, got {other:?}"),
        }
    }

    #[test]
    fn test_create_board_views_are_permutations_of_the_catalog() {
        let mut rng = StdRng::seed_from_u64(42);
        let (_room, events) = Room::create(
            RoomId(1),
            (X, "Xena".into()),
            (Y, "Yuri".into()),
            &catalog(),
            &mut rng,
        );

        let mut catalog_names: Vec<_> = catalog()
            .characters()
            .iter()
            .map(|c| c.name.clone())
            .collect();
        catalog_names.sort();

        for (_, event) in &events {
            if let ServerEvent::GameStart { characters, .. } = event {
                let mut names: Vec<_> =
                    characters.iter().map(|c| c.name.clone()).collect();
                names.sort();
                assert_eq!(names, catalog_names);
            }
        }
    }

    // =====================================================================
    // Guessing - the worked example: X holds Bob, Y holds Charlie.
    // =====================================================================

    #[test]
    fn test_correct_guess_resolves_the_round() {
        let mut room = rigged_room();

        // X guesses Y's secret.
        let events = room.guess(X, "Charlie");

        let shapes = events_of(&events);
        assert!(matches!(
            shapes[0],
            ServerEvent::GuessMade { guesser, guessed_name, .. }
                if *guesser == X && guessed_name == "Charlie"
        ));
        assert!(matches!(
            shapes[1],
            ServerEvent::GameOver { winner, guessed_name }
                if *winner == X && guessed_name == "Charlie"
        ));

        assert!(!room.round_active());
        assert_eq!(room.last_winner(), Some(X));
        assert_eq!(room.current_turn(), None);
    }

    #[test]
    fn test_wrong_guess_passes_the_turn() {
        let mut room = rigged_room();

        // "Bob" is X's own secret, not Y's: wrong.
        let events = room.guess(X, "Bob");

        assert!(matches!(
            events[0].1,
            ServerEvent::GuessMade { .. }
        ));
        assert_eq!(events[1].0, Recipient::Player(X));
        assert!(matches!(
            &events[1].1,
            ServerEvent::Message { text } if text.contains("Wrong guess")
        ));
        match &events[2] {
            (Recipient::All, ServerEvent::TurnChange { current_turn }) => {
                assert_eq!(*current_turn, Y);
            }
            other => panic!("expected TurnChange to all, got {other:?}"),
        }

        assert_eq!(room.current_turn(), Some(Y));
        assert!(room.round_active());
    }

    #[test]
    fn test_guess_echo_carries_display_name() {
        let mut room = rigged_room();
        let events = room.guess(X, "Diana");
        assert!(matches!(
            &events[0].1,
            ServerEvent::GuessMade { guesser_name, .. }
                if guesser_name == "Xena"
        ));
    }

    #[test]
    fn test_out_of_turn_guess_changes_nothing() {
        let mut room = rigged_room();
        let secrets_before = room.secrets.clone();

        let events = room.guess(Y, "Bob");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, Recipient::Player(Y));
        assert!(matches!(
            &events[0].1,
            ServerEvent::Message { text } if text.contains("Not your turn")
        ));
        assert_eq!(room.current_turn(), Some(X));
        assert_eq!(room.secrets, secrets_before);
        assert!(room.round_active());
    }

    #[test]
    fn test_guess_on_resolved_round_is_rejected() {
        let mut room = rigged_room();
        room.guess(X, "Charlie"); // X wins

        let events = room.guess(Y, "Bob");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, Recipient::Player(Y));
        assert!(matches!(&events[0].1, ServerEvent::Message { .. }));
        assert_eq!(room.last_winner(), Some(X), "winner unchanged");
    }

    #[test]
    fn test_turn_alternates_over_successive_wrong_guesses() {
        let mut room = rigged_room();
        room.guess(X, "Alice");
        assert_eq!(room.current_turn(), Some(Y));
        room.guess(Y, "Alice");
        assert_eq!(room.current_turn(), Some(X));
    }

    // =====================================================================
    // Round lifecycle
    // =====================================================================

    #[test]
    fn test_new_round_is_a_noop_while_round_active() {
        let mut room = rigged_room();
        let mut rng = StdRng::seed_from_u64(7);

        let events = room.new_round(&catalog(), &mut rng);

        assert!(events.is_empty());
        assert_eq!(room.current_turn(), Some(X));
        assert_eq!(room.secrets.get(&X).unwrap().name, "Bob");
    }

    #[test]
    fn test_new_round_puts_the_winner_first() {
        let mut room = rigged_room();
        room.guess(X, "Alice"); // turn passes to Y
        room.guess(Y, "Bob"); // Y wins
        assert_eq!(room.last_winner(), Some(Y));

        let mut rng = StdRng::seed_from_u64(7);
        let events = room.new_round(&catalog(), &mut rng);

        assert_eq!(room.players(), [Y, X]);
        assert_eq!(room.current_turn(), Some(Y));
        assert!(room.round_active());
        assert_eq!(room.last_winner(), None, "winner is consumed");

        // One private payload per player, each naming Y as current turn
        // and carrying that player's own new secret.
        assert_eq!(events.len(), 2);
        for (recipient, event) in &events {
            let player = match recipient {
                Recipient::Player(p) => *p,
                other => panic!("expected per-player payload, got {other:?}"),
            };
            match event {
                ServerEvent::NewRound { current_turn, secret, room_id, .. } => {
                    assert_eq!(*current_turn, Y);
                    assert_eq!(*room_id, RoomId(1));
                    assert_eq!(room.secrets.get(&player), Some(secret));
                }
                other => panic!("expected NewRound, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_new_round_keeps_order_when_first_player_won() {
        let mut room = rigged_room();
        room.guess(X, "Charlie"); // X (already first) wins

        let mut rng = StdRng::seed_from_u64(7);
        room.new_round(&catalog(), &mut rng);

        assert_eq!(room.players(), [X, Y]);
        assert_eq!(room.current_turn(), Some(X));
    }

    #[test]
    fn test_new_round_redraws_both_secrets() {
        let mut room = rigged_room();
        room.guess(X, "Charlie");

        let mut rng = StdRng::seed_from_u64(7);
        room.new_round(&catalog(), &mut rng);

        assert_eq!(room.secrets.len(), 2);
        for player in room.players() {
            let secret = room.secrets.get(&player).unwrap();
            assert!(catalog().characters().contains(secret));
        }
    }

    #[test]
    fn test_full_two_round_sequence() {
        let mut room = rigged_room();

        // Round one: X wins immediately.
        room.guess(X, "Charlie");
        let mut rng = StdRng::seed_from_u64(7);
        room.new_round(&catalog(), &mut rng);

        // Round two runs under the fresh secrets: Y (second) guessing
        // X's new secret wins after X passes the turn.
        let x_secret = room.secrets.get(&X).unwrap().name.clone();
        let wrong = catalog()
            .characters()
            .iter()
            .map(|c| c.name.clone())
            .find(|name| {
                *name != room.secrets.get(&Y).unwrap().name
            })
            .unwrap();
        room.guess(X, &wrong);
        let events = room.guess(Y, &x_secret);

        assert!(events_of(&events).iter().any(|event| matches!(
            event,
            ServerEvent::GameOver { winner, .. } if *winner == Y
        )));
        assert_eq!(room.last_winner(), Some(Y));
    }
}
