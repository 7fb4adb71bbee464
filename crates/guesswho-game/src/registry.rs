//! The room registry: keyed storage for live rooms.
//!
//! The store is a seam: the lobby only needs get/put/delete semantics,
//! so the in-memory map below could be swapped for a concurrency-safe or
//! external store without touching the game logic.

use std::collections::HashMap;

use guesswho_protocol::{ConnectionId, RoomId};

use crate::Room;

/// Keyed storage for [`Room`]s.
pub trait RoomStore: Send + 'static {
    /// Looks up a room by id.
    fn get(&self, room_id: RoomId) -> Option<&Room>;

    /// Looks up a room by id, mutably.
    fn get_mut(&mut self, room_id: RoomId) -> Option<&mut Room>;

    /// Registers a room under its own id, replacing any previous entry.
    fn put(&mut self, room: Room);

    /// Removes and returns the room with the given id.
    fn delete(&mut self, room_id: RoomId) -> Option<Room>;

    /// Removes and returns every room the connection belongs to.
    /// Used by disconnect teardown.
    fn delete_rooms_with(&mut self, conn: ConnectionId) -> Vec<Room>;

    /// Number of live rooms.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The default [`RoomStore`]: a process-local HashMap.
#[derive(Debug, Default)]
pub struct InMemoryRooms {
    rooms: HashMap<RoomId, Room>,
}

impl InMemoryRooms {
    pub fn new() -> Self {
        Self { rooms: HashMap::new() }
    }
}

impl RoomStore for InMemoryRooms {
    fn get(&self, room_id: RoomId) -> Option<&Room> {
        self.rooms.get(&room_id)
    }

    fn get_mut(&mut self, room_id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(&room_id)
    }

    fn put(&mut self, room: Room) {
        self.rooms.insert(room.room_id(), room);
    }

    fn delete(&mut self, room_id: RoomId) -> Option<Room> {
        self.rooms.remove(&room_id)
    }

    fn delete_rooms_with(&mut self, conn: ConnectionId) -> Vec<Room> {
        let ids: Vec<RoomId> = self
            .rooms
            .values()
            .filter(|room| room.contains(conn))
            .map(|room| room.room_id())
            .collect();
        ids.into_iter()
            .filter_map(|id| self.rooms.remove(&id))
            .collect()
    }

    fn len(&self) -> usize {
        self.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Catalog;
    use guesswho_protocol::ConnectionId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn room(id: u64, a: u64, b: u64) -> Room {
        let catalog = Catalog::default();
        let mut rng = StdRng::seed_from_u64(id);
        let (room, _events) = Room::create(
            RoomId(id),
            (ConnectionId(a), "a".into()),
            (ConnectionId(b), "b".into()),
            &catalog,
            &mut rng,
        );
        room
    }

    #[test]
    fn test_put_get_delete() {
        let mut store = InMemoryRooms::new();
        store.put(room(1, 10, 11));

        assert_eq!(store.len(), 1);
        assert!(store.get(RoomId(1)).is_some());
        assert!(store.get(RoomId(2)).is_none());

        let removed = store.delete(RoomId(1)).unwrap();
        assert_eq!(removed.room_id(), RoomId(1));
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_rooms_with_removes_only_memberships() {
        let mut store = InMemoryRooms::new();
        store.put(room(1, 10, 11));
        store.put(room(2, 12, 13));

        let removed = store.delete_rooms_with(ConnectionId(10));
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].room_id(), RoomId(1));
        assert_eq!(store.len(), 1);
        assert!(store.get(RoomId(2)).is_some());
    }

    #[test]
    fn test_delete_rooms_with_unknown_connection_is_empty() {
        let mut store = InMemoryRooms::new();
        store.put(room(1, 10, 11));
        assert!(store.delete_rooms_with(ConnectionId(99)).is_empty());
        assert_eq!(store.len(), 1);
    }
}
