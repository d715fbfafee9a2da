/// Types used by the room manager.
use std::time::Instant;

use actix::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::room::MAX_PLAYERS_PER_ROOM;
use crate::server::game_room::messages::EngineAttached;
use crate::server::game_room::GameRoom;
use crate::server::messages::ServerWsMessage;

/// One of the two player positions in a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Host,
    Guest,
}

impl Role {
    pub fn peer(self) -> Role {
        match self {
            Role::Host => Role::Guest,
            Role::Guest => Role::Host,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Waiting,
    Playing,
    Finished,
}

/// The channels for reaching one connected client. Both point at the same
/// session actor; keeping them as recipients lets tests stand in for a
/// real WebSocket session.
#[derive(Clone)]
pub struct ClientConn {
    pub messages: Recipient<ServerWsMessage>,
    pub control: Recipient<EngineAttached>,
}

/// One occupied player slot.
pub struct PlayerSlot {
    pub session_id: String,
    pub conn: Option<ClientConn>,
    pub connected: bool,
    pub joined_at: Instant,
    /// Pending reconnect-grace expiry, cancelled on reconnect.
    pub grace_timer: Option<SpawnHandle>,
}

impl PlayerSlot {
    pub fn new(session_id: String, conn: ClientConn) -> Self {
        Self {
            session_id,
            conn: Some(conn),
            connected: true,
            joined_at: Instant::now(),
            grace_timer: None,
        }
    }
}

pub struct Room {
    pub code: String,
    pub status: RoomStatus,
    pub host: Option<PlayerSlot>,
    pub guest: Option<PlayerSlot>,
    pub engine: Option<Addr<GameRoom>>,
    pub created_at: Instant,
}

impl Room {
    pub fn new(code: String, host: PlayerSlot) -> Self {
        Self {
            code,
            status: RoomStatus::Waiting,
            host: Some(host),
            guest: None,
            engine: None,
            created_at: Instant::now(),
        }
    }

    pub fn slot(&self, role: Role) -> Option<&PlayerSlot> {
        match role {
            Role::Host => self.host.as_ref(),
            Role::Guest => self.guest.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, role: Role) -> Option<&mut PlayerSlot> {
        match role {
            Role::Host => self.host.as_mut(),
            Role::Guest => self.guest.as_mut(),
        }
    }

    pub fn connected_players(&self) -> usize {
        [&self.host, &self.guest]
            .iter()
            .filter(|slot| slot.as_ref().is_some_and(|s| s.connected))
            .count()
    }

    pub fn is_full(&self) -> bool {
        self.connected_players() >= MAX_PLAYERS_PER_ROOM
    }

    /// Fan a message to the peer of `role`, if it is connected.
    pub fn notify_peer(&self, role: Role, msg: ServerWsMessage) {
        if let Some(peer) = self.slot(role.peer()) {
            if let Some(conn) = &peer.conn {
                conn.messages.do_send(msg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_peer() {
        assert_eq!(Role::Host.peer(), Role::Guest);
        assert_eq!(Role::Guest.peer(), Role::Host);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Host).unwrap(), "\"host\"");
        assert_eq!(serde_json::to_string(&Role::Guest).unwrap(), "\"guest\"");
    }
}
