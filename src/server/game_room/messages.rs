/// Actor messages handled by (or about) a game room.
use actix::prelude::*;

use crate::game::types::PlayerInput;
use crate::server::game_room::GameRoom;
use crate::server::messages::{ServerWsMessage, Winner};
use crate::server::rooms::types::Role;

/// Tells a session which engine now serves its room, so `player_input`
/// frames can go straight to the room actor.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct EngineAttached {
    pub engine: Addr<GameRoom>,
    pub role: Role,
}

/// Latest intent from one slot; overwrites the slot's input cell.
#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "()")]
pub struct SlotInput {
    pub role: Role,
    pub input: PlayerInput,
}

/// Rebind a slot's outbound channel after a reconnect.
#[derive(Message)]
#[rtype(result = "()")]
pub struct UpdateConn {
    pub role: Role,
    pub conn: Recipient<ServerWsMessage>,
}

/// Client-reported termination hint.
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct ClientGameOver {
    pub winner: Winner,
    pub reason: String,
}

/// Cooperative stop signal from the room manager.
#[derive(Message)]
#[rtype(result = "()")]
pub struct StopRoom;
