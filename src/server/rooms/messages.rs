/// Actor messages handled by the room manager.
use actix::prelude::*;

use crate::server::rooms::types::{ClientConn, Role};
use crate::server::ws_error::ErrorKind;

/// Successful create/join/reconnect result handed back to the session.
#[derive(Debug, Clone)]
pub struct RoomBinding {
    pub room_id: String,
    pub session_id: String,
    pub role: Role,
}

#[derive(Message)]
#[rtype(result = "Result<RoomBinding, ErrorKind>")]
pub struct CreateRoom {
    pub conn: ClientConn,
}

#[derive(Message)]
#[rtype(result = "Result<RoomBinding, ErrorKind>")]
pub struct JoinRoom {
    pub conn: ClientConn,
    pub room_id: String,
}

#[derive(Message)]
#[rtype(result = "Result<RoomBinding, ErrorKind>")]
pub struct Reconnect {
    pub conn: ClientConn,
    pub session_id: String,
}

/// Explicit `leave_room` from a client.
#[derive(Message)]
#[rtype(result = "()")]
pub struct LeaveRoom {
    pub session_id: String,
}

/// Socket-level disconnect; starts the reconnect grace window.
#[derive(Message)]
#[rtype(result = "()")]
pub struct ConnectionClosed {
    pub session_id: String,
}

/// Sent by a game room once its game reached a terminal state.
#[derive(Message)]
#[rtype(result = "()")]
pub struct RoomFinished {
    pub room_id: String,
}

#[derive(Debug, Clone, Copy, MessageResponse)]
pub struct HealthInfo {
    pub rooms: usize,
    pub players: usize,
}

#[derive(Message)]
#[rtype(result = "HealthInfo")]
pub struct HealthQuery;
