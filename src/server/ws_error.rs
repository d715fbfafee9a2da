/// Centralized WebSocket error kinds and payload helpers.
///
/// Every client-facing failure carries a machine-readable kind plus a
/// canonical human-readable message; the client surfaces the string.
use serde::{Deserialize, Serialize};

use crate::server::messages::ServerWsMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    RoomNotFound,
    RoomFull,
    InvalidInput,
    Unauthorized,
    ServerError,
}

impl ErrorKind {
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::RoomNotFound => "Room not found",
            ErrorKind::RoomFull => "Room is full",
            ErrorKind::InvalidInput => "Invalid input",
            ErrorKind::Unauthorized => "Not authorized for this action",
            ErrorKind::ServerError => "Internal server error",
        }
    }
}

/// Build a `room_error` event for the given kind.
pub fn room_error(kind: ErrorKind) -> ServerWsMessage {
    ServerWsMessage::RoomError {
        kind,
        message: kind.message().to_string(),
    }
}

/// Build a `reconnect_failed` event for the given kind.
pub fn reconnect_failed(kind: ErrorKind) -> ServerWsMessage {
    ServerWsMessage::ReconnectFailed {
        kind,
        message: kind.message().to_string(),
    }
}
