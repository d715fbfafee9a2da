//! Wire protocol: the event-typed JSON messages exchanged with clients.
//!
//! Every frame is `{"event": <name>, "data": <payload>}` with snake_case
//! event names and camelCase payload fields. `ServerWsMessage` doubles as
//! an actix message so room actors can hand frames straight to sessions.

use actix::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game::snapshot::{MapChanges, Snapshot};
use crate::game::types::{Direction, TankColor};
use crate::server::rooms::types::Role;
use crate::server::ws_error::ErrorKind;

/// Reported winner of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Host,
    Guest,
    Draw,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomPayload {
    pub room_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconnectPayload {
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingPayload {
    pub timestamp: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOverHintPayload {
    pub winner: Winner,
    pub reason: String,
}

/// The `player_input` payload. `type` must be `"state"`; serde enforces
/// the rest of the shape (direction range, boolean flags, numeric
/// timestamp) during deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInputPayload {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub direction: Option<Direction>,
    pub moving: bool,
    pub firing: bool,
    pub timestamp: f64,
}

/// Events a client may send.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientWsMessage {
    CreateRoom,
    JoinRoom(JoinRoomPayload),
    LeaveRoom,
    Reconnect(ReconnectPayload),
    PlayerInput(PlayerInputPayload),
    Ping(PingPayload),
    GameOver(GameOverHintPayload),
}

/// A spawn position reported in `game_state_init`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPosition {
    pub x: f64,
    pub y: f64,
}

impl From<(f64, f64)> for SpawnPosition {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Events the server may send.
#[derive(Debug, Clone, Serialize, Deserialize, Message)]
#[rtype(result = "()")]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerWsMessage {
    #[serde(rename_all = "camelCase")]
    RoomCreated {
        room_id: String,
        session_id: String,
        role: Role,
    },
    #[serde(rename_all = "camelCase")]
    RoomJoined {
        room_id: String,
        session_id: String,
        role: Role,
    },
    RoomError {
        #[serde(rename = "type")]
        kind: ErrorKind,
        message: String,
    },
    PlayerJoined {
        role: Role,
    },
    PlayerLeft,
    GameStart {
        timestamp: u64,
    },
    #[serde(rename_all = "camelCase")]
    GameStateInit {
        seed: u32,
        map_id: String,
        host_position: SpawnPosition,
        guest_position: SpawnPosition,
        host_tank_color: TankColor,
        guest_tank_color: TankColor,
        timestamp: u64,
    },
    StateSync(Snapshot),
    MapChanges(MapChanges),
    #[serde(rename_all = "camelCase")]
    Pong {
        client_timestamp: f64,
        server_timestamp: u64,
    },
    OpponentDisconnected,
    OpponentReconnected,
    #[serde(rename_all = "camelCase")]
    ReconnectSuccess {
        room_id: String,
        role: Role,
    },
    ReconnectFailed {
        #[serde(rename = "type")]
        kind: ErrorKind,
        message: String,
    },
    GameOver {
        winner: Winner,
        reason: String,
        timestamp: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_room_parses_without_payload() {
        let msg: ClientWsMessage = serde_json::from_str(r#"{"event":"create_room"}"#).unwrap();
        assert!(matches!(msg, ClientWsMessage::CreateRoom));
    }

    #[test]
    fn test_join_room_payload_uses_camel_case() {
        let msg: ClientWsMessage =
            serde_json::from_str(r#"{"event":"join_room","data":{"roomId":"AB12CD"}}"#).unwrap();
        match msg {
            ClientWsMessage::JoinRoom(payload) => assert_eq!(payload.room_id, "AB12CD"),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_player_input_full_shape() {
        let raw = r#"{
            "event":"player_input",
            "data":{"type":"state","direction":"left","moving":true,"firing":false,"timestamp":123.0}
        }"#;
        let msg: ClientWsMessage = serde_json::from_str(raw).unwrap();
        match msg {
            ClientWsMessage::PlayerInput(payload) => {
                assert_eq!(payload.kind, "state");
                assert_eq!(payload.direction, Some(Direction::Left));
                assert!(payload.moving);
                assert!(!payload.firing);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_player_input_direction_is_optional() {
        let raw = r#"{
            "event":"player_input",
            "data":{"type":"state","moving":false,"firing":true,"timestamp":1.0}
        }"#;
        let msg: ClientWsMessage = serde_json::from_str(raw).unwrap();
        match msg {
            ClientWsMessage::PlayerInput(payload) => assert_eq!(payload.direction, None),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_bad_direction_is_rejected() {
        let raw = r#"{
            "event":"player_input",
            "data":{"type":"state","direction":"north","moving":true,"firing":false,"timestamp":1.0}
        }"#;
        assert!(serde_json::from_str::<ClientWsMessage>(raw).is_err());
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        let raw = r#"{"event":"fly_to_moon","data":{}}"#;
        assert!(serde_json::from_str::<ClientWsMessage>(raw).is_err());
    }

    #[test]
    fn test_room_created_wire_shape() {
        let msg = ServerWsMessage::RoomCreated {
            room_id: "AB12CD".into(),
            session_id: "sess".into(),
            role: Role::Host,
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["event"], "room_created");
        assert_eq!(json["data"]["roomId"], "AB12CD");
        assert_eq!(json["data"]["sessionId"], "sess");
        assert_eq!(json["data"]["role"], "host");
    }

    #[test]
    fn test_player_left_has_no_payload() {
        let json: serde_json::Value = serde_json::to_value(&ServerWsMessage::PlayerLeft).unwrap();
        assert_eq!(json["event"], "player_left");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_game_state_init_wire_shape() {
        let msg = ServerWsMessage::GameStateInit {
            seed: 77,
            map_id: "stage-1".into(),
            host_position: (64.0, 192.0).into(),
            guest_position: (128.0, 192.0).into(),
            host_tank_color: TankColor::Yellow,
            guest_tank_color: TankColor::Green,
            timestamp: 5,
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["event"], "game_state_init");
        assert_eq!(json["data"]["hostTankColor"], "yellow");
        assert_eq!(json["data"]["guestTankColor"], "green");
        assert_eq!(json["data"]["hostPosition"]["x"], 64.0);
        assert_eq!(json["data"]["mapId"], "stage-1");
    }

    #[test]
    fn test_pong_echoes_both_timestamps() {
        let msg = ServerWsMessage::Pong {
            client_timestamp: 12.5,
            server_timestamp: 99,
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["event"], "pong");
        assert_eq!(json["data"]["clientTimestamp"], 12.5);
        assert_eq!(json["data"]["serverTimestamp"], 99);
    }

    #[test]
    fn test_state_sync_round_trip() {
        let state = crate::game::state::GameState::new("AB12CD");
        let msg = ServerWsMessage::StateSync(state.snapshot(42));
        let bytes = serde_json::to_vec(&msg).unwrap();
        let decoded: ServerWsMessage = serde_json::from_slice(&bytes).unwrap();
        match decoded {
            ServerWsMessage::StateSync(snapshot) => {
                assert_eq!(snapshot.timestamp, 42);
                assert_eq!(snapshot.map.bricks.len(), 52 * 52);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }
}
