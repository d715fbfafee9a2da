//! The room manager actor.
//!
//! Owns every room: creation with collision-checked 6-character codes,
//! guest joins (starting the per-room engine on the second arrival),
//! explicit leaves, socket disconnects with a reconnect grace window, and
//! session-id reconnects that rebind a fresh socket to its old slot.

use std::collections::HashMap;
use std::time::Duration;

use actix::prelude::*;
use log::{info, warn};
use rand::Rng;
use uuid::Uuid;

use crate::config::room::{RECONNECT_TIMEOUT_MS, ROOM_CODE_CHARSET, ROOM_CODE_LENGTH};
use crate::server::game_room::messages::{EngineAttached, StopRoom, UpdateConn};
use crate::server::game_room::GameRoom;
use crate::server::messages::ServerWsMessage;
use crate::server::rooms::messages::{
    ConnectionClosed, CreateRoom, HealthInfo, HealthQuery, JoinRoom, LeaveRoom, Reconnect,
    RoomBinding, RoomFinished,
};
use crate::server::rooms::types::{ClientConn, PlayerSlot, Role, Room, RoomStatus};
use crate::server::ws_error::ErrorKind;

/// Draw a 6-character uppercase alphanumeric room code.
pub fn generate_room_code<R: Rng>(rng: &mut R) -> String {
    (0..ROOM_CODE_LENGTH)
        .map(|_| ROOM_CODE_CHARSET[rng.random_range(0..ROOM_CODE_CHARSET.len())] as char)
        .collect()
}

pub struct RoomManager {
    rooms: HashMap<String, Room>,
    /// session id → (room code, role). Survives socket drops.
    sessions: HashMap<String, (String, Role)>,
    reconnect_timeout: Duration,
}

impl RoomManager {
    pub fn new() -> Self {
        Self::with_reconnect_timeout(Duration::from_millis(RECONNECT_TIMEOUT_MS))
    }

    /// Grace window injected for tests.
    pub fn with_reconnect_timeout(reconnect_timeout: Duration) -> Self {
        Self {
            rooms: HashMap::new(),
            sessions: HashMap::new(),
            reconnect_timeout,
        }
    }

    fn allocate_code(&self) -> String {
        let mut rng = rand::rng();
        loop {
            let code = generate_room_code(&mut rng);
            if !self.rooms.contains_key(&code) {
                return code;
            }
        }
    }

    /// Remove a room, its session bindings, and stop its engine.
    fn teardown_room(&mut self, code: &str) {
        if let Some(room) = self.rooms.remove(code) {
            for slot in [room.host, room.guest].into_iter().flatten() {
                self.sessions.remove(&slot.session_id);
            }
            if let Some(engine) = room.engine {
                engine.do_send(StopRoom);
            }
            info!(
                "[RoomManager] room {} removed after {:?}",
                room.code,
                room.created_at.elapsed()
            );
        }
    }

    /// Grace window elapsed: if the slot is still disconnected, the peer
    /// is told the player left and the room is freed.
    fn expire_session(&mut self, session_id: &str) {
        let Some((code, role)) = self.sessions.get(session_id).cloned() else {
            return;
        };
        let Some(slot) = self.rooms.get(&code).and_then(|room| room.slot(role)) else {
            return;
        };
        if slot.connected {
            return;
        }
        warn!(
            "[RoomManager] session {} (in room for {:?}) did not reconnect within grace, freeing room {}",
            session_id,
            slot.joined_at.elapsed(),
            code
        );
        if let Some(room) = self.rooms.get(&code) {
            room.notify_peer(role, ServerWsMessage::PlayerLeft);
        }
        self.teardown_room(&code);
    }

    /// Bind a guest into a waiting room and start its engine.
    fn start_room(
        &mut self,
        code: String,
        conn: ClientConn,
        ctx: &mut Context<Self>,
    ) -> Result<RoomBinding, ErrorKind> {
        let room = self.rooms.get_mut(&code).ok_or(ErrorKind::RoomNotFound)?;

        let session_id = Uuid::new_v4().to_string();
        room.guest = Some(PlayerSlot::new(session_id.clone(), conn.clone()));
        room.status = RoomStatus::Playing;
        room.notify_peer(
            Role::Guest,
            ServerWsMessage::PlayerJoined { role: Role::Guest },
        );

        let host_conn = room
            .host
            .as_ref()
            .and_then(|slot| slot.conn.clone())
            .ok_or(ErrorKind::ServerError)?;
        let engine = GameRoom::new(
            code.clone(),
            ctx.address(),
            host_conn.messages.clone(),
            conn.messages.clone(),
        )
        .start();
        room.engine = Some(engine.clone());

        host_conn.control.do_send(EngineAttached {
            engine: engine.clone(),
            role: Role::Host,
        });
        conn.control.do_send(EngineAttached {
            engine,
            role: Role::Guest,
        });

        self.sessions
            .insert(session_id.clone(), (code.clone(), Role::Guest));
        info!("[RoomManager] room {} full, engine started", code);
        Ok(RoomBinding {
            room_id: code,
            session_id,
            role: Role::Guest,
        })
    }

    /// Hand a disconnected guest slot to a new arrival (fresh session id).
    fn replace_guest(
        &mut self,
        code: String,
        conn: ClientConn,
        ctx: &mut Context<Self>,
    ) -> Result<RoomBinding, ErrorKind> {
        let room = self.rooms.get_mut(&code).ok_or(ErrorKind::RoomNotFound)?;
        let Some(old) = room.guest.take() else {
            return Err(ErrorKind::ServerError);
        };
        if let Some(handle) = old.grace_timer {
            ctx.cancel_future(handle);
        }
        self.sessions.remove(&old.session_id);

        let session_id = Uuid::new_v4().to_string();
        room.guest = Some(PlayerSlot::new(session_id.clone(), conn.clone()));
        room.notify_peer(
            Role::Guest,
            ServerWsMessage::PlayerJoined { role: Role::Guest },
        );
        if let Some(engine) = &room.engine {
            engine.do_send(UpdateConn {
                role: Role::Guest,
                conn: conn.messages.clone(),
            });
            conn.control.do_send(EngineAttached {
                engine: engine.clone(),
                role: Role::Guest,
            });
        }
        self.sessions
            .insert(session_id.clone(), (code.clone(), Role::Guest));
        info!("[RoomManager] room {} guest slot re-bound to a new session", code);
        Ok(RoomBinding {
            room_id: code,
            session_id,
            role: Role::Guest,
        })
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor for RoomManager {
    type Context = Context<Self>;
}

impl Handler<CreateRoom> for RoomManager {
    type Result = Result<RoomBinding, ErrorKind>;

    fn handle(&mut self, msg: CreateRoom, _: &mut Context<Self>) -> Self::Result {
        let code = self.allocate_code();
        let session_id = Uuid::new_v4().to_string();
        let room = Room::new(code.clone(), PlayerSlot::new(session_id.clone(), msg.conn));
        self.rooms.insert(code.clone(), room);
        self.sessions
            .insert(session_id.clone(), (code.clone(), Role::Host));
        info!("[RoomManager] room {} created", code);
        Ok(RoomBinding {
            room_id: code,
            session_id,
            role: Role::Host,
        })
    }
}

impl Handler<JoinRoom> for RoomManager {
    type Result = Result<RoomBinding, ErrorKind>;

    fn handle(&mut self, msg: JoinRoom, ctx: &mut Context<Self>) -> Self::Result {
        let code = msg.room_id.trim().to_uppercase();
        let status = match self.rooms.get(&code) {
            Some(room) => room.status,
            None => return Err(ErrorKind::RoomNotFound),
        };
        match status {
            RoomStatus::Waiting => self.start_room(code, msg.conn, ctx),
            RoomStatus::Playing => {
                // Full only counts connected players: a dropped guest's
                // slot can be taken over by a fresh join.
                let room = self.rooms.get(&code).ok_or(ErrorKind::RoomNotFound)?;
                let guest_disconnected = room
                    .guest
                    .as_ref()
                    .is_some_and(|slot| !slot.connected);
                if !room.is_full() && guest_disconnected {
                    self.replace_guest(code, msg.conn, ctx)
                } else {
                    Err(ErrorKind::RoomFull)
                }
            }
            RoomStatus::Finished => Err(ErrorKind::RoomNotFound),
        }
    }
}

impl Handler<Reconnect> for RoomManager {
    type Result = Result<RoomBinding, ErrorKind>;

    fn handle(&mut self, msg: Reconnect, ctx: &mut Context<Self>) -> Self::Result {
        let Some((code, role)) = self.sessions.get(&msg.session_id).cloned() else {
            return Err(ErrorKind::RoomNotFound);
        };
        let Some(room) = self.rooms.get_mut(&code) else {
            return Err(ErrorKind::RoomNotFound);
        };
        let Some(slot) = room.slot_mut(role) else {
            return Err(ErrorKind::RoomNotFound);
        };

        if let Some(handle) = slot.grace_timer.take() {
            ctx.cancel_future(handle);
        }
        slot.conn = Some(msg.conn.clone());
        slot.connected = true;
        room.notify_peer(role, ServerWsMessage::OpponentReconnected);
        if let Some(engine) = &room.engine {
            engine.do_send(UpdateConn {
                role,
                conn: msg.conn.messages.clone(),
            });
            msg.conn.control.do_send(EngineAttached {
                engine: engine.clone(),
                role,
            });
        }
        info!("[RoomManager] session {} reconnected to room {}", msg.session_id, code);
        Ok(RoomBinding {
            room_id: code,
            session_id: msg.session_id,
            role,
        })
    }
}

impl Handler<LeaveRoom> for RoomManager {
    type Result = ();

    fn handle(&mut self, msg: LeaveRoom, _: &mut Context<Self>) -> Self::Result {
        let Some((code, role)) = self.sessions.get(&msg.session_id).cloned() else {
            return;
        };
        info!("[RoomManager] session {} left room {}", msg.session_id, code);
        if let Some(room) = self.rooms.get(&code) {
            room.notify_peer(role, ServerWsMessage::PlayerLeft);
        }
        self.teardown_room(&code);
    }
}

impl Handler<ConnectionClosed> for RoomManager {
    type Result = ();

    fn handle(&mut self, msg: ConnectionClosed, ctx: &mut Context<Self>) -> Self::Result {
        let Some((code, role)) = self.sessions.get(&msg.session_id).cloned() else {
            return;
        };
        let status = match self.rooms.get(&code) {
            Some(room) => room.status,
            None => return,
        };
        match status {
            // Never ran: free the room immediately.
            RoomStatus::Waiting => {
                info!("[RoomManager] host left waiting room {}", code);
                self.teardown_room(&code);
            }
            RoomStatus::Playing => {
                let timeout = self.reconnect_timeout;
                if let Some(room) = self.rooms.get_mut(&code) {
                    if let Some(slot) = room.slot_mut(role) {
                        slot.connected = false;
                        slot.conn = None;
                    }
                    room.notify_peer(role, ServerWsMessage::OpponentDisconnected);
                    let session_id = msg.session_id.clone();
                    let handle = ctx.run_later(timeout, move |act, _| {
                        act.expire_session(&session_id);
                    });
                    if let Some(slot) = room.slot_mut(role) {
                        slot.grace_timer = Some(handle);
                    }
                    info!(
                        "[RoomManager] session {} disconnected from room {}, grace window started",
                        msg.session_id, code
                    );
                }
            }
            RoomStatus::Finished => {
                if let Some(room) = self.rooms.get_mut(&code) {
                    if let Some(slot) = room.slot_mut(role) {
                        slot.connected = false;
                        slot.conn = None;
                    }
                    if room.connected_players() == 0 {
                        self.teardown_room(&code);
                    }
                }
            }
        }
    }
}

impl Handler<RoomFinished> for RoomManager {
    type Result = ();

    fn handle(&mut self, msg: RoomFinished, _: &mut Context<Self>) -> Self::Result {
        if let Some(room) = self.rooms.get_mut(&msg.room_id) {
            room.status = RoomStatus::Finished;
        }
    }
}

impl Handler<HealthQuery> for RoomManager {
    type Result = HealthInfo;

    fn handle(&mut self, _: HealthQuery, _: &mut Context<Self>) -> Self::Result {
        HealthInfo {
            rooms: self.rooms.len(),
            players: self.rooms.values().map(|r| r.connected_players()).sum(),
        }
    }
}
