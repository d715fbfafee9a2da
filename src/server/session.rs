//! Per-connection WebSocket session: the transport gateway.
//!
//! One `ClientSession` actor per socket. It parses and validates inbound
//! frames, rate-limits `player_input`, routes room events to the manager
//! and gameplay input to the bound engine, answers `ping` locally, and
//! serializes everything outbound. A socket drop hands the session id to
//! the manager so the reconnect grace window can start.

use actix::fut;
use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::{debug, error, info, warn};

use crate::game::types::PlayerInput;
use crate::server::clock::now_ms;
use crate::server::game_room::messages::{ClientGameOver, EngineAttached, SlotInput};
use crate::server::game_room::GameRoom;
use crate::server::messages::{ClientWsMessage, ServerWsMessage};
use crate::server::rate_limit::TokenBucket;
use crate::server::rooms::messages::{
    ConnectionClosed, CreateRoom, JoinRoom, LeaveRoom, Reconnect, RoomBinding,
};
use crate::server::rooms::types::{ClientConn, Role};
use crate::server::rooms::RoomManager;
use crate::server::ws_error::{self, ErrorKind};

pub struct ClientSession {
    manager: Addr<RoomManager>,
    limiter: TokenBucket,
    session_id: Option<String>,
    room_id: Option<String>,
    role: Option<Role>,
    engine: Option<Addr<GameRoom>>,
}

impl ClientSession {
    pub fn new(manager: Addr<RoomManager>) -> Self {
        Self {
            manager,
            limiter: TokenBucket::for_inputs(),
            session_id: None,
            room_id: None,
            role: None,
            engine: None,
        }
    }

    fn conn(&self, ctx: &mut ws::WebsocketContext<Self>) -> ClientConn {
        ClientConn {
            messages: ctx.address().recipient(),
            control: ctx.address().recipient(),
        }
    }

    fn send(&self, ctx: &mut ws::WebsocketContext<Self>, msg: &ServerWsMessage) {
        match serde_json::to_string(msg) {
            Ok(text) => ctx.text(text),
            Err(e) => {
                error!("[WS] failed to serialize outbound message: {}", e);
                ctx.text(
                    r#"{"event":"room_error","data":{"type":"server_error","message":"Internal server error"}}"#,
                );
            }
        }
    }

    fn bind(&mut self, binding: &RoomBinding) {
        self.session_id = Some(binding.session_id.clone());
        self.room_id = Some(binding.room_id.clone());
        self.role = Some(binding.role);
    }

    fn create_room(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let request = CreateRoom {
            conn: self.conn(ctx),
        };
        ctx.spawn(self.manager.send(request).into_actor(self).then(
            |res, act, ctx| {
                match res {
                    Ok(Ok(binding)) => {
                        act.bind(&binding);
                        act.send(
                            ctx,
                            &ServerWsMessage::RoomCreated {
                                room_id: binding.room_id,
                                session_id: binding.session_id,
                                role: binding.role,
                            },
                        );
                    }
                    Ok(Err(kind)) => act.send(ctx, &ws_error::room_error(kind)),
                    Err(e) => {
                        error!("[WS] room manager unreachable: {}", e);
                        act.send(ctx, &ws_error::room_error(ErrorKind::ServerError));
                    }
                }
                fut::ready(())
            },
        ));
    }

    fn join_room(&mut self, room_id: String, ctx: &mut ws::WebsocketContext<Self>) {
        let request = JoinRoom {
            conn: self.conn(ctx),
            room_id,
        };
        ctx.spawn(self.manager.send(request).into_actor(self).then(
            |res, act, ctx| {
                match res {
                    Ok(Ok(binding)) => {
                        act.bind(&binding);
                        act.send(
                            ctx,
                            &ServerWsMessage::RoomJoined {
                                room_id: binding.room_id,
                                session_id: binding.session_id,
                                role: binding.role,
                            },
                        );
                    }
                    Ok(Err(kind)) => act.send(ctx, &ws_error::room_error(kind)),
                    Err(e) => {
                        error!("[WS] room manager unreachable: {}", e);
                        act.send(ctx, &ws_error::room_error(ErrorKind::ServerError));
                    }
                }
                fut::ready(())
            },
        ));
    }

    fn reconnect(&mut self, session_id: String, ctx: &mut ws::WebsocketContext<Self>) {
        let request = Reconnect {
            conn: self.conn(ctx),
            session_id,
        };
        ctx.spawn(self.manager.send(request).into_actor(self).then(
            |res, act, ctx| {
                match res {
                    Ok(Ok(binding)) => {
                        act.bind(&binding);
                        act.send(
                            ctx,
                            &ServerWsMessage::ReconnectSuccess {
                                room_id: binding.room_id,
                                role: binding.role,
                            },
                        );
                    }
                    Ok(Err(kind)) => act.send(ctx, &ws_error::reconnect_failed(kind)),
                    Err(e) => {
                        error!("[WS] room manager unreachable: {}", e);
                        act.send(ctx, &ws_error::reconnect_failed(ErrorKind::ServerError));
                    }
                }
                fut::ready(())
            },
        ));
    }

    fn handle_client_message(
        &mut self,
        msg: ClientWsMessage,
        ctx: &mut ws::WebsocketContext<Self>,
    ) {
        match msg {
            ClientWsMessage::CreateRoom => self.create_room(ctx),
            ClientWsMessage::JoinRoom(payload) => self.join_room(payload.room_id, ctx),
            ClientWsMessage::Reconnect(payload) => self.reconnect(payload.session_id, ctx),
            ClientWsMessage::LeaveRoom => {
                if let Some(session_id) = self.session_id.take() {
                    self.manager.do_send(LeaveRoom { session_id });
                }
                self.room_id = None;
                self.role = None;
                self.engine = None;
            }
            ClientWsMessage::PlayerInput(payload) => {
                if !self.limiter.allow() {
                    warn!("[RateLimit] player_input over budget, dropped");
                    self.send(ctx, &ws_error::room_error(ErrorKind::InvalidInput));
                    return;
                }
                if payload.kind != "state" {
                    self.send(ctx, &ws_error::room_error(ErrorKind::InvalidInput));
                    return;
                }
                match (&self.engine, self.role) {
                    (Some(engine), Some(role)) => {
                        engine.do_send(SlotInput {
                            role,
                            input: PlayerInput {
                                direction: payload.direction,
                                moving: payload.moving,
                                firing: payload.firing,
                            },
                        });
                    }
                    _ => self.send(ctx, &ws_error::room_error(ErrorKind::Unauthorized)),
                }
            }
            ClientWsMessage::Ping(payload) => {
                self.send(
                    ctx,
                    &ServerWsMessage::Pong {
                        client_timestamp: payload.timestamp,
                        server_timestamp: now_ms(),
                    },
                );
            }
            ClientWsMessage::GameOver(hint) => {
                if let Some(engine) = &self.engine {
                    engine.do_send(ClientGameOver {
                        winner: hint.winner,
                        reason: hint.reason,
                    });
                }
            }
        }
    }
}

impl Actor for ClientSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        debug!("[WS] connection opened");
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if let Some(session_id) = self.session_id.take() {
            self.manager.do_send(ConnectionClosed { session_id });
        }
        debug!("[WS] connection closed (room {:?})", self.room_id);
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ClientSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => {
                let parsed: ClientWsMessage = match serde_json::from_str(&text) {
                    Ok(m) => m,
                    Err(e) => {
                        warn!("[WS] invalid frame: {} | {}", e, text);
                        self.send(ctx, &ws_error::room_error(ErrorKind::InvalidInput));
                        return;
                    }
                };
                self.handle_client_message(parsed, ctx);
            }
            Ok(ws::Message::Ping(payload)) => ctx.pong(&payload),
            Ok(ws::Message::Close(reason)) => {
                info!("[WS] client closed the connection");
                ctx.close(reason);
                ctx.stop();
            }
            Ok(other) => {
                debug!("[WS] ignoring frame: {:?}", other);
            }
            Err(e) => {
                error!("[WS] protocol error: {:?}", e);
                ctx.stop();
            }
        }
    }
}

impl Handler<ServerWsMessage> for ClientSession {
    type Result = ();

    fn handle(&mut self, msg: ServerWsMessage, ctx: &mut Self::Context) -> Self::Result {
        self.send(ctx, &msg);
    }
}

impl Handler<EngineAttached> for ClientSession {
    type Result = ();

    fn handle(&mut self, msg: EngineAttached, _: &mut Self::Context) -> Self::Result {
        self.role = Some(msg.role);
        self.engine = Some(msg.engine);
    }
}

/// The single WebSocket entry point; every client event flows over it.
pub async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    data: web::Data<crate::server::state::AppState>,
) -> Result<HttpResponse, Error> {
    ws::start(ClientSession::new(data.room_manager.clone()), &req, stream)
}
