//! The per-room game actor.
//!
//! One `GameRoom` is started when a room's second player arrives. It owns
//! the room's `GameState` outright, driven by two actix intervals: the
//! 16 ms simulation tick (delta-timed off a monotonic clock) and the 16 ms
//! `state_sync` broadcast. Player intent arrives as `SlotInput` messages
//! and lands in per-slot latest-input cells read at the top of each tick.
//! Outbound sends are `do_send` fire-and-forget: a slow client never slows
//! the tick.

use std::time::{Duration, Instant};

use actix::prelude::*;
use log::info;

use crate::config::game::{GUEST_SPAWN, HOST_SPAWN};
use crate::config::room::{BROADCAST_INTERVAL_MS, TICK_INTERVAL_MS};
use crate::game::map::STAGE_ONE_ID;
use crate::game::state::GameState;
use crate::game::types::{GameStatus, PlayerInput, TankColor};
use crate::server::clock::now_ms;
use crate::server::game_room::messages::{ClientGameOver, SlotInput, StopRoom, UpdateConn};
use crate::server::messages::{ServerWsMessage, Winner};
use crate::server::rooms::messages::RoomFinished;
use crate::server::rooms::types::Role;
use crate::server::rooms::RoomManager;

pub struct GameRoom {
    code: String,
    state: GameState,
    manager: Addr<RoomManager>,
    host_conn: Recipient<ServerWsMessage>,
    guest_conn: Recipient<ServerWsMessage>,
    host_input: PlayerInput,
    guest_input: PlayerInput,
    last_tick: Instant,
    finished: bool,
    timers: Vec<SpawnHandle>,
}

impl GameRoom {
    pub fn new(
        code: String,
        manager: Addr<RoomManager>,
        host_conn: Recipient<ServerWsMessage>,
        guest_conn: Recipient<ServerWsMessage>,
    ) -> Self {
        let state = GameState::new(&code);
        Self {
            code,
            state,
            manager,
            host_conn,
            guest_conn,
            host_input: PlayerInput::default(),
            guest_input: PlayerInput::default(),
            last_tick: Instant::now(),
            finished: false,
            timers: Vec::new(),
        }
    }

    fn send_both(&self, msg: ServerWsMessage) {
        self.host_conn.do_send(msg.clone());
        self.guest_conn.do_send(msg);
    }

    fn tick(&mut self, ctx: &mut Context<Self>) {
        if self.finished {
            return;
        }
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f64() * 1000.0;
        self.last_tick = now;

        self.state.tick(delta, self.host_input, self.guest_input);

        if let Some(changes) = self.state.take_map_changes() {
            self.send_both(ServerWsMessage::MapChanges(changes));
        }

        if self.state.status != GameStatus::Playing {
            let winner = self.winner_by_score();
            let reason = self
                .state
                .over_reason
                .map(|r| r.as_str().to_string())
                .unwrap_or_default();
            self.finish(ctx, winner, reason);
        }
    }

    fn broadcast_state(&self) {
        if self.finished {
            return;
        }
        self.send_both(ServerWsMessage::StateSync(self.state.snapshot(now_ms())));
    }

    fn winner_by_score(&self) -> Winner {
        match self.state.host.score.cmp(&self.state.guest.score) {
            std::cmp::Ordering::Greater => Winner::Host,
            std::cmp::Ordering::Less => Winner::Guest,
            std::cmp::Ordering::Equal => Winner::Draw,
        }
    }

    fn finish(&mut self, ctx: &mut Context<Self>, winner: Winner, reason: String) {
        if self.finished {
            return;
        }
        self.finished = true;
        // One last snapshot so clients render the final state, then the verdict.
        self.send_both(ServerWsMessage::StateSync(self.state.snapshot(now_ms())));
        self.send_both(ServerWsMessage::GameOver {
            winner,
            reason,
            timestamp: now_ms(),
        });
        for handle in self.timers.drain(..) {
            ctx.cancel_future(handle);
        }
        self.manager.do_send(RoomFinished {
            room_id: self.code.clone(),
        });
        info!("[GameRoom] room {} finished (winner={:?})", self.code, winner);
    }
}

impl Actor for GameRoom {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!("[GameRoom] engine started for room {}", self.code);

        let timestamp = now_ms();
        self.send_both(ServerWsMessage::GameStart { timestamp });
        self.send_both(ServerWsMessage::GameStateInit {
            seed: self.state.seed(),
            map_id: STAGE_ONE_ID.to_string(),
            host_position: HOST_SPAWN.into(),
            guest_position: GUEST_SPAWN.into(),
            host_tank_color: TankColor::Yellow,
            guest_tank_color: TankColor::Green,
            timestamp,
        });

        self.last_tick = Instant::now();
        let tick = ctx.run_interval(Duration::from_millis(TICK_INTERVAL_MS), |act, ctx| {
            act.tick(ctx);
        });
        let broadcast = ctx.run_interval(Duration::from_millis(BROADCAST_INTERVAL_MS), |act, _| {
            act.broadcast_state();
        });
        self.timers = vec![tick, broadcast];
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!("[GameRoom] engine stopped for room {}", self.code);
    }
}

impl Handler<SlotInput> for GameRoom {
    type Result = ();

    fn handle(&mut self, msg: SlotInput, _: &mut Context<Self>) -> Self::Result {
        match msg.role {
            Role::Host => self.host_input = msg.input,
            Role::Guest => self.guest_input = msg.input,
        }
    }
}

impl Handler<UpdateConn> for GameRoom {
    type Result = ();

    fn handle(&mut self, msg: UpdateConn, _: &mut Context<Self>) -> Self::Result {
        match msg.role {
            Role::Host => self.host_conn = msg.conn,
            Role::Guest => self.guest_conn = msg.conn,
        }
    }
}

impl Handler<ClientGameOver> for GameRoom {
    type Result = ();

    fn handle(&mut self, msg: ClientGameOver, ctx: &mut Context<Self>) -> Self::Result {
        info!(
            "[GameRoom] room {} closed by client report: {:?}",
            self.code, msg
        );
        self.finish(ctx, msg.winner, msg.reason);
    }
}

impl Handler<StopRoom> for GameRoom {
    type Result = ();

    fn handle(&mut self, _: StopRoom, ctx: &mut Context<Self>) -> Self::Result {
        ctx.stop();
    }
}
