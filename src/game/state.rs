//! Authoritative per-room game state.
//!
//! One `GameState` exists per room, owned and mutated exclusively by the
//! room's actor. `tick` advances the simulation by a wall-clock delta in
//! the fixed order the rules require; everything else is bookkeeping
//! around it (spawn schedule, snapshot export, map-change deltas).

use std::mem;

use crate::config::game::{BOT_SPAWN_INTERVAL_MS, INITIAL_BOT_BURST, LIVES_PER_PLAYER};
use crate::game::lcg::Lcg;
use crate::game::map::{parse_stage, MapState, STAGE_ONE};
use crate::game::snapshot::{
    BulletView, MapChanges, MapView, PlayersView, Snapshot, SlotView, TankView,
};
use crate::game::systems::{ai, bullets, movement, spawn};
use crate::game::types::{
    Bullet, GameOverReason, GameStatus, PlayerInput, PlayerState, Side, Tank, TankColor,
};

pub struct GameState {
    pub tanks: Vec<Tank>,
    pub bullets: Vec<Bullet>,
    pub map: MapState,
    pub host: PlayerState,
    pub guest: PlayerState,
    pub status: GameStatus,
    pub over_reason: Option<GameOverReason>,
    seed: u32,
    rng: Lcg,
    bot_queue: Vec<spawn::BotSpec>,
    bots_spawned: usize,
    spawn_timer_ms: f64,
    next_tank_id: u32,
    next_bullet_id: u32,
    pending_changes: MapChanges,
}

impl GameState {
    /// Build the world for a room: parse the stage, spawn both player
    /// tanks at their fixed slots, generate the seeded bot queue, and
    /// spawn the initial burst.
    pub fn new(room_code: &str) -> Self {
        let map = parse_stage(STAGE_ONE).expect("built-in stage is valid");
        let mut rng = Lcg::from_room_code(room_code);
        let seed = rng.seed();
        let bot_queue = spawn::generate_bot_queue(&mut rng);

        let mut next_tank_id = 1;
        let mut tanks = Vec::new();
        let mut host = PlayerState::new(LIVES_PER_PLAYER);
        let mut guest = PlayerState::new(LIVES_PER_PLAYER);

        let host_tank = spawn::spawn_player_tank(&mut next_tank_id, TankColor::Yellow);
        host.active_tank_id = Some(host_tank.id);
        tanks.push(host_tank);

        let guest_tank = spawn::spawn_player_tank(&mut next_tank_id, TankColor::Green);
        guest.active_tank_id = Some(guest_tank.id);
        tanks.push(guest_tank);

        let mut state = Self {
            tanks,
            bullets: Vec::new(),
            map,
            host,
            guest,
            status: GameStatus::Playing,
            over_reason: None,
            seed,
            rng,
            bot_queue,
            bots_spawned: 0,
            spawn_timer_ms: BOT_SPAWN_INTERVAL_MS,
            next_tank_id,
            next_bullet_id: 1,
            pending_changes: MapChanges::default(),
        };
        for _ in 0..INITIAL_BOT_BURST {
            state.spawn_next_bot();
        }
        state
    }

    /// The LCG seed derived from the room code (reported in
    /// `game_state_init` so clients can mirror deterministic effects).
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Bots not yet spawned from the queue.
    pub fn remaining_bots(&self) -> usize {
        self.bot_queue.len() - self.bots_spawned
    }

    /// Bots spawned so far (dead or alive).
    pub fn bots_spawned(&self) -> usize {
        self.bots_spawned
    }

    fn spawn_next_bot(&mut self) {
        if self.bots_spawned >= self.bot_queue.len() {
            return;
        }
        let spec = self.bot_queue[self.bots_spawned];
        let tank = spawn::spawn_bot(&mut self.next_tank_id, self.bots_spawned, spec);
        self.bots_spawned += 1;
        self.tanks.push(tank);
    }

    /// Advance the world by `delta` milliseconds with the latest intent
    /// from each slot. No-op once the game has reached a terminal status.
    pub fn tick(&mut self, delta: f64, host_input: PlayerInput, guest_input: PlayerInput) {
        if self.status != GameStatus::Playing {
            return;
        }

        // Tanks that died last tick were kept for one snapshot; drop them
        // now, and with them any bullets whose owner no longer resolves.
        self.reap_dead();
        self.respawn_players();

        self.update_player_slot(true, host_input, delta);
        self.update_player_slot(false, guest_input, delta);

        for index in 0..self.tanks.len() {
            if self.tanks[index].side != Side::Bot {
                continue;
            }
            if let Some(bullet) = ai::update_bot(
                &mut self.tanks[index],
                &self.map,
                &mut self.rng,
                delta,
                &mut self.next_bullet_id,
            ) {
                self.bullets.push(bullet);
            }
        }

        bullets::advance_bullets(&mut self.bullets, delta);
        bullets::resolve_wall_hits(&mut self.bullets, &mut self.map, &mut self.pending_changes);
        bullets::resolve_tank_hits(
            &mut self.bullets,
            &mut self.tanks,
            &mut self.host,
            &mut self.guest,
        );

        for tank in self.tanks.iter_mut() {
            tank.cooldown = (tank.cooldown - delta).max(0.0);
            tank.helmet_duration = (tank.helmet_duration - delta).max(0.0);
            tank.frozen_timeout = (tank.frozen_timeout - delta).max(0.0);
        }

        if self.remaining_bots() > 0 {
            self.spawn_timer_ms -= delta;
            while self.spawn_timer_ms <= 0.0 && self.remaining_bots() > 0 {
                self.spawn_next_bot();
                self.spawn_timer_ms += BOT_SPAWN_INTERVAL_MS;
            }
        }

        self.settle_player_deaths();
        self.update_status();
    }

    fn update_player_slot(&mut self, is_host: bool, input: PlayerInput, delta: f64) {
        let active = if is_host {
            self.host.active_tank_id
        } else {
            self.guest.active_tank_id
        };
        let Some(tank_id) = active else {
            return;
        };
        let Some(index) = self.tanks.iter().position(|t| t.id == tank_id && t.alive) else {
            return;
        };
        let tank = &mut self.tanks[index];
        movement::apply_player_input(tank, &input, &self.map);
        movement::move_tank(tank, &self.map, delta);
        if input.firing {
            if let Some(bullet) = bullets::try_fire(tank, &mut self.next_bullet_id) {
                self.bullets.push(bullet);
            }
        }
    }

    fn reap_dead(&mut self) {
        self.tanks.retain(|t| t.alive);
        let tanks = &self.tanks;
        self.bullets
            .retain(|b| tanks.iter().any(|t| t.id == b.tank_id));
    }

    fn respawn_players(&mut self) {
        if self.host.active_tank_id.is_none() && self.host.lives > 0 {
            let tank = spawn::spawn_player_tank(&mut self.next_tank_id, TankColor::Yellow);
            self.host.active_tank_id = Some(tank.id);
            self.tanks.push(tank);
        }
        if self.guest.active_tank_id.is_none() && self.guest.lives > 0 {
            let tank = spawn::spawn_player_tank(&mut self.next_tank_id, TankColor::Green);
            self.guest.active_tank_id = Some(tank.id);
            self.tanks.push(tank);
        }
    }

    /// Charge a life and release the slot when its tank died this tick.
    /// The corpse stays in `tanks` for one more snapshot.
    fn settle_player_deaths(&mut self) {
        for slot in [&mut self.host, &mut self.guest] {
            if let Some(tank_id) = slot.active_tank_id {
                let alive = self.tanks.iter().any(|t| t.id == tank_id && t.alive);
                if !alive {
                    slot.lives = slot.lives.saturating_sub(1);
                    slot.active_tank_id = None;
                }
            }
        }
    }

    fn update_status(&mut self) {
        if self.map.eagle_broken {
            self.status = GameStatus::Lost;
            self.over_reason = Some(GameOverReason::EagleDestroyed);
            return;
        }
        let any_player_alive = self
            .tanks
            .iter()
            .any(|t| t.side == Side::Player && t.alive);
        if self.host.lives == 0 && self.guest.lives == 0 && !any_player_alive {
            self.status = GameStatus::Lost;
            self.over_reason = Some(GameOverReason::PlayersDestroyed);
            return;
        }
        let any_bot_alive = self.tanks.iter().any(|t| t.side == Side::Bot && t.alive);
        if self.remaining_bots() == 0 && !any_bot_alive {
            self.status = GameStatus::Won;
            self.over_reason = Some(GameOverReason::AllBotsDestroyed);
        }
    }

    /// Export the authoritative world as a `state_sync` payload.
    pub fn snapshot(&self, timestamp: u64) -> Snapshot {
        Snapshot {
            tanks: self.tanks.iter().map(TankView::from).collect(),
            bullets: self.bullets.iter().map(BulletView::from).collect(),
            map: MapView {
                bricks: self.map.bricks.clone(),
                steels: self.map.steels.clone(),
                eagle_broken: self.map.eagle_broken,
            },
            players: PlayersView {
                host: SlotView::from(&self.host),
                guest: SlotView::from(&self.guest),
            },
            remaining_bots: self.remaining_bots(),
            game_status: self.status,
            timestamp,
        }
    }

    /// Cells destroyed since the last call, if any.
    pub fn take_map_changes(&mut self) -> Option<MapChanges> {
        if self.pending_changes.is_empty() {
            None
        } else {
            Some(mem::take(&mut self.pending_changes))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::game::{BOT_QUEUE_SIZE, FIRE_COOLDOWN_MS, SPAWN_HELMET_MS};
    use crate::game::types::Direction;

    const TICK: f64 = 16.0;

    fn idle() -> PlayerInput {
        PlayerInput::default()
    }

    fn firing() -> PlayerInput {
        PlayerInput {
            direction: None,
            moving: false,
            firing: true,
        }
    }

    fn host_tank(state: &GameState) -> &Tank {
        let id = state.host.active_tank_id.unwrap();
        state.tanks.iter().find(|t| t.id == id).unwrap()
    }

    #[test]
    fn test_new_world_layout() {
        let state = GameState::new("ROOM01");
        let players = state
            .tanks
            .iter()
            .filter(|t| t.side == Side::Player)
            .count();
        let bots = state.tanks.iter().filter(|t| t.side == Side::Bot).count();
        assert_eq!(players, 2);
        assert_eq!(bots, INITIAL_BOT_BURST);
        assert_eq!(state.remaining_bots(), BOT_QUEUE_SIZE - INITIAL_BOT_BURST);
        assert_eq!(state.status, GameStatus::Playing);
    }

    #[test]
    fn test_bot_accounting_invariant() {
        let mut state = GameState::new("ROOM01");
        for _ in 0..400 {
            state.tick(TICK, idle(), idle());
            assert_eq!(
                state.remaining_bots() + state.bots_spawned(),
                BOT_QUEUE_SIZE
            );
        }
    }

    #[test]
    fn test_spawn_schedule_advances() {
        let mut state = GameState::new("ROOM01");
        assert_eq!(state.bots_spawned(), INITIAL_BOT_BURST);
        // 3 seconds of ticks brings the fifth bot in.
        for _ in 0..((3000.0 / TICK) as usize + 1) {
            state.tick(TICK, idle(), idle());
        }
        assert_eq!(state.bots_spawned(), INITIAL_BOT_BURST + 1);
    }

    #[test]
    fn test_fire_produces_one_bullet_until_cooldown_elapses() {
        let mut state = GameState::new("ROOM01");
        state.tick(TICK, firing(), idle());
        let own_bullets = |state: &GameState| {
            let id = state.host.active_tank_id.unwrap();
            state.bullets.iter().filter(|b| b.tank_id == id).count()
        };
        assert_eq!(own_bullets(&state), 1);

        // Keep the trigger held: no second bullet while the gate is closed.
        state.tick(TICK, firing(), idle());
        assert_eq!(own_bullets(&state), 1);
        assert!(host_tank(&state).cooldown > 0.0);

        // After the cooldown runs out the next tick fires again; the first
        // bullet is still climbing the (clear) column above the spawn.
        for _ in 0..((FIRE_COOLDOWN_MS / TICK) as usize + 1) {
            state.tick(TICK, idle(), idle());
        }
        assert_eq!(host_tank(&state).cooldown, 0.0);
        state.tick(TICK, firing(), idle());
        assert_eq!(own_bullets(&state), 2);
    }

    #[test]
    fn test_resending_turn_input_aligns_only_once() {
        let mut state = GameState::new("ROOM01");
        // Nudge the host off the 8-unit lattice by moving up briefly.
        let up = PlayerInput {
            direction: Some(Direction::Up),
            moving: true,
            firing: false,
        };
        state.tick(10.0, up, idle());
        assert!((host_tank(&state).y - 191.55).abs() < 1e-9);

        // A perpendicular turn snaps the fixed axis once.
        let right = PlayerInput {
            direction: Some(Direction::Right),
            moving: false,
            firing: false,
        };
        state.tick(TICK, right, idle());
        assert_eq!(host_tank(&state).y, 192.0);

        // The same input re-sent is a no-op on that axis.
        state.tick(TICK, right, idle());
        assert_eq!(host_tank(&state).y, 192.0);
    }

    #[test]
    fn test_deterministic_replay_for_same_room_code() {
        let mut a = GameState::new("SEED42");
        let mut b = GameState::new("SEED42");
        let input = PlayerInput {
            direction: Some(Direction::Up),
            moving: true,
            firing: true,
        };
        for _ in 0..200 {
            a.tick(TICK, input, idle());
            b.tick(TICK, input, idle());
        }
        assert_eq!(a.snapshot(0), b.snapshot(0));
    }

    #[test]
    fn test_bot_queue_identical_across_engines_with_same_code() {
        let a = GameState::new("AAAAAA");
        let b = GameState::new("AAAAAA");
        assert_eq!(a.bot_queue, b.bot_queue);
        assert_eq!(a.seed(), b.seed());
    }

    #[test]
    fn test_dead_tank_retained_one_snapshot_then_removed() {
        let mut state = GameState::new("ROOM01");
        let bot_id = state
            .tanks
            .iter()
            .find(|t| t.side == Side::Bot)
            .map(|t| t.id)
            .unwrap();
        let bot = state.tanks.iter().find(|t| t.id == bot_id).unwrap();
        // Park a host-owned bullet inside the bot.
        let host_id = state.host.active_tank_id.unwrap();
        state.bullets.push(Bullet {
            id: 999,
            x: bot.x + 6.0,
            y: bot.y + 6.0,
            direction: Direction::Up,
            speed: 0.0,
            tank_id: host_id,
            power: 1,
        });
        state.tick(TICK, idle(), idle());
        let corpse = state.tanks.iter().find(|t| t.id == bot_id);
        assert!(corpse.is_some_and(|t| !t.alive), "retained for one tick");
        assert!(state.host.score > 0);

        state.tick(TICK, idle(), idle());
        assert!(state.tanks.iter().all(|t| t.id != bot_id));
    }

    #[test]
    fn test_player_death_consumes_life_and_respawns_with_helmet() {
        let mut state = GameState::new("ROOM01");
        let host_id = state.host.active_tank_id.unwrap();
        // Strip the spawn helmet and park a bot bullet inside the host.
        let (hx, hy) = {
            let tank = state
                .tanks
                .iter_mut()
                .find(|t| t.id == host_id)
                .unwrap();
            tank.helmet_duration = 0.0;
            (tank.x, tank.y)
        };
        let bot_id = state
            .tanks
            .iter()
            .find(|t| t.side == Side::Bot)
            .map(|t| t.id)
            .unwrap();
        state.bullets.push(Bullet {
            id: 999,
            x: hx + 6.0,
            y: hy + 6.0,
            direction: Direction::Up,
            speed: 0.0,
            tank_id: bot_id,
            power: 1,
        });
        state.tick(TICK, idle(), idle());
        assert_eq!(state.host.lives, LIVES_PER_PLAYER - 1);
        assert!(state.host.active_tank_id.is_none());

        state.tick(TICK, idle(), idle());
        let respawned = host_tank(&state);
        assert!(respawned.alive);
        assert!(respawned.helmet_duration > SPAWN_HELMET_MS - 2.0 * TICK);
        assert_ne!(respawned.id, host_id);
    }

    #[test]
    fn test_eagle_destruction_loses_the_game() {
        let mut state = GameState::new("ROOM01");
        let host_id = state.host.active_tank_id.unwrap();
        let eagle = state.map.eagle.unwrap();
        state.bullets.push(Bullet {
            id: 999,
            x: eagle.x + 6.0,
            y: eagle.y + 6.0,
            direction: Direction::Up,
            speed: 0.0,
            tank_id: host_id,
            power: 1,
        });
        state.tick(TICK, idle(), idle());
        assert!(state.map.eagle_broken);
        assert_eq!(state.status, GameStatus::Lost);
        assert_eq!(state.over_reason, Some(GameOverReason::EagleDestroyed));
    }

    #[test]
    fn test_no_wall_overlap_beyond_threshold_over_many_ticks() {
        let mut state = GameState::new("ROOM01");
        let inputs = [
            PlayerInput {
                direction: Some(Direction::Up),
                moving: true,
                firing: false,
            },
            PlayerInput {
                direction: Some(Direction::Left),
                moving: true,
                firing: false,
            },
        ];
        for round in 0..300 {
            state.tick(TICK, inputs[round % 2], inputs[(round + 1) % 2]);
            for tank in state.tanks.iter().filter(|t| t.alive) {
                assert!(
                    !state.map.blocks_tank(&tank.rect()),
                    "tank {} overlaps a wall at ({}, {})",
                    tank.id,
                    tank.x,
                    tank.y
                );
            }
        }
    }

    #[test]
    fn test_bullets_always_inside_field_at_snapshot_time() {
        let mut state = GameState::new("ROOM01");
        let input = PlayerInput {
            direction: Some(Direction::Up),
            moving: false,
            firing: true,
        };
        for _ in 0..300 {
            state.tick(TICK, input, input);
            for bullet in &state.bullets {
                assert!(bullet.x >= 0.0 && bullet.x + 3.0 <= 208.0);
                assert!(bullet.y >= 0.0 && bullet.y + 3.0 <= 208.0);
            }
        }
    }

    #[test]
    fn test_one_alive_tank_per_slot() {
        let mut state = GameState::new("ROOM01");
        for _ in 0..300 {
            state.tick(TICK, firing(), firing());
            for color in [TankColor::Yellow, TankColor::Green] {
                let alive = state
                    .tanks
                    .iter()
                    .filter(|t| t.side == Side::Player && t.color == color && t.alive)
                    .count();
                assert!(alive <= 1);
            }
        }
    }

    #[test]
    fn test_map_cells_are_monotone() {
        let mut state = GameState::new("ROOM01");
        let mut prev = state.map.bricks.clone();
        let input = PlayerInput {
            direction: Some(Direction::Up),
            moving: false,
            firing: true,
        };
        for _ in 0..300 {
            state.tick(TICK, input, input);
            for (index, (&was, &now)) in prev.iter().zip(state.map.bricks.iter()).enumerate() {
                assert!(!(now && !was), "brick {} resurrected", index);
            }
            prev = state.map.bricks.clone();
        }
    }
}
