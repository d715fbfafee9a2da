//! Authoritative world snapshots.
//!
//! The wire shape of `state_sync`: a complete copy of the room's state,
//! safe to serialize from the broadcast timer without touching the engine
//! beyond a read. Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::game::types::{Bullet, Direction, GameStatus, PlayerState, Side, Tank, TankColor, TankLevel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TankView {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub direction: Direction,
    pub moving: bool,
    pub alive: bool,
    pub side: Side,
    pub level: TankLevel,
    pub color: TankColor,
    pub hp: u32,
    pub helmet: f64,
    pub frozen: f64,
    pub cooldown: f64,
    pub with_power_up: bool,
}

impl From<&Tank> for TankView {
    fn from(tank: &Tank) -> Self {
        Self {
            id: tank.id,
            x: tank.x,
            y: tank.y,
            direction: tank.direction,
            moving: tank.moving,
            alive: tank.alive,
            side: tank.side,
            level: tank.level,
            color: tank.color,
            hp: tank.hp,
            helmet: tank.helmet_duration,
            frozen: tank.frozen_timeout,
            cooldown: tank.cooldown,
            with_power_up: tank.with_power_up,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletView {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub direction: Direction,
    pub speed: f64,
    pub tank_id: u32,
    pub power: u32,
}

impl From<&Bullet> for BulletView {
    fn from(bullet: &Bullet) -> Self {
        Self {
            id: bullet.id,
            x: bullet.x,
            y: bullet.y,
            direction: bullet.direction,
            speed: bullet.speed,
            tank_id: bullet.tank_id,
            power: bullet.power,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub bricks: Vec<bool>,
    pub steels: Vec<bool>,
    pub eagle_broken: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    pub lives: u32,
    pub score: u32,
    pub active_tank_id: Option<u32>,
}

impl From<&PlayerState> for SlotView {
    fn from(slot: &PlayerState) -> Self {
        Self {
            lives: slot.lives,
            score: slot.score,
            active_tank_id: slot.active_tank_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayersView {
    pub host: SlotView,
    pub guest: SlotView,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub tanks: Vec<TankView>,
    pub bullets: Vec<BulletView>,
    pub map: MapView,
    pub players: PlayersView,
    pub remaining_bots: usize,
    pub game_status: GameStatus,
    pub timestamp: u64,
}

/// Cells destroyed during one tick; broadcast only when non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapChanges {
    pub bricks_destroyed: Vec<usize>,
    pub steels_destroyed: Vec<usize>,
}

impl MapChanges {
    pub fn is_empty(&self) -> bool {
        self.bricks_destroyed.is_empty() && self.steels_destroyed.is_empty()
    }
}
