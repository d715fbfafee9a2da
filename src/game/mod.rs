//! Core simulation module.
//!
//! Everything in here is pure, single-threaded game logic: entity types,
//! the tile map, collision tests, the deterministic RNG, the per-tick
//! systems, and snapshot export. The actor layer in `server` owns one
//! `GameState` per room and is its only writer.

pub mod collision;
pub mod lcg;
pub mod map;
pub mod reconcile;
pub mod snapshot;
pub mod state;
pub mod types;

pub mod systems;
