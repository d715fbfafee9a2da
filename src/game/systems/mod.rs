//! Per-tick simulation systems.
//!
//! Each system is a free function over the engine's state, called by
//! `GameState::tick` in the fixed order the simulation requires.

pub mod ai;
pub mod bullets;
pub mod movement;
pub mod spawn;
