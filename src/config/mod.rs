/// Main configuration module.
///
/// Re-exports submodules for server, room, game, and rate-limit configuration.
pub mod game;
pub mod rate_limit;
pub mod room;
pub mod server;
