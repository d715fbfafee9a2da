/// Room lifecycle and transport cadence constants.

/// A room holds exactly one host and one guest.
pub const MAX_PLAYERS_PER_ROOM: usize = 2;

/// Characters in a room code.
pub const ROOM_CODE_LENGTH: usize = 6;

/// Alphabet for room codes (uppercase alphanumeric).
pub const ROOM_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// How long a disconnected slot is held before the room is torn down.
pub const RECONNECT_TIMEOUT_MS: u64 = 30_000;

/// Simulation tick interval (60 Hz).
pub const TICK_INTERVAL_MS: u64 = 16;

/// Snapshot broadcast interval.
pub const BROADCAST_INTERVAL_MS: u64 = 16;
