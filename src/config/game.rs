/// Game simulation constants.
///
/// Field geometry, entity sizes, movement speeds, countdown durations,
/// the bot spawn schedule, and the client reconciliation contract.

/// Side length of the square battlefield, in world units (13 blocks of 16).
pub const FIELD_SIZE: f64 = 208.0;

/// Side length of one map block, in world units.
pub const BLOCK_SIZE: f64 = 16.0;

/// Blocks per battlefield row/column.
pub const FIELD_BLOCKS: usize = 13;

/// Side length of one brick cell, in world units.
pub const BRICK_CELL: f64 = 4.0;

/// Brick cells per battlefield row/column (52 × 52 grid).
pub const BRICK_COLS: usize = 52;

/// Side length of one steel cell, in world units.
pub const STEEL_CELL: f64 = 8.0;

/// Steel cells per battlefield row/column (26 × 26 grid).
pub const STEEL_COLS: usize = 26;

/// Tank bounding box side length.
pub const TANK_SIZE: f64 = 16.0;

/// Bullet bounding box side length.
pub const BULLET_SIZE: f64 = 3.0;

/// Signed overlap threshold for tank-vs-wall tests. Negative: a tank may
/// graze a wall cell by up to this much without counting as a collision.
pub const WALL_THRESHOLD: f64 = -0.01;

/// Player tank speed, units per millisecond.
pub const PLAYER_SPEED: f64 = 0.045;

/// Bot speeds by level, units per millisecond.
pub const BOT_BASIC_SPEED: f64 = 0.030;
pub const BOT_FAST_SPEED: f64 = 0.060;
pub const BOT_POWER_SPEED: f64 = 0.045;
pub const BOT_ARMOR_SPEED: f64 = 0.030;

/// Bullet speed, units per millisecond.
pub const BULLET_SPEED: f64 = 0.180;

/// Milliseconds between shots from one tank.
pub const FIRE_COOLDOWN_MS: f64 = 300.0;

/// Minimum bullet power that destroys steel cells.
pub const STEEL_PIERCE_POWER: u32 = 3;

/// Invincibility granted on spawn and respawn, in milliseconds.
pub const SPAWN_HELMET_MS: f64 = 2000.0;

/// Grid pitch for perpendicular-turn alignment, in world units.
pub const TURN_ALIGN_GRID: f64 = 8.0;

/// Lives each player slot starts with.
pub const LIVES_PER_PLAYER: u32 = 3;

/// Fixed spawn positions for the two player slots.
pub const HOST_SPAWN: (f64, f64) = (64.0, 192.0);
pub const GUEST_SPAWN: (f64, f64) = (128.0, 192.0);

/// Bot spawn positions, cycled in order as the queue drains.
pub const BOT_SPAWN_POSITIONS: [(f64, f64); 3] = [(0.0, 0.0), (96.0, 0.0), (192.0, 0.0)];

/// Total bots per room: 18 basic, 1 fast, 1 power (shuffled per room).
pub const BOT_QUEUE_SIZE: usize = 20;

/// Queue indices whose bot carries a power-up (the 4th, 11th, 18th).
pub const POWER_UP_INDICES: [usize; 3] = [3, 10, 17];

/// Bots spawned immediately when the engine starts.
pub const INITIAL_BOT_BURST: usize = 4;

/// Milliseconds between bot spawns after the initial burst.
pub const BOT_SPAWN_INTERVAL_MS: f64 = 3000.0;

/// Mean milliseconds between bot shots (fire chance per tick = delta / mean).
pub const BOT_FIRE_MEAN_INTERVAL_MS: f64 = 800.0;

/// Bot heading lifetime: minimum plus a random share of the jitter.
pub const BOT_HEADING_MIN_MS: f64 = 1000.0;
pub const BOT_HEADING_JITTER_MS: f64 = 2000.0;

/// Score awarded to a slot for destroying a bot, by level.
pub const SCORE_BASIC: u32 = 100;
pub const SCORE_FAST: u32 = 200;
pub const SCORE_POWER: u32 = 300;
pub const SCORE_ARMOR: u32 = 400;

/// Drift below which a predicting client keeps its local position.
pub const PREDICTION_TOLERANCE: f64 = 2.0;

/// Interpolation factor applied per snapshot beyond the tolerance.
pub const CORRECTION_FACTOR: f64 = 0.3;
