use serde::{Deserialize, Serialize};

use crate::config::game::{
    BOT_ARMOR_SPEED, BOT_BASIC_SPEED, BOT_FAST_SPEED, BOT_POWER_SPEED, BULLET_SIZE, PLAYER_SPEED,
    SCORE_ARMOR, SCORE_BASIC, SCORE_FAST, SCORE_POWER, SPAWN_HELMET_MS, TANK_SIZE,
};
use crate::game::collision::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// True when turning between the horizontal and vertical axes.
    pub fn is_perpendicular_to(self, other: Direction) -> bool {
        self.is_horizontal() != other.is_horizontal()
    }

    /// Unit displacement along this direction.
    pub fn delta(self) -> (f64, f64) {
        match self {
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
        }
    }

    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Bot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TankLevel {
    Basic,
    Fast,
    Power,
    Armor,
}

impl TankLevel {
    /// Bot movement speed for this level, units per millisecond.
    pub fn bot_speed(self) -> f64 {
        match self {
            TankLevel::Basic => BOT_BASIC_SPEED,
            TankLevel::Fast => BOT_FAST_SPEED,
            TankLevel::Power => BOT_POWER_SPEED,
            TankLevel::Armor => BOT_ARMOR_SPEED,
        }
    }

    /// Starting hit points for a bot of this level.
    pub fn initial_hp(self) -> u32 {
        match self {
            TankLevel::Armor => 4,
            _ => 1,
        }
    }

    /// Score awarded for destroying a bot of this level.
    pub fn score(self) -> u32 {
        match self {
            TankLevel::Basic => SCORE_BASIC,
            TankLevel::Fast => SCORE_FAST,
            TankLevel::Power => SCORE_POWER,
            TankLevel::Armor => SCORE_ARMOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TankColor {
    Yellow,
    Green,
    Silver,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

/// Why a running game reached a terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    AllBotsDestroyed,
    EagleDestroyed,
    PlayersDestroyed,
}

impl GameOverReason {
    /// The wire string carried in `game_over.reason`.
    pub fn as_str(self) -> &'static str {
        match self {
            GameOverReason::AllBotsDestroyed => "all_bots_destroyed",
            GameOverReason::EagleDestroyed => "eagle_destroyed",
            GameOverReason::PlayersDestroyed => "players_destroyed",
        }
    }
}

/// A tank in the world. Players and bots share the same representation;
/// `side` selects the damage policy and movement speed.
#[derive(Debug, Clone)]
pub struct Tank {
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
    /// Remaining invincibility, ms.
    pub helmet_duration: f64,
    /// Remaining immobility, ms.
    pub frozen_timeout: f64,
    /// Remaining fire gate, ms. Firing requires this at 0.
    pub cooldown: f64,
    pub with_power_up: bool,
    /// Time until this bot reconsiders its heading, ms. Unused for players.
    pub heading_timer_ms: f64,
}

impl Tank {
    pub fn new_player(id: u32, x: f64, y: f64, color: TankColor) -> Self {
        Self {
            id,
            x,
            y,
            direction: Direction::Up,
            moving: false,
            alive: true,
            side: Side::Player,
            level: TankLevel::Basic,
            color,
            hp: 1,
            helmet_duration: SPAWN_HELMET_MS,
            frozen_timeout: 0.0,
            cooldown: 0.0,
            with_power_up: false,
            heading_timer_ms: 0.0,
        }
    }

    pub fn new_bot(id: u32, x: f64, y: f64, level: TankLevel, with_power_up: bool) -> Self {
        Self {
            id,
            x,
            y,
            direction: Direction::Down,
            moving: true,
            alive: true,
            side: Side::Bot,
            level,
            color: if with_power_up {
                TankColor::Red
            } else {
                TankColor::Silver
            },
            hp: level.initial_hp(),
            helmet_duration: 0.0,
            frozen_timeout: 0.0,
            cooldown: 0.0,
            with_power_up,
            heading_timer_ms: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, TANK_SIZE, TANK_SIZE)
    }

    /// Movement speed, units per millisecond.
    pub fn speed(&self) -> f64 {
        match self.side {
            Side::Player => PLAYER_SPEED,
            Side::Bot => self.level.bot_speed(),
        }
    }
}

/// A bullet in flight. Holds the owning tank's id, never a reference;
/// an owner that no longer resolves makes the bullet an orphan.
#[derive(Debug, Clone)]
pub struct Bullet {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub direction: Direction,
    /// Units per millisecond.
    pub speed: f64,
    pub tank_id: u32,
    /// 1–4; ≥ 3 destroys steel.
    pub power: u32,
}

impl Bullet {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, BULLET_SIZE, BULLET_SIZE)
    }
}

/// Latest intent received from one player slot. The transport overwrites
/// this cell on every `player_input`; the engine reads it each tick, so
/// re-sends with unchanged fields are naturally idempotent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    pub direction: Option<Direction>,
    pub moving: bool,
    pub firing: bool,
}

/// Per-slot progression: lives, score, and the slot's tank (if alive).
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub lives: u32,
    pub score: u32,
    pub active_tank_id: Option<u32>,
}

impl PlayerState {
    pub fn new(lives: u32) -> Self {
        Self {
            lives,
            score: 0,
            active_tank_id: None,
        }
    }
}
