//! Destructible tile map.
//!
//! The battlefield is 13×13 blocks of 16 units. Bricks live on a 52×52
//! grid of 4-unit cells, steels on a 26×26 grid of 8-unit cells, both kept
//! as flat bool arrays indexed `row * cols + col`. Destruction only flips
//! `true → false`; the arrays never grow or shrink for the room's lifetime.
//!
//! Stage descriptors are row-major text: 13 lines of 13 six-character
//! columns. A blank column is an empty block. `B` (optionally followed by
//! up to four hex digits) places bricks: the 16-bit mask selects cells of
//! the block's 4×4 brick sub-grid, bit k = row-major cell k, bare `B` is a
//! full block. `T` with one optional hex digit does the same for the 2×2
//! steel sub-grid. `E` places the eagle.

use crate::config::game::{
    BLOCK_SIZE, BRICK_CELL, BRICK_COLS, FIELD_BLOCKS, STEEL_CELL, STEEL_COLS, WALL_THRESHOLD,
};
use crate::game::collision::{cell_range, overlap, Rect};

/// Width of one stage-descriptor column, in characters.
const STAGE_COLUMN_WIDTH: usize = 6;

/// Map id reported in `game_state_init`.
pub const STAGE_ONE_ID: &str = "stage-1";

/// The built-in stage: brick lanes, a steel belt mid-field, and the eagle
/// bottom-center behind a brick shield. Bot spawn blocks (top row) and
/// player spawn blocks (bottom row, flanking the shield) are kept clear.
pub const STAGE_ONE: &str = "
      B           B           B           B           B           B
      B           B           B           B           B           B
      B           B           B     T     B           B           B
      B           B                                   B           B
                              B           B
T           B     B           B           B           B     B           T

      B           B           B           B           B           B
      B           B           B           B           B           B
      B           B                                   B           B
      B           B           B     B     B           B           B
                              B     E     B
";

/// Wall cells a bullet's bounding box touches this instant.
#[derive(Debug, Default, Clone)]
pub struct WallContact {
    pub bricks: Vec<usize>,
    pub steels: Vec<usize>,
    pub eagle: bool,
}

impl WallContact {
    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty() && self.steels.is_empty() && !self.eagle
    }
}

#[derive(Debug, Clone)]
pub struct MapState {
    pub bricks: Vec<bool>,
    pub steels: Vec<bool>,
    pub eagle: Option<Rect>,
    pub eagle_broken: bool,
}

/// Parse a stage descriptor into a fresh map.
pub fn parse_stage(text: &str) -> Result<MapState, String> {
    let mut bricks = vec![false; BRICK_COLS * BRICK_COLS];
    let mut steels = vec![false; STEEL_COLS * STEEL_COLS];
    let mut eagle: Option<Rect> = None;

    for (row, line) in text.lines().enumerate() {
        if row >= FIELD_BLOCKS {
            return Err(format!("stage has more than {} rows", FIELD_BLOCKS));
        }
        for col in 0..FIELD_BLOCKS {
            let start = col * STAGE_COLUMN_WIDTH;
            let end = (start + STAGE_COLUMN_WIDTH).min(line.len());
            if start >= line.len() {
                break;
            }
            let token = line.get(start..end).unwrap_or("").trim();
            if token.is_empty() {
                continue;
            }
            let (kind, mask) = token.split_at(1);
            match kind {
                "B" => {
                    let mask = if mask.is_empty() {
                        0xffff
                    } else {
                        u16::from_str_radix(mask, 16)
                            .map_err(|_| format!("bad brick token '{}' at {},{}", token, row, col))?
                    };
                    for bit in 0..16 {
                        if mask & (1 << bit) != 0 {
                            let r = row * 4 + bit / 4;
                            let c = col * 4 + bit % 4;
                            bricks[r * BRICK_COLS + c] = true;
                        }
                    }
                }
                "T" => {
                    let mask = if mask.is_empty() {
                        0xf
                    } else {
                        u16::from_str_radix(mask, 16)
                            .map_err(|_| format!("bad steel token '{}' at {},{}", token, row, col))?
                    };
                    for bit in 0..4 {
                        if mask & (1 << bit) != 0 {
                            let r = row * 2 + bit / 2;
                            let c = col * 2 + bit % 2;
                            steels[r * STEEL_COLS + c] = true;
                        }
                    }
                }
                "E" => {
                    if eagle.is_some() {
                        return Err("stage has more than one eagle".to_string());
                    }
                    eagle = Some(Rect::new(
                        col as f64 * BLOCK_SIZE,
                        row as f64 * BLOCK_SIZE,
                        BLOCK_SIZE,
                        BLOCK_SIZE,
                    ));
                }
                _ => {
                    return Err(format!("unknown token '{}' at {},{}", token, row, col));
                }
            }
        }
    }

    Ok(MapState {
        bricks,
        steels,
        eagle,
        eagle_broken: false,
    })
}

impl MapState {
    pub fn brick_at(&self, index: usize) -> bool {
        self.bricks.get(index).copied().unwrap_or(false)
    }

    pub fn steel_at(&self, index: usize) -> bool {
        self.steels.get(index).copied().unwrap_or(false)
    }

    pub fn destroy_brick(&mut self, index: usize) {
        if let Some(cell) = self.bricks.get_mut(index) {
            *cell = false;
        }
    }

    pub fn destroy_steel(&mut self, index: usize) {
        if let Some(cell) = self.steels.get_mut(index) {
            *cell = false;
        }
    }

    fn brick_rect(index: usize) -> Rect {
        Rect::new(
            (index % BRICK_COLS) as f64 * BRICK_CELL,
            (index / BRICK_COLS) as f64 * BRICK_CELL,
            BRICK_CELL,
            BRICK_CELL,
        )
    }

    fn steel_rect(index: usize) -> Rect {
        Rect::new(
            (index % STEEL_COLS) as f64 * STEEL_CELL,
            (index / STEEL_COLS) as f64 * STEEL_CELL,
            STEEL_CELL,
            STEEL_CELL,
        )
    }

    /// Whether a tank-sized probe is blocked by any live wall cell or the
    /// eagle block. Uses the grazing threshold and scans only the cells
    /// under the probe's bounding box.
    pub fn blocks_tank(&self, probe: &Rect) -> bool {
        let (c0, c1) = cell_range(probe.x, probe.x + probe.w, BRICK_CELL, BRICK_COLS);
        let (r0, r1) = cell_range(probe.y, probe.y + probe.h, BRICK_CELL, BRICK_COLS);
        for r in r0..=r1 {
            for c in c0..=c1 {
                let index = r * BRICK_COLS + c;
                if self.brick_at(index) && overlap(probe, &Self::brick_rect(index), WALL_THRESHOLD)
                {
                    return true;
                }
            }
        }

        let (c0, c1) = cell_range(probe.x, probe.x + probe.w, STEEL_CELL, STEEL_COLS);
        let (r0, r1) = cell_range(probe.y, probe.y + probe.h, STEEL_CELL, STEEL_COLS);
        for r in r0..=r1 {
            for c in c0..=c1 {
                let index = r * STEEL_COLS + c;
                if self.steel_at(index) && overlap(probe, &Self::steel_rect(index), WALL_THRESHOLD)
                {
                    return true;
                }
            }
        }

        // The eagle block stays solid even after it is broken.
        if let Some(eagle) = &self.eagle {
            if overlap(probe, eagle, WALL_THRESHOLD) {
                return true;
            }
        }

        false
    }

    /// All live wall cells a bullet-sized probe touches, zero threshold.
    pub fn bullet_wall_hits(&self, probe: &Rect) -> WallContact {
        let mut contact = WallContact::default();

        let (c0, c1) = cell_range(probe.x, probe.x + probe.w, BRICK_CELL, BRICK_COLS);
        let (r0, r1) = cell_range(probe.y, probe.y + probe.h, BRICK_CELL, BRICK_COLS);
        for r in r0..=r1 {
            for c in c0..=c1 {
                let index = r * BRICK_COLS + c;
                if self.brick_at(index) && overlap(probe, &Self::brick_rect(index), 0.0) {
                    contact.bricks.push(index);
                }
            }
        }

        let (c0, c1) = cell_range(probe.x, probe.x + probe.w, STEEL_CELL, STEEL_COLS);
        let (r0, r1) = cell_range(probe.y, probe.y + probe.h, STEEL_CELL, STEEL_COLS);
        for r in r0..=r1 {
            for c in c0..=c1 {
                let index = r * STEEL_COLS + c;
                if self.steel_at(index) && overlap(probe, &Self::steel_rect(index), 0.0) {
                    contact.steels.push(index);
                }
            }
        }

        if let Some(eagle) = &self.eagle {
            if overlap(probe, eagle, 0.0) {
                contact.eagle = true;
            }
        }

        contact
    }
}
