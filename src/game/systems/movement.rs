//! Tank movement: input application, perpendicular-turn alignment, and
//! clamp-and-block motion (a blocked tank stays put for the tick).

use crate::config::game::{FIELD_SIZE, TANK_SIZE, TURN_ALIGN_GRID};
use crate::game::collision::Rect;
use crate::game::map::MapState;
use crate::game::types::{Direction, PlayerInput, Tank};

/// Apply the slot's latest intent to its tank: turn (with alignment when
/// the turn crosses axes) and update the moving flag.
pub fn apply_player_input(tank: &mut Tank, input: &PlayerInput, map: &MapState) {
    if let Some(requested) = input.direction {
        if requested != tank.direction && requested.is_perpendicular_to(tank.direction) {
            align_for_turn(tank, requested, map);
        }
        tank.direction = requested;
    }
    tank.moving = input.moving;
}

/// Snap the axis that becomes fixed after the turn to the 8-unit lattice,
/// so the tank lines up with corridors. `floor8`/`ceil8` are tried first;
/// if exactly one is collision-free it wins, otherwise `round8`.
fn align_for_turn(tank: &mut Tank, requested: Direction, map: &MapState) {
    if requested.is_horizontal() {
        let x = tank.x;
        tank.y = aligned_coord(tank.y, |y| Rect::new(x, y, TANK_SIZE, TANK_SIZE), map);
    } else {
        let y = tank.y;
        tank.x = aligned_coord(tank.x, |x| Rect::new(x, y, TANK_SIZE, TANK_SIZE), map);
    }
}

fn aligned_coord(coord: f64, probe: impl Fn(f64) -> Rect, map: &MapState) -> f64 {
    let max = FIELD_SIZE - TANK_SIZE;
    let floor8 = ((coord / TURN_ALIGN_GRID).floor() * TURN_ALIGN_GRID).clamp(0.0, max);
    let ceil8 = ((coord / TURN_ALIGN_GRID).ceil() * TURN_ALIGN_GRID).clamp(0.0, max);
    let floor_free = !map.blocks_tank(&probe(floor8));
    let ceil_free = !map.blocks_tank(&probe(ceil8));
    match (floor_free, ceil_free) {
        (true, false) => floor8,
        (false, true) => ceil8,
        _ => ((coord / TURN_ALIGN_GRID).round() * TURN_ALIGN_GRID).clamp(0.0, max),
    }
}

/// Advance a moving tank along its facing. The candidate position is
/// clamped to the field; if it collides with any wall the tank does not
/// move this tick. A frozen tank never moves.
pub fn move_tank(tank: &mut Tank, map: &MapState, delta: f64) {
    if !tank.moving || tank.frozen_timeout > 0.0 {
        return;
    }
    let (dx, dy) = tank.direction.delta();
    let step = tank.speed() * delta;
    let max = FIELD_SIZE - TANK_SIZE;
    let nx = (tank.x + dx * step).clamp(0.0, max);
    let ny = (tank.y + dy * step).clamp(0.0, max);
    if !map.blocks_tank(&Rect::new(nx, ny, TANK_SIZE, TANK_SIZE)) {
        tank.x = nx;
        tank.y = ny;
    }
}
