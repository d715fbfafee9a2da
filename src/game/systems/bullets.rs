//! Bullet systems: firing, flight, wall destruction, and tank damage.

use crate::config::game::{
    BULLET_SIZE, BULLET_SPEED, FIELD_SIZE, FIRE_COOLDOWN_MS, STEEL_PIERCE_POWER, TANK_SIZE,
};
use crate::game::collision::overlap;
use crate::game::map::MapState;
use crate::game::snapshot::MapChanges;
use crate::game::types::{Bullet, Direction, PlayerState, Side, Tank, TankColor};

/// Fire from a tank's muzzle if its cooldown allows. Resets the cooldown
/// and returns the new bullet, or `None` while the gate is closed.
pub fn try_fire(tank: &mut Tank, next_bullet_id: &mut u32) -> Option<Bullet> {
    if !tank.alive || tank.cooldown > 0.0 {
        return None;
    }
    tank.cooldown = FIRE_COOLDOWN_MS;
    let (x, y) = muzzle(tank);
    let id = *next_bullet_id;
    *next_bullet_id += 1;
    Some(Bullet {
        id,
        x,
        y,
        direction: tank.direction,
        speed: BULLET_SPEED,
        tank_id: tank.id,
        power: 1,
    })
}

/// Bullet origin: tank front-center, offset outward by the bullet size.
fn muzzle(tank: &Tank) -> (f64, f64) {
    let center = (TANK_SIZE - BULLET_SIZE) / 2.0;
    match tank.direction {
        Direction::Up => (tank.x + center, tank.y - BULLET_SIZE),
        Direction::Down => (tank.x + center, tank.y + TANK_SIZE),
        Direction::Left => (tank.x - BULLET_SIZE, tank.y + center),
        Direction::Right => (tank.x + TANK_SIZE, tank.y + center),
    }
}

/// Advance every bullet and drop those whose box leaves the field.
pub fn advance_bullets(bullets: &mut Vec<Bullet>, delta: f64) {
    for bullet in bullets.iter_mut() {
        let (dx, dy) = bullet.direction.delta();
        bullet.x += dx * bullet.speed * delta;
        bullet.y += dy * bullet.speed * delta;
    }
    bullets.retain(|b| {
        b.x >= 0.0 && b.y >= 0.0 && b.x + BULLET_SIZE <= FIELD_SIZE && b.y + BULLET_SIZE <= FIELD_SIZE
    });
}

/// Resolve bullet/wall contacts: every touched brick is destroyed, steels
/// only under a piercing bullet, and any contact (including surviving
/// steel or the eagle) consumes the bullet. Destroyed cells are recorded
/// for the `map_changes` delta.
pub fn resolve_wall_hits(bullets: &mut Vec<Bullet>, map: &mut MapState, changes: &mut MapChanges) {
    bullets.retain(|bullet| {
        let contact = map.bullet_wall_hits(&bullet.rect());
        if contact.is_empty() {
            return true;
        }
        for &index in &contact.bricks {
            map.destroy_brick(index);
            changes.bricks_destroyed.push(index);
        }
        if bullet.power >= STEEL_PIERCE_POWER {
            for &index in &contact.steels {
                map.destroy_steel(index);
                changes.steels_destroyed.push(index);
            }
        }
        if contact.eagle {
            map.eagle_broken = true;
        }
        false
    });
}

/// Resolve bullet/tank contacts with the damage policy:
/// player→player is suppressed (bullet dies, no damage), player→bot and
/// bot→player damage (helmet blocks the latter), bot→bot passes through.
/// Bullets whose owner no longer resolves are orphans and are dropped.
/// Player kills of bots award score to the owning slot by tank color.
pub fn resolve_tank_hits(
    bullets: &mut Vec<Bullet>,
    tanks: &mut [Tank],
    host: &mut PlayerState,
    guest: &mut PlayerState,
) {
    bullets.retain(|bullet| {
        let owner = match tanks.iter().find(|t| t.id == bullet.tank_id) {
            Some(t) => (t.side, t.color),
            None => return false,
        };
        let (owner_side, owner_color) = owner;

        for target in tanks.iter_mut() {
            if !target.alive || target.id == bullet.tank_id {
                continue;
            }
            if !overlap(&bullet.rect(), &target.rect(), 0.0) {
                continue;
            }
            match (owner_side, target.side) {
                (Side::Player, Side::Player) => return false,
                (Side::Player, Side::Bot) => {
                    target.hp = target.hp.saturating_sub(1);
                    if target.hp == 0 {
                        target.alive = false;
                        let points = target.level.score();
                        if owner_color == TankColor::Yellow {
                            host.score += points;
                        } else {
                            guest.score += points;
                        }
                    }
                    return false;
                }
                (Side::Bot, Side::Player) => {
                    if target.helmet_duration <= 0.0 {
                        target.hp = target.hp.saturating_sub(1);
                        if target.hp == 0 {
                            target.alive = false;
                        }
                    }
                    return false;
                }
                (Side::Bot, Side::Bot) => continue,
            }
        }
        true
    });
}
