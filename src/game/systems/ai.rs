//! Bot behavior, folded into the tick body.
//!
//! Each bot is updated in place once per tick: steer (keep heading until
//! its timer expires or it runs into something), move under the same wall
//! rules as players, and occasionally fire. All randomness comes from the
//! room's seeded generator, so identical rooms replay identically.

use crate::config::game::{BOT_FIRE_MEAN_INTERVAL_MS, BOT_HEADING_JITTER_MS, BOT_HEADING_MIN_MS};
use crate::game::lcg::Lcg;
use crate::game::map::MapState;
use crate::game::systems::{bullets, movement};
use crate::game::types::{Bullet, Direction, Tank};

/// Advance one bot for this tick. Returns a bullet when the bot fires.
pub fn update_bot(
    tank: &mut Tank,
    map: &MapState,
    rng: &mut Lcg,
    delta: f64,
    next_bullet_id: &mut u32,
) -> Option<Bullet> {
    if !tank.alive {
        return None;
    }

    tank.heading_timer_ms -= delta;
    if tank.heading_timer_ms <= 0.0 {
        pick_heading(tank, rng);
    }

    tank.moving = true;
    if tank.frozen_timeout <= 0.0 {
        let before = (tank.x, tank.y);
        movement::move_tank(tank, map, delta);
        if (tank.x, tank.y) == before {
            // Wall or field edge: choose a new heading immediately.
            pick_heading(tank, rng);
        }
    }

    if tank.cooldown <= 0.0 && rng.next() < delta / BOT_FIRE_MEAN_INTERVAL_MS {
        return bullets::try_fire(tank, next_bullet_id);
    }
    None
}

fn pick_heading(tank: &mut Tank, rng: &mut Lcg) {
    tank.direction = Direction::ALL[rng.pick(Direction::ALL.len())];
    tank.heading_timer_ms = BOT_HEADING_MIN_MS + rng.next() * BOT_HEADING_JITTER_MS;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::map::parse_stage;
    use crate::game::types::TankLevel;

    #[test]
    fn test_bot_moves_every_tick() {
        let map = parse_stage("").unwrap();
        let mut rng = Lcg::new(1);
        let mut tank = Tank::new_bot(1, 96.0, 96.0, TankLevel::Basic, false);
        let mut next_bullet = 0;
        let before = (tank.x, tank.y);
        for _ in 0..20 {
            update_bot(&mut tank, &map, &mut rng, 16.0, &mut next_bullet);
        }
        assert_ne!((tank.x, tank.y), before);
        assert!(tank.moving);
    }

    #[test]
    fn test_bot_behavior_is_deterministic() {
        let map = parse_stage("").unwrap();
        let mut run = |seed: u32| {
            let mut rng = Lcg::new(seed);
            let mut tank = Tank::new_bot(1, 96.0, 96.0, TankLevel::Fast, false);
            let mut next_bullet = 0;
            let mut fired = 0;
            for _ in 0..500 {
                if update_bot(&mut tank, &map, &mut rng, 16.0, &mut next_bullet).is_some() {
                    fired += 1;
                }
            }
            (tank.x, tank.y, tank.direction, fired)
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn test_frozen_bot_stays_put() {
        let map = parse_stage("").unwrap();
        let mut rng = Lcg::new(1);
        let mut tank = Tank::new_bot(1, 96.0, 96.0, TankLevel::Basic, false);
        tank.frozen_timeout = 10_000.0;
        let mut next_bullet = 0;
        for _ in 0..20 {
            update_bot(&mut tank, &map, &mut rng, 16.0, &mut next_bullet);
        }
        assert_eq!((tank.x, tank.y), (96.0, 96.0));
    }
}
