//! Spawning: the per-room bot queue and player tank (re)spawns.

use crate::config::game::{
    BOT_QUEUE_SIZE, BOT_SPAWN_POSITIONS, GUEST_SPAWN, HOST_SPAWN, POWER_UP_INDICES,
};
use crate::game::lcg::Lcg;
use crate::game::types::{Tank, TankColor, TankLevel};

/// One queued bot: its level and whether it carries a power-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotSpec {
    pub level: TankLevel,
    pub with_power_up: bool,
}

/// Build the room's bot queue: 18 basic, 1 fast, 1 power, shuffled by the
/// room's seeded generator, with power-ups on the 4th, 11th and 18th
/// spawns. Same seed ⇒ same ordering.
pub fn generate_bot_queue(rng: &mut Lcg) -> Vec<BotSpec> {
    let mut levels = vec![TankLevel::Basic; BOT_QUEUE_SIZE - 2];
    levels.push(TankLevel::Fast);
    levels.push(TankLevel::Power);
    rng.shuffle(&mut levels);
    levels
        .into_iter()
        .enumerate()
        .map(|(index, level)| BotSpec {
            level,
            with_power_up: POWER_UP_INDICES.contains(&index),
        })
        .collect()
}

/// Spawn position for the n-th bot (cycling left, center, right).
pub fn bot_spawn_position(index: usize) -> (f64, f64) {
    BOT_SPAWN_POSITIONS[index % BOT_SPAWN_POSITIONS.len()]
}

pub fn spawn_bot(next_tank_id: &mut u32, index: usize, spec: BotSpec) -> Tank {
    let (x, y) = bot_spawn_position(index);
    let id = *next_tank_id;
    *next_tank_id += 1;
    Tank::new_bot(id, x, y, spec.level, spec.with_power_up)
}

/// Spawn a player tank at its slot's fixed position (yellow = host).
pub fn spawn_player_tank(next_tank_id: &mut u32, color: TankColor) -> Tank {
    let (x, y) = match color {
        TankColor::Yellow => HOST_SPAWN,
        _ => GUEST_SPAWN,
    };
    let id = *next_tank_id;
    *next_tank_id += 1;
    Tank::new_player(id, x, y, color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_composition() {
        let mut rng = Lcg::from_room_code("ABC123");
        let queue = generate_bot_queue(&mut rng);
        assert_eq!(queue.len(), BOT_QUEUE_SIZE);
        let basics = queue.iter().filter(|s| s.level == TankLevel::Basic).count();
        let fasts = queue.iter().filter(|s| s.level == TankLevel::Fast).count();
        let powers = queue.iter().filter(|s| s.level == TankLevel::Power).count();
        assert_eq!((basics, fasts, powers), (18, 1, 1));
    }

    #[test]
    fn test_queue_deterministic_per_room_code() {
        let mut a = Lcg::from_room_code("XYZ789");
        let mut b = Lcg::from_room_code("XYZ789");
        assert_eq!(generate_bot_queue(&mut a), generate_bot_queue(&mut b));
    }

    #[test]
    fn test_power_up_indices() {
        let mut rng = Lcg::from_room_code("ABC123");
        let queue = generate_bot_queue(&mut rng);
        for (index, spec) in queue.iter().enumerate() {
            assert_eq!(spec.with_power_up, [3, 10, 17].contains(&index));
        }
    }

    #[test]
    fn test_spawn_positions_cycle() {
        assert_eq!(bot_spawn_position(0), (0.0, 0.0));
        assert_eq!(bot_spawn_position(1), (96.0, 0.0));
        assert_eq!(bot_spawn_position(2), (192.0, 0.0));
        assert_eq!(bot_spawn_position(3), (0.0, 0.0));
    }

    #[test]
    fn test_player_tanks_spawn_at_slot_positions() {
        let mut next_id = 1;
        let host = spawn_player_tank(&mut next_id, TankColor::Yellow);
        let guest = spawn_player_tank(&mut next_id, TankColor::Green);
        assert_eq!((host.x, host.y), (64.0, 192.0));
        assert_eq!((guest.x, guest.y), (128.0, 192.0));
        assert_ne!(host.id, guest.id);
    }
}
