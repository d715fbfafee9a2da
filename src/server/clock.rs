/// Wall-clock helpers shared by the server actors.
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch. Snapshot and event timestamps all
/// come from here, so they are monotone within one process.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_ms_is_nondecreasing() {
        let a = now_ms();
        let b = now_ms();
        assert!(b >= a);
    }
}
