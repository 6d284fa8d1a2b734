//! Difficulty ramp
//!
//! The longer a run lasts, the shorter the spawn cooldown. Steps are ordered
//! from the latest threshold to the earliest and the first one exceeded wins.

use crate::consts::INITIAL_SPAWN_COOLDOWN_MS;

/// Cooldown that applies once elapsed time is strictly past `after_ms`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampStep {
    pub after_ms: f64,
    pub cooldown_ms: f64,
}

const SECOND: f64 = 1000.0;
const MINUTE: f64 = 60.0 * SECOND;

pub const DIFFICULTY_RAMP: [RampStep; 5] = [
    RampStep { after_ms: 3.0 * MINUTE, cooldown_ms: 50.0 },
    RampStep { after_ms: 2.0 * MINUTE, cooldown_ms: 300.0 },
    RampStep { after_ms: 1.0 * MINUTE, cooldown_ms: 500.0 },
    RampStep { after_ms: 30.0 * SECOND, cooldown_ms: 1000.0 },
    RampStep { after_ms: 10.0 * SECOND, cooldown_ms: 2000.0 },
];

/// Spawn cooldown for a run that has lasted `elapsed_ms`
pub fn spawn_cooldown_ms(elapsed_ms: f64) -> f64 {
    DIFFICULTY_RAMP
        .iter()
        .find(|step| elapsed_ms > step.after_ms)
        .map_or(INITIAL_SPAWN_COOLDOWN_MS, |step| step.cooldown_ms)
}

/// Difficulty level 0 (start) through 5 (hardest), for display and logs
pub fn difficulty_level(elapsed_ms: f64) -> usize {
    DIFFICULTY_RAMP
        .iter()
        .position(|step| elapsed_ms > step.after_ms)
        .map_or(0, |i| DIFFICULTY_RAMP.len() - i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_cooldown() {
        assert_eq!(spawn_cooldown_ms(0.0), 3000.0);
        assert_eq!(spawn_cooldown_ms(9_999.0), 3000.0);
        assert_eq!(difficulty_level(0.0), 0);
    }

    #[test]
    fn test_thresholds_are_strict() {
        assert_eq!(spawn_cooldown_ms(10_000.0), 3000.0);
        assert_eq!(spawn_cooldown_ms(10_020.0), 2000.0);
        assert_eq!(spawn_cooldown_ms(30_000.0), 2000.0);
        assert_eq!(spawn_cooldown_ms(30_020.0), 1000.0);
    }

    #[test]
    fn test_every_step_is_reachable() {
        assert_eq!(spawn_cooldown_ms(45.0 * SECOND), 1000.0);
        assert_eq!(spawn_cooldown_ms(90.0 * SECOND), 500.0);
        assert_eq!(spawn_cooldown_ms(150.0 * SECOND), 300.0);
        assert_eq!(spawn_cooldown_ms(200.0 * SECOND), 50.0);
        assert_eq!(spawn_cooldown_ms(60.0 * MINUTE), 50.0);
    }

    #[test]
    fn test_levels() {
        assert_eq!(difficulty_level(11.0 * SECOND), 1);
        assert_eq!(difficulty_level(31.0 * SECOND), 2);
        assert_eq!(difficulty_level(61.0 * SECOND), 3);
        assert_eq!(difficulty_level(121.0 * SECOND), 4);
        assert_eq!(difficulty_level(181.0 * SECOND), 5);
    }

    #[test]
    fn test_ramp_is_monotonic() {
        for pair in DIFFICULTY_RAMP.windows(2) {
            assert!(pair[0].after_ms > pair[1].after_ms);
            assert!(pair[0].cooldown_ms < pair[1].cooldown_ms);
        }

        let mut last = f64::INFINITY;
        let mut t = 0.0;
        while t < 5.0 * MINUTE {
            let cooldown = spawn_cooldown_ms(t);
            assert!(cooldown <= last, "cooldown grew at {t} ms");
            last = cooldown;
            t += 20.0;
        }
    }
}
