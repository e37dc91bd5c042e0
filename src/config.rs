use std::time::Duration;

/// Runtime knobs for a [`Sensor`](crate::Sensor) and its worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorConfig {
    /// Wait after switching the supply rails before touching the bus.
    pub power_settle: Duration,
    /// Wait after releasing reset before the first register access.
    pub reset_settle: Duration,
    /// Depth of the worker's command channel.
    pub command_queue: usize,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            power_settle: Duration::from_millis(10),
            reset_settle: Duration::from_millis(1),
            command_queue: 16,
        }
    }
}

impl SensorConfig {
    /// Defaults overridden by `MT9V022_POWER_SETTLE_MS`, `MT9V022_RESET_SETTLE_MS`
    /// and `MT9V022_COMMAND_QUEUE`. Unparseable values keep the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            power_settle: read_env_millis("MT9V022_POWER_SETTLE_MS", defaults.power_settle),
            reset_settle: read_env_millis("MT9V022_RESET_SETTLE_MS", defaults.reset_settle),
            command_queue: read_env_usize("MT9V022_COMMAND_QUEUE", defaults.command_queue).max(1),
        }
    }

    /// No delays; for simulated collaborators.
    pub fn immediate() -> Self {
        Self {
            power_settle: Duration::ZERO,
            reset_settle: Duration::ZERO,
            ..Self::default()
        }
    }
}

fn read_env_millis(name: &str, default: Duration) -> Duration {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(default)
}

fn read_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable names; the process environment is shared.

    #[test]
    fn test_read_env_millis() {
        std::env::set_var("MT9V022_TEST_SETTLE_OK", " 25 ");
        std::env::set_var("MT9V022_TEST_SETTLE_BAD", "soon");
        let fallback = Duration::from_millis(10);
        assert_eq!(
            read_env_millis("MT9V022_TEST_SETTLE_OK", fallback),
            Duration::from_millis(25)
        );
        assert_eq!(read_env_millis("MT9V022_TEST_SETTLE_BAD", fallback), fallback);
        assert_eq!(read_env_millis("MT9V022_TEST_SETTLE_UNSET", fallback), fallback);
    }

    #[test]
    fn test_read_env_usize() {
        std::env::set_var("MT9V022_TEST_QUEUE", "64");
        assert_eq!(read_env_usize("MT9V022_TEST_QUEUE", 16), 64);
        assert_eq!(read_env_usize("MT9V022_TEST_QUEUE_UNSET", 16), 16);
    }

    #[test]
    fn test_defaults() {
        let config = SensorConfig::default();
        assert_eq!(config.power_settle, Duration::from_millis(10));
        assert_eq!(config.command_queue, 16);
        assert_eq!(SensorConfig::immediate().power_settle, Duration::ZERO);
    }
}
