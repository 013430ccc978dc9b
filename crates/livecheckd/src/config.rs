use livecheck_core::{ThresholdError, Thresholds};

/// Daemon configuration, loaded from environment variables.
pub struct Config {
    /// Pose and smile thresholds for the liveness challenge.
    pub thresholds: Thresholds,
    /// Capacity of the request queue between D-Bus handlers and the verifier thread.
    pub queue_depth: usize,
    /// Whether the daemon is running on the session bus (development mode).
    pub session_bus: bool,
}

impl Config {
    /// Load configuration from `LIVECHECK_*` environment variables with defaults.
    ///
    /// Unparseable values fall back to their defaults. Thresholds that parse but
    /// do not form a usable challenge are rejected.
    pub fn from_env() -> Result<Self, ThresholdError> {
        let defaults = Thresholds::default();
        let thresholds = Thresholds {
            front_max_yaw: env_f32("LIVECHECK_FRONT_MAX_YAW", defaults.front_max_yaw),
            turn_min_yaw: env_f32("LIVECHECK_TURN_MIN_YAW", defaults.turn_min_yaw),
            smile_min_probability: env_f32(
                "LIVECHECK_SMILE_THRESHOLD",
                defaults.smile_min_probability,
            ),
        };
        thresholds.validate()?;

        Ok(Self {
            thresholds,
            queue_depth: env_usize("LIVECHECK_QUEUE_DEPTH", 32).max(1),
            session_bus: std::env::var("LIVECHECK_SESSION_BUS").is_ok(),
        })
    }
}

fn env_f32(key: &str, default: f32) -> f32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
