use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default half-width of the frontal yaw window, in degrees.
pub const DEFAULT_FRONT_MAX_YAW: f32 = 12.0;
/// Default yaw magnitude a head turn must exceed, in degrees.
pub const DEFAULT_TURN_MIN_YAW: f32 = 30.0;
/// Default smile probability a smile must exceed.
pub const DEFAULT_SMILE_MIN_PROBABILITY: f32 = 0.6;

#[derive(Error, Debug, PartialEq)]
pub enum ThresholdError {
    #[error("{name} must be a finite number (got {value})")]
    NotFinite { name: &'static str, value: f32 },

    #[error("front_max_yaw must not be negative (got {0})")]
    NegativeFrontWindow(f32),

    #[error("turn_min_yaw ({turn}) must be greater than front_max_yaw ({front})")]
    OverlappingWindows { front: f32, turn: f32 },

    #[error("smile_min_probability must be within [0, 1] (got {0})")]
    SmileOutOfRange(f32),
}

/// Pose and expression thresholds for each milestone.
///
/// The frontal window is inclusive on both ends. Turns and the smile are
/// strict comparisons: a yaw of exactly `-turn_min_yaw` is not a left turn and
/// a smile probability of exactly `smile_min_probability` is not a smile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub front_max_yaw: f32,
    pub turn_min_yaw: f32,
    pub smile_min_probability: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            front_max_yaw: DEFAULT_FRONT_MAX_YAW,
            turn_min_yaw: DEFAULT_TURN_MIN_YAW,
            smile_min_probability: DEFAULT_SMILE_MIN_PROBABILITY,
        }
    }
}

impl Thresholds {
    /// Check that the thresholds describe a usable challenge.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        for (name, value) in [
            ("front_max_yaw", self.front_max_yaw),
            ("turn_min_yaw", self.turn_min_yaw),
            ("smile_min_probability", self.smile_min_probability),
        ] {
            if !value.is_finite() {
                return Err(ThresholdError::NotFinite { name, value });
            }
        }

        if self.front_max_yaw < 0.0 {
            return Err(ThresholdError::NegativeFrontWindow(self.front_max_yaw));
        }

        if self.turn_min_yaw <= self.front_max_yaw {
            return Err(ThresholdError::OverlappingWindows {
                front: self.front_max_yaw,
                turn: self.turn_min_yaw,
            });
        }

        if !(0.0..=1.0).contains(&self.smile_min_probability) {
            return Err(ThresholdError::SmileOutOfRange(self.smile_min_probability));
        }

        Ok(())
    }

    pub fn is_frontal(&self, yaw: f32) -> bool {
        (-self.front_max_yaw..=self.front_max_yaw).contains(&yaw)
    }

    pub fn is_left_turn(&self, yaw: f32) -> bool {
        yaw < -self.turn_min_yaw
    }

    pub fn is_right_turn(&self, yaw: f32) -> bool {
        yaw > self.turn_min_yaw
    }

    pub fn is_smiling(&self, smile_probability: f32) -> bool {
        smile_probability > self.smile_min_probability
    }
}
