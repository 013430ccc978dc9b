use serde::{Deserialize, Serialize};

/// Identifier the external detector assigns to a tracked face.
pub type SubjectId = i32;

/// Per-frame pose snapshot for a single tracked face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Head rotation about the vertical axis, in degrees. Negative is a turn
    /// to the subject's left.
    pub yaw_degrees: f32,
    /// Detector's smile probability, expected in [0, 1].
    pub smile_probability: f32,
}

impl Measurement {
    pub fn new(yaw_degrees: f32, smile_probability: f32) -> Self {
        Self {
            yaw_degrees,
            smile_probability,
        }
    }
}

/// A measurement tagged with the subject it belongs to.
///
/// This is the unit carried by replay files (one JSON object per line) and by
/// the daemon's `SubmitFrame` call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub subject_id: SubjectId,
    pub yaw_degrees: f32,
    #[serde(default)]
    pub smile_probability: f32,
}

impl Frame {
    pub fn measurement(&self) -> Measurement {
        Measurement::new(self.yaw_degrees, self.smile_probability)
    }
}
