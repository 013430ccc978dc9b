use serde::{Deserialize, Serialize};
use std::fmt;

/// Notification emitted by the verifier when a milestone is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationEvent {
    FrontFaceVerified,
    LeftFaceVerified,
    RightFaceVerified,
    SmileFaceVerified,
    /// Fired on every update once the full sequence is complete.
    FaceVerified,
}

impl VerificationEvent {
    /// Stable wire name, shared by JSON output and D-Bus signals.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FrontFaceVerified => "front_face_verified",
            Self::LeftFaceVerified => "left_face_verified",
            Self::RightFaceVerified => "right_face_verified",
            Self::SmileFaceVerified => "smile_face_verified",
            Self::FaceVerified => "face_verified",
        }
    }
}

impl fmt::Display for VerificationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receiver for verification events.
///
/// Any `FnMut(VerificationEvent)` closure is an observer, so most callers
/// never implement this directly.
pub trait VerificationObserver {
    fn on_event(&mut self, event: VerificationEvent);
}

impl<F> VerificationObserver for F
where
    F: FnMut(VerificationEvent),
{
    fn on_event(&mut self, event: VerificationEvent) {
        self(event)
    }
}
