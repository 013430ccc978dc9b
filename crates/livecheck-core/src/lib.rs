//! livecheck-core — active liveness challenge for face-based verification.
//!
//! The verifier walks a subject through a fixed pose sequence (face the
//! camera, turn left, turn right, smile) using per-frame yaw and smile
//! measurements produced by an external face detector.

pub mod event;
pub mod measurement;
pub mod palette;
pub mod thresholds;
pub mod verifier;

pub use event::{VerificationEvent, VerificationObserver};
pub use measurement::{Frame, Measurement, SubjectId};
pub use palette::{ColorCycle, OverlayColor};
pub use thresholds::{ThresholdError, Thresholds};
pub use verifier::{LivenessVerifier, Progress};
