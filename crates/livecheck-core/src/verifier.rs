//! Active liveness challenge driven by head pose and expression.
//!
//! A printed photo or a still frame on a phone screen can pass a single-frame
//! face match, but it cannot follow instructions. The verifier asks the
//! subject to face the camera, turn left, turn right and then smile, and
//! advances one milestone at a time as per-frame measurements satisfy each
//! step. Progress is tied to one tracked subject; when the detector reports a
//! newer subject id the challenge starts over.
//!
//! # Frame semantics
//!
//! - At most one milestone is reached per call to [`LivenessVerifier::update`].
//!   A frame that would satisfy two steps at once only advances the first.
//! - Once the smile is verified, every further update emits
//!   [`VerificationEvent::FaceVerified`].
//! - Non-finite measurements fail every threshold and never advance progress.
//!
//! # Threat Coverage
//!
//! - **Blocks:** Static photographs and replayed stills.
//! - **Does not block:** Video replay of a recorded challenge (the sequence is
//!   fixed), 3D masks worn by a cooperative attacker.

use crate::event::{VerificationEvent, VerificationObserver};
use crate::measurement::{Measurement, SubjectId};
use crate::thresholds::Thresholds;
use serde::Serialize;

/// Milestones reached so far, in challenge order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Progress {
    #[default]
    None,
    Front,
    Left,
    Right,
    Smile,
}

/// Sequential front → left → right → smile liveness verifier.
///
/// The observer is required at construction and receives every event.
pub struct LivenessVerifier<O> {
    thresholds: Thresholds,
    progress: Progress,
    baseline_subject: Option<SubjectId>,
    observer: O,
}

impl<O: VerificationObserver> LivenessVerifier<O> {
    pub fn new(observer: O) -> Self {
        Self::with_thresholds(Thresholds::default(), observer)
    }

    pub fn with_thresholds(thresholds: Thresholds, observer: O) -> Self {
        Self {
            thresholds,
            progress: Progress::None,
            baseline_subject: None,
            observer,
        }
    }

    /// Feed one frame's measurement for the given subject.
    ///
    /// Emits zero or one event. The first subject id seen becomes the baseline;
    /// a greater id resets all progress before the frame is evaluated.
    pub fn update(&mut self, measurement: Measurement, subject_id: SubjectId) {
        match self.baseline_subject {
            None => self.baseline_subject = Some(subject_id),
            Some(baseline) if subject_id > baseline => {
                tracing::debug!(
                    baseline,
                    subject_id,
                    progress = ?self.progress,
                    "new subject detected — resetting liveness progress"
                );
                self.progress = Progress::None;
                self.baseline_subject = Some(subject_id);
            }
            Some(_) => {}
        }

        let t = &self.thresholds;
        let Measurement {
            yaw_degrees: yaw,
            smile_probability: smile,
        } = measurement;

        let (next, event) = match self.progress {
            Progress::None if t.is_frontal(yaw) => {
                (Progress::Front, VerificationEvent::FrontFaceVerified)
            }
            Progress::Front if t.is_left_turn(yaw) => {
                (Progress::Left, VerificationEvent::LeftFaceVerified)
            }
            Progress::Left if t.is_right_turn(yaw) => {
                (Progress::Right, VerificationEvent::RightFaceVerified)
            }
            Progress::Right if t.is_smiling(smile) => {
                (Progress::Smile, VerificationEvent::SmileFaceVerified)
            }
            Progress::Smile => {
                self.observer.on_event(VerificationEvent::FaceVerified);
                return;
            }
            _ => return,
        };

        self.progress = next;
        tracing::debug!(subject_id, yaw, smile, event = %event, "liveness milestone reached");
        self.observer.on_event(event);
    }

    /// Clear all milestones and forget the baseline subject.
    pub fn reset(&mut self) {
        tracing::debug!(
            progress = ?self.progress,
            baseline = ?self.baseline_subject,
            "liveness progress reset"
        );
        self.progress = Progress::None;
        self.baseline_subject = None;
    }

    /// Replace the observer, returning the previous one.
    pub fn set_observer(&mut self, observer: O) -> O {
        std::mem::replace(&mut self.observer, observer)
    }
}

impl<O> LivenessVerifier<O> {
    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn is_verified(&self) -> bool {
        self.progress == Progress::Smile
    }

    pub fn baseline_subject(&self) -> Option<SubjectId> {
        self.baseline_subject
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Observer that keeps every event it receives.
    #[derive(Default)]
    struct Recorder {
        events: Vec<VerificationEvent>,
    }

    impl VerificationObserver for Recorder {
        fn on_event(&mut self, event: VerificationEvent) {
            self.events.push(event);
        }
    }

    fn verifier() -> LivenessVerifier<Recorder> {
        LivenessVerifier::new(Recorder::default())
    }

    fn yaw(degrees: f32) -> Measurement {
        Measurement::new(degrees, 0.0)
    }

    fn smile(probability: f32) -> Measurement {
        Measurement::new(0.0, probability)
    }

    /// Drive a fresh verifier up to (and including) the given milestone.
    fn verifier_at(progress: Progress) -> LivenessVerifier<Recorder> {
        let mut v = verifier();
        let steps = [yaw(0.0), yaw(-31.0), yaw(31.0), smile(0.7)];
        let count = match progress {
            Progress::None => 0,
            Progress::Front => 1,
            Progress::Left => 2,
            Progress::Right => 3,
            Progress::Smile => 4,
        };
        for m in &steps[..count] {
            v.update(*m, 1);
        }
        assert_eq!(v.progress(), progress);
        v.observer_mut().events.clear();
        v
    }

    #[test]
    fn test_full_sequence_in_order() {
        let mut v = verifier();
        v.update(yaw(0.0), 1);
        v.update(yaw(-31.0), 1);
        v.update(yaw(31.0), 1);
        v.update(smile(0.7), 1);
        assert_eq!(
            v.observer().events,
            vec![
                VerificationEvent::FrontFaceVerified,
                VerificationEvent::LeftFaceVerified,
                VerificationEvent::RightFaceVerified,
                VerificationEvent::SmileFaceVerified,
            ]
        );
        assert!(v.is_verified());
    }

    #[test]
    fn test_frontal_window_fires_once() {
        for degrees in [-12.0, -6.5, 0.0, 11.9, 12.0] {
            let mut v = verifier();
            v.update(yaw(degrees), 1);
            v.update(yaw(degrees), 1);
            v.update(yaw(degrees), 1);
            assert_eq!(
                v.observer().events,
                vec![VerificationEvent::FrontFaceVerified],
                "yaw {degrees}"
            );
        }
    }

    #[test]
    fn test_outside_frontal_window_no_event() {
        for degrees in [13.0, -13.0] {
            let mut v = verifier();
            v.update(yaw(degrees), 1);
            assert!(v.observer().events.is_empty(), "yaw {degrees}");
            assert_eq!(v.progress(), Progress::None);
        }
    }

    #[test]
    fn test_right_turn_before_prerequisites_ignored() {
        let mut v = verifier();
        v.update(yaw(31.0), 1);
        assert!(v.observer().events.is_empty());

        let mut v = verifier_at(Progress::Front);
        v.update(yaw(31.0), 1);
        assert!(v.observer().events.is_empty());
        assert_eq!(v.progress(), Progress::Front);
    }

    #[test]
    fn test_smile_requires_both_turns() {
        let mut v = verifier_at(Progress::Left);
        v.update(smile(0.9), 1);
        assert!(v.observer().events.is_empty());
        assert_eq!(v.progress(), Progress::Left);
    }

    #[test]
    fn test_turn_thresholds_strict() {
        let mut v = verifier_at(Progress::Front);
        v.update(yaw(-30.0), 1);
        assert!(v.observer().events.is_empty());
        v.update(yaw(-30.1), 1);
        assert_eq!(v.observer().events, vec![VerificationEvent::LeftFaceVerified]);

        let mut v = verifier_at(Progress::Left);
        v.update(yaw(30.0), 1);
        assert!(v.observer().events.is_empty());
        v.update(yaw(30.1), 1);
        assert_eq!(v.observer().events, vec![VerificationEvent::RightFaceVerified]);
    }

    #[test]
    fn test_smile_boundary() {
        let mut v = verifier_at(Progress::Right);
        v.update(smile(0.6), 1);
        assert!(v.observer().events.is_empty());
        v.update(smile(0.6001), 1);
        assert_eq!(v.observer().events, vec![VerificationEvent::SmileFaceVerified]);
    }

    #[test]
    fn test_face_verified_repeats() {
        let mut v = verifier_at(Progress::Smile);
        v.update(yaw(90.0), 1);
        v.update(smile(0.0), 1);
        v.update(Measurement::new(f32::NAN, f32::NAN), 1);
        assert_eq!(v.observer().events, vec![VerificationEvent::FaceVerified; 3]);
    }

    #[test]
    fn test_one_milestone_per_frame() {
        // Frontal yaw with a big smile only reaches Front on this frame.
        let mut v = verifier();
        v.update(Measurement::new(0.0, 1.0), 1);
        assert_eq!(v.progress(), Progress::Front);
        assert_eq!(v.observer().events.len(), 1);

        // Reaching Right on a smiling frame does not also verify the smile.
        let mut v = verifier_at(Progress::Left);
        v.update(Measurement::new(45.0, 1.0), 1);
        assert_eq!(v.progress(), Progress::Right);
        assert_eq!(v.observer().events, vec![VerificationEvent::RightFaceVerified]);
    }

    #[test]
    fn test_new_subject_resets_progress() {
        let mut v = verifier_at(Progress::Left);
        assert_eq!(v.baseline_subject(), Some(1));

        v.update(yaw(60.0), 2);
        assert_eq!(v.progress(), Progress::None);
        assert_eq!(v.baseline_subject(), Some(2));
        assert!(v.observer().events.is_empty());

        v.update(yaw(0.0), 2);
        assert_eq!(v.observer().events, vec![VerificationEvent::FrontFaceVerified]);
    }

    #[test]
    fn test_reset_frame_is_still_evaluated() {
        let mut v = verifier_at(Progress::Right);
        v.update(yaw(0.0), 5);
        assert_eq!(v.progress(), Progress::Front);
        assert_eq!(v.observer().events, vec![VerificationEvent::FrontFaceVerified]);
    }

    #[test]
    fn test_lower_subject_id_ignored() {
        let mut v = verifier_at(Progress::Left);
        v.update(yaw(31.0), 0);
        assert_eq!(v.progress(), Progress::Right);
        assert_eq!(v.baseline_subject(), Some(1));
    }

    #[test]
    fn test_explicit_reset() {
        let mut v = verifier_at(Progress::Smile);
        v.reset();
        assert_eq!(v.progress(), Progress::None);
        assert_eq!(v.baseline_subject(), None);

        // Any id is accepted as the new baseline, even a lower one.
        v.update(yaw(0.0), 0);
        assert_eq!(v.baseline_subject(), Some(0));
        assert_eq!(v.observer().events, vec![VerificationEvent::FrontFaceVerified]);
    }

    #[test]
    fn test_nan_measurement_never_advances() {
        let mut v = verifier();
        v.update(Measurement::new(f32::NAN, f32::NAN), 1);
        assert_eq!(v.progress(), Progress::None);
        assert!(v.observer().events.is_empty());
    }

    #[test]
    fn test_set_observer_last_wins() {
        let mut v = verifier();
        v.update(yaw(0.0), 1);

        let previous = v.set_observer(Recorder::default());
        assert_eq!(previous.events, vec![VerificationEvent::FrontFaceVerified]);

        v.update(yaw(-45.0), 1);
        assert_eq!(v.observer().events, vec![VerificationEvent::LeftFaceVerified]);
    }

    #[test]
    fn test_closure_observer_and_custom_thresholds() {
        let mut seen = Vec::new();
        let thresholds = Thresholds {
            front_max_yaw: 5.0,
            turn_min_yaw: 15.0,
            smile_min_probability: 0.5,
        };
        let mut v =
            LivenessVerifier::with_thresholds(thresholds, |e: VerificationEvent| seen.push(e));
        v.update(yaw(8.0), 1);
        v.update(yaw(4.0), 1);
        v.update(yaw(-16.0), 1);
        assert_eq!(v.progress(), Progress::Left);
        drop(v);
        assert_eq!(
            seen,
            vec![
                VerificationEvent::FrontFaceVerified,
                VerificationEvent::LeftFaceVerified,
            ]
        );
    }

    #[test]
    fn test_progress_ordering() {
        assert!(Progress::None < Progress::Front);
        assert!(Progress::Front < Progress::Left);
        assert!(Progress::Right < Progress::Smile);
    }
}
