use chrono::{DateTime, Utc};
use livecheck_core::{
    ColorCycle, Frame, LivenessVerifier, OverlayColor, Progress, SubjectId, Thresholds,
    VerificationEvent, VerificationObserver,
};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to spawn verifier thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("verifier thread exited")]
    ChannelClosed,
}

/// An emitted event together with the frame context that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    pub event: VerificationEvent,
    pub subject_id: SubjectId,
    pub at: DateTime<Utc>,
}

/// Point-in-time view of the verifier, reported by `Status`.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub progress: Progress,
    pub baseline_subject: Option<SubjectId>,
    pub thresholds: Thresholds,
    pub overlay_color: OverlayColor,
    pub frames_seen: u64,
    pub last_event: Option<EventRecord>,
}

/// Observer that holds the event emitted by the current frame until the
/// verifier thread collects it.
#[derive(Default)]
struct PendingEvent(Option<VerificationEvent>);

impl VerificationObserver for PendingEvent {
    fn on_event(&mut self, event: VerificationEvent) {
        self.0 = Some(event);
    }
}

/// Messages sent from D-Bus handlers to the verifier thread.
enum VerifierRequest {
    Frame {
        frame: Frame,
        reply: oneshot::Sender<Option<EventRecord>>,
    },
    Reset {
        reply: oneshot::Sender<()>,
    },
    Snapshot {
        reply: oneshot::Sender<Snapshot>,
    },
}

/// Clone-safe handle to the verifier thread.
#[derive(Clone)]
pub struct VerifierHandle {
    tx: mpsc::Sender<VerifierRequest>,
}

impl VerifierHandle {
    /// Submit one frame. Returns the event it produced, if any.
    pub async fn submit(&self, frame: Frame) -> Result<Option<EventRecord>, EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(VerifierRequest::Frame {
                frame,
                reply: reply_tx,
            })
            .await
            .map_err(|_| EngineError::ChannelClosed)?;
        reply_rx.await.map_err(|_| EngineError::ChannelClosed)
    }

    /// Clear all progress and start a new session.
    pub async fn reset(&self) -> Result<(), EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(VerifierRequest::Reset { reply: reply_tx })
            .await
            .map_err(|_| EngineError::ChannelClosed)?;
        reply_rx.await.map_err(|_| EngineError::ChannelClosed)
    }

    pub async fn snapshot(&self) -> Result<Snapshot, EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(VerifierRequest::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| EngineError::ChannelClosed)?;
        reply_rx.await.map_err(|_| EngineError::ChannelClosed)
    }
}

/// State owned by the verifier thread. Nothing else touches it.
struct Session {
    verifier: LivenessVerifier<PendingEvent>,
    colors: ColorCycle,
    overlay_color: OverlayColor,
    frames_seen: u64,
    last_event: Option<EventRecord>,
}

impl Session {
    fn new(thresholds: Thresholds) -> Self {
        let mut colors = ColorCycle::new();
        let overlay_color = colors.next_color();
        Self {
            verifier: LivenessVerifier::with_thresholds(thresholds, PendingEvent::default()),
            colors,
            overlay_color,
            frames_seen: 0,
            last_event: None,
        }
    }

    fn on_frame(&mut self, frame: Frame) -> Option<EventRecord> {
        let previous_subject = self.verifier.baseline_subject();
        self.verifier.update(frame.measurement(), frame.subject_id);
        self.frames_seen += 1;

        if let (Some(prev), Some(now)) = (previous_subject, self.verifier.baseline_subject()) {
            if prev != now {
                self.start_session();
                tracing::info!(
                    previous = prev,
                    subject_id = now,
                    color = ?self.overlay_color,
                    "new subject — liveness session restarted"
                );
            }
        }

        let event = self.verifier.observer_mut().0.take()?;
        let record = EventRecord {
            event,
            subject_id: frame.subject_id,
            at: Utc::now(),
        };
        self.last_event = Some(record.clone());
        Some(record)
    }

    fn on_reset(&mut self) {
        self.verifier.reset();
        self.start_session();
        self.frames_seen = 0;
        tracing::info!(color = ?self.overlay_color, "liveness session reset");
    }

    fn start_session(&mut self) {
        self.overlay_color = self.colors.next_color();
        self.last_event = None;
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            progress: self.verifier.progress(),
            baseline_subject: self.verifier.baseline_subject(),
            thresholds: *self.verifier.thresholds(),
            overlay_color: self.overlay_color,
            frames_seen: self.frames_seen,
            last_event: self.last_event.clone(),
        }
    }
}

/// Spawn the verifier on a dedicated OS thread.
///
/// The verifier state is confined to that thread; callers interact only
/// through the returned handle. The thread exits once every handle is dropped.
pub fn spawn_verifier(
    thresholds: Thresholds,
    queue_depth: usize,
) -> Result<VerifierHandle, EngineError> {
    let (tx, mut rx) = mpsc::channel::<VerifierRequest>(queue_depth);
    let mut session = Session::new(thresholds);

    std::thread::Builder::new()
        .name("livecheck-verifier".into())
        .spawn(move || {
            tracing::info!("verifier thread started");
            while let Some(req) = rx.blocking_recv() {
                match req {
                    VerifierRequest::Frame { frame, reply } => {
                        let _ = reply.send(session.on_frame(frame));
                    }
                    VerifierRequest::Reset { reply } => {
                        session.on_reset();
                        let _ = reply.send(());
                    }
                    VerifierRequest::Snapshot { reply } => {
                        let _ = reply.send(session.snapshot());
                    }
                }
            }
            tracing::info!("verifier thread exiting");
        })
        .map_err(EngineError::Spawn)?;

    Ok(VerifierHandle { tx })
}
