use livecheck_core::Frame;
use zbus::interface;
use zbus::object_server::SignalEmitter;

use crate::engine::VerifierHandle;

/// Well-known bus name claimed by the daemon.
pub const BUS_NAME: &str = "org.freedesktop.LiveCheck1";
/// Object path the service is served at.
pub const OBJECT_PATH: &str = "/org/freedesktop/LiveCheck1";

/// D-Bus interface for the LiveCheck liveness daemon.
///
/// Bus name: org.freedesktop.LiveCheck1
/// Object path: /org/freedesktop/LiveCheck1
pub struct LiveCheckService {
    pub verifier: VerifierHandle,
}

#[interface(name = "org.freedesktop.LiveCheck1")]
impl LiveCheckService {
    /// Submit one frame's pose measurement from the face detector.
    ///
    /// Returns the name of the event the frame produced, or an empty string.
    /// A `VerificationEvent` signal is emitted alongside every non-empty reply.
    async fn submit_frame(
        &self,
        face_id: i32,
        yaw: f64,
        smile: f64,
        #[zbus(signal_emitter)] emitter: SignalEmitter<'_>,
    ) -> zbus::fdo::Result<String> {
        let frame = Frame {
            subject_id: face_id,
            yaw_degrees: yaw as f32,
            smile_probability: smile as f32,
        };

        let record = self.verifier.submit(frame).await.map_err(|e| {
            tracing::error!(error = %e, "submit_frame failed");
            zbus::fdo::Error::Failed(e.to_string())
        })?;

        let Some(record) = record else {
            return Ok(String::new());
        };

        tracing::info!(face_id, event = %record.event, "liveness event");

        if let Err(e) = Self::verification_event(&emitter, record.event.as_str(), face_id).await {
            tracing::warn!(error = %e, "failed to emit VerificationEvent signal");
        }

        Ok(record.event.as_str().to_string())
    }

    /// Clear all liveness progress and start a new session.
    async fn reset(&self) -> zbus::fdo::Result<()> {
        tracing::info!("reset requested");
        self.verifier.reset().await.map_err(|e| {
            tracing::error!(error = %e, "reset failed");
            zbus::fdo::Error::Failed(e.to_string())
        })
    }

    /// Return daemon status information as JSON.
    async fn status(&self) -> zbus::fdo::Result<String> {
        let snapshot = self
            .verifier
            .snapshot()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "status failed");
                zbus::fdo::Error::Failed(e.to_string())
            })?;

        Ok(serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "progress": snapshot.progress,
            "baseline_subject": snapshot.baseline_subject,
            "thresholds": snapshot.thresholds,
            "overlay_color": snapshot.overlay_color,
            "frames_seen": snapshot.frames_seen,
            "last_event": snapshot.last_event,
        })
        .to_string())
    }

    /// Emitted whenever a submitted frame produces a verification event.
    #[zbus(signal)]
    async fn verification_event(
        emitter: &SignalEmitter<'_>,
        event: &str,
        face_id: i32,
    ) -> zbus::Result<()>;
}
