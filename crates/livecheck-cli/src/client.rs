//! D-Bus client for `livecheckd`.

use anyhow::{Context, Result};
use zbus::{proxy, Connection};

#[proxy(
    interface = "org.freedesktop.LiveCheck1",
    default_service = "org.freedesktop.LiveCheck1",
    default_path = "/org/freedesktop/LiveCheck1"
)]
pub trait LiveCheck {
    fn submit_frame(&self, face_id: i32, yaw: f64, smile: f64) -> zbus::Result<String>;

    fn reset(&self) -> zbus::Result<()>;

    fn status(&self) -> zbus::Result<String>;
}

/// Connect to the daemon on the system bus, or the session bus in development.
pub async fn connect(session: bool) -> Result<LiveCheckProxy<'static>> {
    let conn = if session {
        Connection::session().await
    } else {
        Connection::system().await
    }
    .context("failed to connect to D-Bus")?;

    LiveCheckProxy::new(&conn)
        .await
        .context("failed to create livecheckd proxy")
}

