use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod client;
mod replay;

#[derive(Parser)]
#[command(name = "livecheck", version, about = "Active liveness challenge tooling")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a recorded JSON-lines measurement stream through a local verifier
    Replay {
        /// Measurement file, one frame per line
        file: PathBuf,
        /// TOML file overriding the default thresholds
        #[arg(long)]
        thresholds: Option<PathBuf>,
    },
    /// Submit a single frame to livecheckd
    Submit {
        #[arg(long)]
        face_id: i32,
        #[arg(long, allow_hyphen_values = true)]
        yaw: f64,
        #[arg(long, default_value_t = 0.0)]
        smile: f64,
        /// Use the session bus instead of the system bus
        #[arg(long)]
        session: bool,
    },
    /// Reset the daemon's liveness progress
    Reset {
        #[arg(long)]
        session: bool,
    },
    /// Show daemon status
    Status {
        #[arg(long)]
        session: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Replay { file, thresholds } => replay::run(&file, thresholds.as_deref())?,
        Command::Submit {
            face_id,
            yaw,
            smile,
            session,
        } => {
            let proxy = client::connect(session).await?;
            let event = proxy
                .submit_frame(face_id, yaw, smile)
                .await
                .context("SubmitFrame failed")?;
            if event.is_empty() {
                println!("no event");
            } else {
                println!("{event}");
            }
        }
        Command::Reset { session } => {
            let proxy = client::connect(session).await?;
            proxy.reset().await.context("Reset failed")?;
            println!("reset");
        }
        Command::Status { session } => {
            let proxy = client::connect(session).await?;
            let status = proxy.status().await.context("Status failed")?;
            let value: serde_json::Value =
                serde_json::from_str(&status).context("daemon returned malformed status")?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    Ok(())
}
