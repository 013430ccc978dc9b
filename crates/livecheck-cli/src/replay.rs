//! `livecheck replay` — runs a recorded measurement stream through a local verifier.
//!
//! Input is JSON lines, one [`Frame`] per line:
//!
//! ```text
//! {"subject_id": 1, "yaw_degrees": 0.4, "smile_probability": 0.1}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use anyhow::{Context, Result};
use livecheck_core::{
    Frame, LivenessVerifier, Progress, Thresholds, VerificationEvent, VerificationObserver,
};
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Events emitted while replaying, tagged with the 1-based input line.
#[derive(Debug)]
pub struct ReplayOutcome {
    pub frames: usize,
    pub events: Vec<(usize, VerificationEvent)>,
    pub progress: Progress,
}

struct Collected(Vec<VerificationEvent>);

impl VerificationObserver for Collected {
    fn on_event(&mut self, event: VerificationEvent) {
        self.0.push(event);
    }
}

/// Load thresholds from a TOML file, or use the defaults.
pub fn load_thresholds(path: Option<&Path>) -> Result<Thresholds> {
    let Some(path) = path else {
        return Ok(Thresholds::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let thresholds: Thresholds =
        toml::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))?;
    thresholds
        .validate()
        .with_context(|| format!("invalid thresholds in {}", path.display()))?;
    Ok(thresholds)
}

/// Feed every frame from `reader` through a fresh verifier.
pub fn replay<R: BufRead>(reader: R, thresholds: Thresholds) -> Result<ReplayOutcome> {
    let mut verifier = LivenessVerifier::with_thresholds(thresholds, Collected(Vec::new()));
    let mut events = Vec::new();
    let mut frames = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("failed to read line {line_no}"))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let frame: Frame = serde_json::from_str(trimmed)
            .with_context(|| format!("line {line_no}: malformed frame"))?;
        verifier.update(frame.measurement(), frame.subject_id);
        frames += 1;

        events.extend(verifier.observer_mut().0.drain(..).map(|e| (line_no, e)));
    }

    tracing::debug!(frames, events = events.len(), "replay finished");

    Ok(ReplayOutcome {
        frames,
        events,
        progress: verifier.progress(),
    })
}

pub fn run(file: &Path, thresholds_path: Option<&Path>) -> Result<()> {
    let thresholds = load_thresholds(thresholds_path)?;
    let input =
        fs::File::open(file).with_context(|| format!("failed to open {}", file.display()))?;
    let outcome = replay(BufReader::new(input), thresholds)?;

    for (line_no, event) in &outcome.events {
        println!("{line_no}\t{event}");
    }
    println!(
        "frames: {}  events: {}  progress: {:?}",
        outcome.frames,
        outcome.events.len(),
        outcome.progress
    );

    Ok(())
}
