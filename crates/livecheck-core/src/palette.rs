use serde::Serialize;

/// Display colour assigned to a tracked-face session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayColor {
    Blue,
    Cyan,
    Green,
    Magenta,
    Red,
    White,
    Yellow,
}

const CHOICES: [OverlayColor; 7] = [
    OverlayColor::Blue,
    OverlayColor::Cyan,
    OverlayColor::Green,
    OverlayColor::Magenta,
    OverlayColor::Red,
    OverlayColor::White,
    OverlayColor::Yellow,
];

/// Rotating colour assignment, advanced once per new session so that
/// neighbouring faces are visually distinct.
///
/// The cursor advances before picking, so the first session gets `Cyan`.
#[derive(Debug, Default)]
pub struct ColorCycle {
    index: usize,
}

impl ColorCycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the cycle and return the colour for a newly constructed session.
    pub fn next_color(&mut self) -> OverlayColor {
        self.index = (self.index + 1) % CHOICES.len();
        CHOICES[self.index]
    }
}
