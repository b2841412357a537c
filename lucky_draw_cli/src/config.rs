use std::ops::RangeInclusive;
use std::time::Duration;

use crate::record::DrawSize;

pub const MIN_NUMBER: u32 = 1;
pub const MAX_NUMBER: u32 = 100;

/// Visual styles a renderer may apply while the number spins.
pub const SPIN_STYLES: [&str; 10] = [
    "spin-3d",
    "pulse-scale",
    "glitch",
    "bounce-intense",
    "flip",
    "rotate-shake",
    "wave",
    "zoom-flash",
    "spiral",
    "shake-intense",
];

/// Shape of the slow-down phase. See [`crate::decay::SlowDown`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecayCurve {
    pub initial: Duration,
    pub factor: f64,
    pub ceiling: Duration,
    pub max_steps: u32,
    /// Upper bound on any single wait, applied after growth.
    pub wait_cap: Option<Duration>,
}

impl DecayCurve {
    pub fn single() -> Self {
        Self {
            initial: Duration::from_millis(50),
            factor: 1.27,
            ceiling: Duration::from_millis(800),
            max_steps: 18,
            wait_cap: None,
        }
    }

    pub fn batch() -> Self {
        Self {
            initial: Duration::from_millis(50),
            factor: 1.2,
            ceiling: Duration::from_millis(800),
            max_steps: 18,
            wait_cap: Some(Duration::from_millis(200)),
        }
    }
}

/// Per-size pacing for automatic draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawTiming {
    pub spin: Duration,
    pub slow_down: Duration,
    pub pause: Duration,
}

impl DrawTiming {
    const fn ms(spin: u64, slow_down: u64, pause: u64) -> Self {
        Self {
            spin: Duration::from_millis(spin),
            slow_down: Duration::from_millis(slow_down),
            pause: Duration::from_millis(pause),
        }
    }

    /// Presets; the whole batch lands around forty seconds for each size.
    pub fn preset(size: DrawSize) -> Self {
        match size {
            // manual stop, nothing is timed
            DrawSize::One => Self::ms(0, 0, 0),
            DrawSize::Thirteen => Self::ms(2000, 500, 500),
            DrawSize::Fifteen => Self::ms(1600, 500, 500),
            DrawSize::Thirty => Self::ms(600, 400, 300),
        }
    }
}

#[derive(Clone, Debug)]
pub struct EngineSettings {
    pub range: RangeInclusive<u32>,
    pub spin_interval: Duration,
    pub single_curve: DecayCurve,
    pub batch_curve: DecayCurve,
    pub timings: [(DrawSize, DrawTiming); 4],
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            range: MIN_NUMBER..=MAX_NUMBER,
            spin_interval: Duration::from_millis(30),
            single_curve: DecayCurve::single(),
            batch_curve: DecayCurve::batch(),
            timings: DrawSize::ALL.map(|s| (s, DrawTiming::preset(s))),
        }
    }
}

impl EngineSettings {
    pub fn timing(&self, size: DrawSize) -> DrawTiming {
        self.timings
            .iter()
            .find(|(s, _)| *s == size)
            .map(|(_, t)| *t)
            .unwrap_or_else(|| DrawTiming::preset(size))
    }
}
