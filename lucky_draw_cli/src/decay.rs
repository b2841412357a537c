use std::time::Duration;

use crate::config::DecayCurve;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecayStep {
    /// Show a filler value, then wait this long before the next step.
    Hold(Duration),
    /// Show the winner. The phase is over.
    Land,
}

/// Geometric slow-down ending on the winner.
///
/// Each step grows the delay by `factor`. The phase lands once `max_steps`
/// steps were taken or the delay passes `ceiling`, whichever comes first,
/// and additionally once the optional time `budget` has been waited out.
#[derive(Clone, Debug)]
pub struct SlowDown {
    curve: DecayCurve,
    budget: Option<Duration>,
    delay_ms: f64,
    steps: u32,
    waited: Duration,
    landed: bool,
}

impl SlowDown {
    pub fn new(curve: DecayCurve, budget: Option<Duration>) -> Self {
        Self {
            curve,
            budget,
            delay_ms: curve.initial.as_secs_f64() * 1000.0,
            steps: 0,
            waited: Duration::ZERO,
            landed: false,
        }
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn next(&mut self) -> DecayStep {
        if self.landed || self.budget.is_some_and(|b| self.waited >= b) {
            return self.land();
        }
        self.steps += 1;
        self.delay_ms *= self.curve.factor;
        let ceiling_ms = self.curve.ceiling.as_secs_f64() * 1000.0;
        if self.steps >= self.curve.max_steps || self.delay_ms.is_nan() || self.delay_ms > ceiling_ms {
            return self.land();
        }
        let mut wait = Duration::from_secs_f64(self.delay_ms.max(0.0) / 1000.0);
        if let Some(cap) = self.curve.wait_cap {
            wait = wait.min(cap);
        }
        self.waited += wait;
        DecayStep::Hold(wait)
    }

    fn land(&mut self) -> DecayStep {
        self.landed = true;
        DecayStep::Land
    }
}
