use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// Source of the instants fed to `DrawEngine::poll`.
pub trait Clock {
    fn now(&self) -> Duration;
}

pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

/// How long to sleep before the engine wants attention again, capped at
/// one frame so input and redraws stay responsive.
pub fn sleep_budget(clock: &impl Clock, next_wake: Option<Duration>, frame: Duration) -> Duration {
    next_wake
        .map(|at| at.saturating_sub(clock.now()))
        .unwrap_or(frame)
        .min(frame)
}

/// Reads stdin on a background thread so the draw keeps animating while
/// the user types. The channel closes at end of input.
pub fn spawn_line_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

// If secs == 0, waits indefinitely (no timeout)
pub fn read_line_timeout(lines: &Receiver<String>, prompt: &str, secs: u64) -> Option<String> {
    print!("{prompt}");
    let _ = io::stdout().flush();

    if secs == 0 {
        return lines.recv().ok();
    }
    match lines.recv_timeout(Duration::from_secs(secs)) {
        Ok(s) => Some(s),
        Err(RecvTimeoutError::Timeout) => {
            println!("\nTime out.");
            None
        }
        Err(RecvTimeoutError::Disconnected) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Duration);

    impl Clock for Fixed {
        fn now(&self) -> Duration {
            self.0
        }
    }

    #[test]
    fn sleeps_until_wake_but_at_most_a_frame() {
        let frame = Duration::from_millis(20);
        let clock = Fixed(Duration::from_millis(100));
        assert_eq!(sleep_budget(&clock, None, frame), frame);
        assert_eq!(sleep_budget(&clock, Some(Duration::from_millis(105)), frame), Duration::from_millis(5));
        assert_eq!(sleep_budget(&clock, Some(Duration::from_millis(500)), frame), frame);
        assert_eq!(sleep_budget(&clock, Some(Duration::from_millis(50)), frame), Duration::ZERO);
    }

    #[test]
    fn timed_read_returns_queued_line() {
        let (tx, rx) = mpsc::channel();
        tx.send("y".to_string()).unwrap();
        assert_eq!(read_line_timeout(&rx, "> ", 1).as_deref(), Some("y"));
        drop(tx);
        assert_eq!(read_line_timeout(&rx, "> ", 0), None);
    }
}
