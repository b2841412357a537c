use std::time::{SystemTime, UNIX_EPOCH};

use crate::cues::{Cue, CueSink};

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: u128,
    pub action: String,
}

impl LogEntry {
    fn new(action: &str) -> Self {
        Self { timestamp: now_millis(), action: action.to_string() }
    }
}

/// Everything between one spin start and the next.
#[derive(Default)]
pub struct RoundLog {
    pub events: Vec<LogEntry>,
}

/// Timestamped record of every cue of this session.
pub struct DrawLog {
    pub session_name: String,
    pub rounds: Vec<RoundLog>,
}

impl Default for DrawLog {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawLog {
    pub fn new() -> Self {
        Self {
            session_name: format!("session-{}", now_millis() / 1000),
            rounds: Vec::new(),
        }
    }

    pub fn start_round(&mut self) {
        self.rounds.push(RoundLog::default());
    }

    pub fn log_action(&mut self, action: &str) {
        if self.rounds.is_empty() {
            self.start_round();
        }
        if let Some(r) = self.rounds.last_mut() {
            r.events.push(LogEntry::new(action));
        }
    }

    pub fn dump(&self) -> String {
        let mut out = format!("=== Draw Log: {} ===\n", self.session_name);
        for (i, round) in self.rounds.iter().enumerate() {
            out.push_str(&format!("-- Round {} --\n", i + 1));
            for e in &round.events {
                out.push_str(&format!("[{}] {}\n", e.timestamp, e.action));
            }
        }
        out
    }
}

impl CueSink for DrawLog {
    fn emit(&mut self, cue: Cue) {
        match cue {
            Cue::Click => self.log_action("click"),
            Cue::SpinStarted => {
                self.start_round();
                self.log_action("spin started");
            }
            Cue::SpinStopped => self.log_action("spin stopped"),
            Cue::Reveal(n) => self.log_action(&format!("winner {n}")),
            Cue::BatchComplete(winners) => {
                let list = winners.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(" ");
                self.log_action(&format!("batch of {} complete: {}", winners.len(), list));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cues_are_grouped_by_round() {
        let mut log = DrawLog::new();
        log.emit(Cue::Click);
        log.emit(Cue::SpinStarted);
        log.emit(Cue::Reveal(42));
        log.emit(Cue::SpinStarted);
        log.emit(Cue::BatchComplete(vec![3, 9]));
        assert_eq!(log.rounds.len(), 3);
        assert_eq!(log.rounds[0].events[0].action, "click");
        assert_eq!(log.rounds[1].events[1].action, "winner 42");
        assert_eq!(log.rounds[2].events[1].action, "batch of 2 complete: 3 9");

        let dump = log.dump();
        assert!(DrawLog::default().rounds.is_empty());
        assert!(dump.starts_with("=== Draw Log: session-"));
        assert!(dump.contains("-- Round 3 --"));
    }
}
