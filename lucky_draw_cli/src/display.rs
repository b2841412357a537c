use std::io::{self, Write};

use crate::cues::{Cue, CueSink};
use crate::engine::{BatchResult, DrawState, Snapshot};
use crate::logger::DrawLog;
use crate::record::{DrawSize, WinnerRecord};

/// One status line for the current frame.
pub fn render_frame(snap: &Snapshot) -> String {
    let number = snap.display.map_or_else(|| "00".to_string(), |n| format!("{n:02}"));
    let progress = match snap.progress {
        Some((i, n)) => format!("Drawing {i} / {n}  "),
        None => String::new(),
    };
    match snap.state {
        DrawState::Spinning | DrawState::SlowingDown => {
            format!("{progress}[ {number:>3} ]  ~{}~", snap.style)
        }
        _ if snap.is_winner => format!("{progress}*** {number:>3} ***"),
        _ => format!("{progress}[ {number:>3} ]  {} left", snap.remaining),
    }
}

/// Winners, newest first, one row per draw size.
pub fn render_history(history: &[WinnerRecord]) -> String {
    let mut out = format!("Winners ({})\n", history.len());
    for size in DrawSize::ALL {
        let values: Vec<String> = history
            .iter()
            .filter(|r| r.size == size)
            .map(|r| r.value.to_string())
            .collect();
        if values.is_empty() {
            continue;
        }
        out.push_str(&format!("  {:<4} {}\n", size.to_string(), values.join(" ")));
    }
    out
}

pub fn render_results(result: &BatchResult) -> String {
    let mut out = format!("🎉 {} Winners! 🎉 ({})\n", result.winners.len(), result.size);
    for row in result.winners.chunks(5) {
        let cells: Vec<String> = row.iter().map(|n| format!("{n:>4}")).collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out
}

/// Terminal feedback: a bell per reveal, everything else goes to the log.
pub struct TerminalCues {
    pub log: DrawLog,
}

impl Default for TerminalCues {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalCues {
    pub fn new() -> Self {
        Self { log: DrawLog::new() }
    }
}

impl CueSink for TerminalCues {
    fn emit(&mut self, cue: Cue) {
        if matches!(cue, Cue::Reveal(_)) {
            print!("\x07");
            let _ = io::stdout().flush();
        }
        self.log.emit(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(state: DrawState, display: Option<u32>, is_winner: bool) -> Snapshot {
        Snapshot {
            display,
            state,
            style: "glitch",
            is_winner,
            progress: None,
            remaining: 100,
        }
    }

    #[test]
    fn frames_show_spin_and_reveal() {
        assert_eq!(render_frame(&snap(DrawState::Idle, None, false)), "[  00 ]  100 left");
        assert_eq!(render_frame(&snap(DrawState::Spinning, Some(7), false)), "[  07 ]  ~glitch~");
        assert_eq!(render_frame(&snap(DrawState::Idle, Some(42), true)), "***  42 ***");

        let mut s = snap(DrawState::SlowingDown, Some(100), false);
        s.progress = Some((3, 13));
        assert_eq!(render_frame(&s), "Drawing 3 / 13  [ 100 ]  ~glitch~");
    }

    #[test]
    fn history_groups_by_size() {
        let history = [
            WinnerRecord { value: 5, size: DrawSize::Thirteen },
            WinnerRecord { value: 9, size: DrawSize::One },
            WinnerRecord { value: 2, size: DrawSize::Thirteen },
        ];
        let out = render_history(&history);
        assert!(out.starts_with("Winners (3)\n"));
        assert!(out.contains("×1   9\n"));
        assert!(out.contains("×13  5 2\n"));
        assert!(!out.contains("×30"));
    }

    #[test]
    fn terminal_cues_forward_to_the_log() {
        let mut cues = TerminalCues::default();
        cues.emit(Cue::SpinStarted);
        cues.emit(Cue::SpinStopped);
        assert_eq!(cues.log.rounds.len(), 1);
        assert_eq!(cues.log.rounds[0].events.len(), 2);
    }

    #[test]
    fn results_wrap_five_per_row() {
        let result = BatchResult { size: DrawSize::Thirteen, winners: (1..=13).collect() };
        let out = render_results(&result);
        assert_eq!(out.lines().count(), 4);
        assert!(out.lines().next().unwrap().contains("13 Winners!"));
    }
}
