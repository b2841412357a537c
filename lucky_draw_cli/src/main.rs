mod config;
mod cues;
mod decay;
mod display;
mod engine;
mod error;
mod logger;
mod pool;
mod record;
mod selector;
mod shuffle;
mod timer;

use std::io::{self, Write};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;

use config::EngineSettings;
use cues::{Confirm, CueSink};
use display::{render_frame, render_history, render_results, TerminalCues};
use engine::{DrawEngine, DrawState};
use record::{DrawMode, DrawSize};
use timer::{read_line_timeout, sleep_budget, spawn_line_reader, Clock, MonotonicClock};

const FRAME: Duration = Duration::from_millis(20);
const CONFIRM_TIMEOUT_SECS: u64 = 15;

/// Draws unique numbers from 1 to 100 with a spinning reveal.
#[derive(Debug, Parser)]
struct Args {
    /// Seed for reproducible draws
    #[arg(long)]
    seed: Option<u64>,

    /// Verbosity level (`error`, `warn`, `info`, `debug`, `trace`)
    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,

    /// Incremental verbosity (`-v`, `-vv`, etc.)
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn level(&self) -> LevelFilter {
        let bumped = self.log_level as usize + self.verbose as usize;
        LevelFilter::iter()
            .find(|l| *l as usize == bumped)
            .unwrap_or(LevelFilter::Trace)
    }
}

struct StdinConfirm<'a> {
    lines: &'a Receiver<String>,
}

impl Confirm for StdinConfirm<'_> {
    fn confirm(&mut self, prompt: &str) -> bool {
        println!("\n{prompt} [y/N]");
        let ans = read_line_timeout(self.lines, "> ", CONFIRM_TIMEOUT_SECS).unwrap_or_default();
        matches!(ans.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

fn print_help() {
    println!("Commands:");
    println!("  <enter>     start a single draw, or stop the running one");
    println!("  13, 15, 30  draw that many numbers automatically");
    println!("  h           winners so far");
    println!("  log         session log");
    println!("  r           reset history");
    println!("  q           quit");
}

/// Returns false when the user wants out.
fn handle_command(engine: &mut DrawEngine<TerminalCues>, lines: &Receiver<String>, cmd: &str) -> bool {
    let outcome = match cmd.to_lowercase().as_str() {
        "" | "s" | "1" | "x1" => {
            if engine.state() == DrawState::Spinning {
                engine.request_stop()
            } else {
                engine.request_start(DrawMode::Single)
            }
        }
        "h" | "history" => {
            println!("\n{}", render_history(engine.history()));
            let pool = engine.pool();
            println!("{} drawn, {} numbers left", pool.drawn().len(), pool.remaining_count());
            Ok(())
        }
        "log" => {
            println!("\n{}", engine.cues().log.dump());
            Ok(())
        }
        "r" | "reset" => {
            if engine.request_reset(&mut StdinConfirm { lines }) {
                println!("History cleared.");
            }
            Ok(())
        }
        "q" | "quit" | "exit" => return false,
        "?" | "help" => {
            print_help();
            Ok(())
        }
        other => match other.trim_start_matches('x').parse::<usize>().ok().and_then(DrawSize::from_count) {
            Some(size) => engine.request_batch(size),
            None => {
                println!("Unrecognized command. Type ? for help.");
                Ok(())
            }
        },
    };
    if let Err(e) = outcome {
        eprintln!("\n{e}");
    }
    true
}

/// No more input can arrive: a manual spin is stopped so it settles on its
/// own. Returns true once nothing is left running.
fn input_closed<C: CueSink>(engine: &mut DrawEngine<C>) -> bool {
    if engine.state() == DrawState::Spinning && engine.progress().is_none() {
        if let Err(e) = engine.request_stop() {
            eprintln!("\n{e}");
        }
    }
    !engine.is_busy()
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_default_env()
        .filter_level(args.level())
        .init();

    println!("Lucky Draw ({}..{})", config::MIN_NUMBER, config::MAX_NUMBER);
    print_help();

    let lines = spawn_line_reader();
    let clock = MonotonicClock::new();
    let mut engine = DrawEngine::new(EngineSettings::default(), args.seed, TerminalCues::new());
    let mut last_frame = String::new();
    let mut was_busy = false;

    loop {
        match lines.try_recv() {
            Ok(line) => {
                if !handle_command(&mut engine, &lines, line.trim()) {
                    break;
                }
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                if input_closed(&mut engine) {
                    break;
                }
            }
        }

        if let Err(e) = engine.poll(clock.now()) {
            eprintln!("\n{e}");
        }

        let busy = engine.is_busy();
        let frame = render_frame(&engine.snapshot());
        if frame != last_frame {
            print!("\r{frame:<48}");
            let _ = io::stdout().flush();
            last_frame = frame;
        }
        if was_busy && !busy {
            println!();
            if let Some(result) = engine.results() {
                println!("{}", render_results(result));
                engine.close_results();
            }
        }
        was_busy = busy;

        thread::sleep(sleep_budget(&clock, engine.next_wake(), FRAME));
    }

    println!();
    println!("{}", render_history(engine.history()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use cues::Cue;

    fn settle(engine: &mut DrawEngine<Vec<Cue>>, mut t: Duration) -> Duration {
        while let Some(next) = engine.poll(t).unwrap() {
            t = next;
        }
        t
    }

    #[test]
    fn closed_input_settles_a_manual_spin() {
        let mut engine = DrawEngine::new(EngineSettings::default(), Some(1), Vec::new());
        engine.request_start(DrawMode::Single).unwrap();
        engine.poll(Duration::from_millis(120)).unwrap();

        assert!(!input_closed(&mut engine));
        assert_eq!(engine.state(), DrawState::SlowingDown);
        // further calls while slowing down must not stop twice
        assert!(!input_closed(&mut engine));

        settle(&mut engine, Duration::from_millis(120));
        assert!(input_closed(&mut engine));
        assert_eq!(engine.history().len(), 1);
        assert_eq!(engine.pool().drawn().len(), 1);
        let clicks = engine.cues().iter().filter(|c| **c == Cue::Click).count();
        assert_eq!(clicks, 2);
    }

    #[test]
    fn closed_input_lets_a_batch_finish() {
        let mut engine = DrawEngine::new(EngineSettings::default(), Some(2), Vec::new());
        engine.request_batch(DrawSize::Thirty).unwrap();
        engine.poll(Duration::from_millis(50)).unwrap();

        assert!(!input_closed(&mut engine));
        assert_eq!(engine.state(), DrawState::Spinning);

        settle(&mut engine, Duration::from_millis(50));
        assert!(input_closed(&mut engine));
        assert_eq!(engine.results().map(|r| r.winners.len()), Some(30));
    }

    #[test]
    fn closed_input_when_idle_exits_at_once() {
        let mut engine = DrawEngine::new(EngineSettings::default(), Some(3), Vec::new());
        assert!(input_closed(&mut engine));
        assert!(engine.cues().is_empty());
    }
}
