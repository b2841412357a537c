use std::collections::BTreeSet;
use std::time::Duration;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{DrawTiming, EngineSettings, SPIN_STYLES};
use crate::cues::{Confirm, Cue, CueSink};
use crate::decay::{DecayStep, SlowDown};
use crate::error::{DrawError, DrawResult};
use crate::pool::Pool;
use crate::record::{DrawMode, DrawSize, WinnerRecord};
use crate::selector::WinnerSelector;
use crate::shuffle::ShuffleSequencer;

pub const RESET_PROMPT: &str = "Are you sure you want to reset the history?";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DrawState {
    Idle,
    Spinning,
    SlowingDown,
    Settled,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchResult {
    pub size: DrawSize,
    /// In draw order.
    pub winners: Vec<u32>,
}

/// Everything a renderer needs for one frame.
#[derive(Debug)]
pub struct Snapshot {
    pub display: Option<u32>,
    pub state: DrawState,
    pub style: &'static str,
    pub is_winner: bool,
    pub progress: Option<(usize, usize)>,
    pub remaining: usize,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Wake {
    SpinTick,
    SlowStep,
    NextCycle,
}

struct DrawSession {
    mode: DrawMode,
    spin_started: Duration,
    target: Option<u32>,
    slow_down: Option<SlowDown>,
}

struct BatchSession {
    size: DrawSize,
    timing: DrawTiming,
    index: usize,
    claimed: Vec<u32>,
}

/// Single-draw state machine plus the batch sequencer on top of it.
///
/// Time is virtual: [`DrawEngine::poll`] runs every resumption due by
/// `now` and reports when it wants to be polled next. Requests are
/// scheduled relative to the last polled instant.
pub struct DrawEngine<C: CueSink> {
    settings: EngineSettings,
    pool: Pool,
    shuffle: ShuffleSequencer,
    selector: WinnerSelector,
    style_rng: StdRng,
    cues: C,

    state: DrawState,
    session: Option<DrawSession>,
    batch: Option<BatchSession>,
    wake: Option<(Duration, Wake)>,
    now: Duration,
    music: bool,

    display: Option<u32>,
    revealed: Option<u32>,
    style: usize,
    history: Vec<WinnerRecord>,
    results: Option<BatchResult>,
}

fn seeded(seed: Option<u64>, salt: u64) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s ^ salt),
        None => StdRng::from_entropy(),
    }
}

impl<C: CueSink> DrawEngine<C> {
    /// With `seed`, every draw is reproducible. The display, winner and
    /// style generators still get separate streams.
    pub fn new(settings: EngineSettings, seed: Option<u64>, cues: C) -> Self {
        let range = settings.range.clone();
        Self {
            pool: Pool::new(range.clone()),
            shuffle: ShuffleSequencer::new(range, seeded(seed, 0x5348_5546)),
            selector: WinnerSelector::new(seeded(seed, 0)),
            style_rng: seeded(seed, 0x5354_594c),
            settings,
            cues,
            state: DrawState::Idle,
            session: None,
            batch: None,
            wake: None,
            now: Duration::ZERO,
            music: false,
            display: None,
            revealed: None,
            style: 0,
            history: Vec::new(),
            results: None,
        }
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    /// Most recent first.
    pub fn history(&self) -> &[WinnerRecord] {
        &self.history
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn results(&self) -> Option<&BatchResult> {
        self.results.as_ref()
    }

    pub fn cues(&self) -> &C {
        &self.cues
    }

    /// `(draw in progress, batch size)`, 1-based.
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.batch.as_ref().map(|b| (b.index, b.size.count()))
    }

    pub fn is_busy(&self) -> bool {
        self.state != DrawState::Idle || self.batch.is_some()
    }

    pub fn next_wake(&self) -> Option<Duration> {
        self.wake.map(|(at, _)| at)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            display: self.display,
            state: self.state,
            style: SPIN_STYLES[self.style],
            is_winner: self.revealed.is_some() && self.display == self.revealed,
            progress: self.progress(),
            remaining: self.pool.remaining_count(),
        }
    }

    pub fn request_start(&mut self, mode: DrawMode) -> DrawResult<()> {
        self.cues.emit(Cue::Click);
        if self.is_busy() {
            debug!("start ignored, a draw is already running");
            return Ok(());
        }
        match mode {
            DrawMode::Single => {
                if self.pool.remaining_count() == 0 {
                    warn!("start rejected: pool exhausted");
                    return Err(DrawError::PoolExhausted);
                }
                self.music_on();
                self.begin_spin(mode, self.now);
                Ok(())
            }
            DrawMode::Multi(size) => self.begin_batch(size),
        }
    }

    pub fn request_batch(&mut self, size: DrawSize) -> DrawResult<()> {
        self.request_start(DrawMode::Multi(size))
    }

    /// Only a manual single spin can be stopped; anything else is a no-op.
    pub fn request_stop(&mut self) -> DrawResult<()> {
        self.cues.emit(Cue::Click);
        let manual = matches!(
            self.session.as_ref().map(|s| s.mode),
            Some(DrawMode::Single)
        );
        if self.state != DrawState::Spinning || !manual {
            debug!("stop ignored in state {:?}", self.state);
            return Ok(());
        }
        self.music_off();
        self.wake = None;
        let at = self.now;
        self.begin_slow_down(at).inspect_err(|e| self.abort(e))
    }

    /// Wipes pool and history after an affirmative answer. An active draw
    /// or batch is dropped first.
    pub fn request_reset(&mut self, confirm: &mut dyn Confirm) -> bool {
        self.cues.emit(Cue::Click);
        if !confirm.confirm(RESET_PROMPT) {
            return false;
        }
        if self.is_busy() {
            warn!("reset while drawing, dropping the active session");
            self.finish_idle();
        }
        self.music_off();
        self.pool.reset();
        self.history.clear();
        self.display = None;
        self.revealed = None;
        self.results = None;
        info!("history reset");
        true
    }

    pub fn close_results(&mut self) {
        self.results = None;
    }

    pub fn poll(&mut self, now: Duration) -> DrawResult<Option<Duration>> {
        self.now = self.now.max(now);
        while let Some((at, wake)) = self.wake {
            if at > self.now {
                break;
            }
            self.wake = None;
            if let Err(e) = self.fire(at, wake) {
                self.abort(&e);
                return Err(e);
            }
        }
        Ok(self.next_wake())
    }

    fn fire(&mut self, at: Duration, wake: Wake) -> DrawResult<()> {
        match wake {
            Wake::SpinTick => self.spin_tick(at),
            Wake::SlowStep => self.slow_step(at),
            Wake::NextCycle => {
                match self.batch.as_ref().map(|b| b.index < b.size.count()) {
                    Some(true) => self.start_cycle(at),
                    Some(false) => self.finish_batch(),
                    None => {}
                }
                Ok(())
            }
        }
    }

    fn begin_batch(&mut self, size: DrawSize) -> DrawResult<()> {
        let remaining = self.pool.remaining_count();
        if remaining < size.count() {
            warn!("batch {} rejected, {} numbers left", size, remaining);
            return Err(DrawError::InsufficientPool { requested: size.count(), remaining });
        }
        self.batch = Some(BatchSession {
            size,
            timing: self.settings.timing(size),
            index: 0,
            claimed: Vec::with_capacity(size.count()),
        });
        self.results = None;
        self.music_on();
        self.start_cycle(self.now);
        Ok(())
    }

    fn start_cycle(&mut self, at: Duration) {
        let Some(batch) = self.batch.as_mut() else { return };
        batch.index += 1;
        let mode = DrawMode::Multi(batch.size);
        debug!("batch draw {}/{}", batch.index, batch.size.count());
        self.begin_spin(mode, at);
    }

    fn begin_spin(&mut self, mode: DrawMode, at: Duration) {
        self.shuffle.start();
        self.style = self.style_rng.gen_range(0..SPIN_STYLES.len());
        self.revealed = None;
        self.session = Some(DrawSession { mode, spin_started: at, target: None, slow_down: None });
        self.state = DrawState::Spinning;
        self.wake = Some((at, Wake::SpinTick));
    }

    fn spin_tick(&mut self, at: Duration) -> DrawResult<()> {
        let Some(session) = self.session.as_ref() else { return Ok(()) };
        let (spin_for, restyle) = match session.mode {
            DrawMode::Single => (None, 0.10),
            DrawMode::Multi(_) => (self.batch.as_ref().map(|b| b.timing.spin), 0.15),
        };
        if spin_for.is_some_and(|d| at.saturating_sub(session.spin_started) >= d) {
            return self.begin_slow_down(at);
        }
        self.display = Some(self.shuffle.next());
        self.restyle(restyle);
        // late polls skip missed frames instead of replaying them
        let interval = self.settings.spin_interval.max(Duration::from_millis(1));
        self.wake = Some(((at + interval).max(self.now), Wake::SpinTick));
        Ok(())
    }

    fn begin_slow_down(&mut self, at: Duration) -> DrawResult<()> {
        let (reserved, curve, budget): (BTreeSet<u32>, _, _) = match self.batch.as_ref() {
            Some(b) => (
                b.claimed.iter().copied().collect(),
                self.settings.batch_curve,
                Some(b.timing.slow_down),
            ),
            None => (BTreeSet::new(), self.settings.single_curve, None),
        };
        let target = self.selector.select(&self.pool.remaining(&reserved))?;
        let Some(session) = self.session.as_mut() else { return Ok(()) };
        session.target = Some(target);
        session.slow_down = Some(SlowDown::new(curve, budget));
        self.state = DrawState::SlowingDown;
        self.slow_step(at)
    }

    fn slow_step(&mut self, at: Duration) -> DrawResult<()> {
        let Some(session) = self.session.as_mut() else { return Ok(()) };
        let manual = session.mode == DrawMode::Single;
        let (step, steps) = match session.slow_down.as_mut() {
            Some(sd) => (sd.next(), sd.steps()),
            None => (DecayStep::Land, 0),
        };
        match step {
            DecayStep::Hold(wait) => {
                self.display = Some(self.shuffle.next());
                if manual && steps % 3 == 0 {
                    self.restyle(1.0);
                }
                self.wake = Some((at + wait, Wake::SlowStep));
                Ok(())
            }
            DecayStep::Land => self.settle(at),
        }
    }

    fn settle(&mut self, at: Duration) -> DrawResult<()> {
        let Some(session) = self.session.take() else { return Ok(()) };
        let Some(target) = session.target else {
            self.finish_idle();
            return Ok(());
        };
        self.state = DrawState::Settled;
        self.pool.commit(target)?;
        self.display = Some(target);
        self.revealed = Some(target);
        let size = session.mode.size();
        self.history.insert(0, WinnerRecord { value: target, size });
        info!("winner {} ({})", target, size);
        self.cues.emit(Cue::Reveal(target));
        self.shuffle.stop();

        self.state = DrawState::Idle;
        if let Some(batch) = self.batch.as_mut() {
            batch.claimed.push(target);
            self.wake = Some((at + batch.timing.pause, Wake::NextCycle));
        }
        Ok(())
    }

    fn finish_batch(&mut self) {
        let Some(batch) = self.batch.take() else { return };
        self.music_off();
        info!("batch {} complete: {:?}", batch.size, batch.claimed);
        self.cues.emit(Cue::BatchComplete(batch.claimed.clone()));
        self.results = Some(BatchResult { size: batch.size, winners: batch.claimed });
    }

    fn abort(&mut self, err: &DrawError) {
        warn!("draw aborted: {}", err);
        self.finish_idle();
    }

    fn finish_idle(&mut self) {
        self.session = None;
        self.batch = None;
        self.wake = None;
        self.state = DrawState::Idle;
        self.shuffle.stop();
        self.music_off();
    }

    fn restyle(&mut self, chance: f64) {
        if self.style_rng.gen_bool(chance) {
            self.style = self.style_rng.gen_range(0..SPIN_STYLES.len());
        }
    }

    fn music_on(&mut self) {
        if !self.music {
            self.music = true;
            self.cues.emit(Cue::SpinStarted);
        }
    }

    fn music_off(&mut self) {
        if self.music {
            self.music = false;
            self.cues.emit(Cue::SpinStopped);
        }
    }
}
