/// Fire-and-forget feedback for whoever renders the draw (sound, confetti).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cue {
    /// A start, stop, batch or reset button was pressed.
    Click,
    /// Background music on.
    SpinStarted,
    /// Background music off.
    SpinStopped,
    /// A draw settled on this winner.
    Reveal(u32),
    /// Every draw of a batch settled; the whole result, in draw order.
    BatchComplete(Vec<u32>),
}

pub trait CueSink {
    fn emit(&mut self, cue: Cue);
}

/// Asked before wiping the history.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl CueSink for Vec<Cue> {
    fn emit(&mut self, cue: Cue) {
        self.push(cue);
    }
}
