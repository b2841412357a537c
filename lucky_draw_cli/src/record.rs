use std::fmt;

/// How many winners a single request produces.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum DrawSize {
    One = 1,
    Thirteen = 13,
    Fifteen = 15,
    Thirty = 30,
}

impl DrawSize {
    pub const ALL: [DrawSize; 4] = [DrawSize::One, DrawSize::Thirteen, DrawSize::Fifteen, DrawSize::Thirty];

    pub fn count(self) -> usize {
        self as usize
    }

    pub fn from_count(n: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.count() == n)
    }
}

impl fmt::Display for DrawSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "×{}", self.count())
    }
}

/// Manual single draw, or an automatic batch.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DrawMode {
    Single,
    Multi(DrawSize),
}

impl DrawMode {
    pub fn size(self) -> DrawSize {
        match self {
            DrawMode::Single => DrawSize::One,
            DrawMode::Multi(s) => s,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct WinnerRecord {
    pub value: u32,
    pub size: DrawSize,
}

impl fmt::Display for WinnerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>3} ({})", self.value, self.size)
    }
}
