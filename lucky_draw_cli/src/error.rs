use thiserror::Error;

/// Errors surfaced by draw requests. None of them leave the engine busy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DrawError {
    #[error("all numbers have been drawn")]
    PoolExhausted,
    #[error("not enough numbers available: requested {requested}, only {remaining} left")]
    InsufficientPool { requested: usize, remaining: usize },
    #[error("cannot commit {0}: already drawn or out of range")]
    InvalidCommit(u32),
}

pub type DrawResult<T> = Result<T, DrawError>;
