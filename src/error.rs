use thiserror::Error;

use crate::config::{MAX_PALETTE_SIZE, MIN_PALETTE_SIZE, MIN_WIDTH};

/// Construction-time faults. Gameplay input never produces one of these;
/// bad swaps are reported as a `Rejection` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("board width must be at least {min}, got {0}", min = MIN_WIDTH)]
    WidthTooSmall(usize),
    #[error("board width {0} is too large for u8 cell indices")]
    WidthTooLarge(usize),
    #[error(
        "palette size must be within {min}..={max}, got {0}",
        min = MIN_PALETTE_SIZE,
        max = MAX_PALETTE_SIZE
    )]
    InvalidPalette(u8),
    #[error("tick interval must be non-zero")]
    ZeroTickInterval,
    #[error("swipe threshold must be a non-negative finite number")]
    InvalidSwipeThreshold,
    #[error("expected {expected} cells, got {actual}")]
    CellCountMismatch { expected: usize, actual: usize },
    #[error("token {token} at index {index} is outside a palette of {palette_size}")]
    TokenOutOfPalette {
        index: usize,
        token: u8,
        palette_size: u8,
    },
    #[error("no game session; call newGame first")]
    NoSession,
}
