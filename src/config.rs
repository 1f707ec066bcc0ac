use serde::Deserialize;
use web_time::Duration;

use crate::error::EngineError;

pub const DEFAULT_WIDTH: usize = 8;
pub const DEFAULT_PALETTE_SIZE: u8 = 6;
pub const DEFAULT_TICK_INTERVAL_MS: u32 = 100;
pub const DEFAULT_SWIPE_THRESHOLD: f64 = 10.0;

/// Runs are at least three cells long, so narrower boards can never match.
pub const MIN_WIDTH: usize = 3;
/// Cell indices are exported to the shell as `u8`.
pub const MAX_WIDTH: usize = 16;
pub const MIN_PALETTE_SIZE: u8 = 2;
/// `0` is reserved for the empty marker in the flat export.
pub const MAX_PALETTE_SIZE: u8 = u8::MAX - 1;

/// Session settings supplied by the shell. Missing fields fall back to the
/// defaults of the classic 8x8, six-color board.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub width: usize,
    pub palette_size: u8,
    pub tick_interval_ms: u32,
    /// Upper bound on detect/clear/settle passes per resolution.
    /// `None` means `width * width`.
    pub max_resolve_passes: Option<usize>,
    /// Minimum pointer travel, in shell pixels, for a touch release to count
    /// as a swipe.
    pub swipe_threshold: f64,
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.width < MIN_WIDTH {
            return Err(EngineError::WidthTooSmall(self.width));
        }
        if self.width > MAX_WIDTH {
            return Err(EngineError::WidthTooLarge(self.width));
        }
        if !(MIN_PALETTE_SIZE..=MAX_PALETTE_SIZE).contains(&self.palette_size) {
            return Err(EngineError::InvalidPalette(self.palette_size));
        }
        if self.tick_interval_ms == 0 {
            return Err(EngineError::ZeroTickInterval);
        }
        if !self.swipe_threshold.is_finite() || self.swipe_threshold < 0.0 {
            return Err(EngineError::InvalidSwipeThreshold);
        }
        Ok(())
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.width
    }

    pub fn max_passes(&self) -> usize {
        self.max_resolve_passes.unwrap_or_else(|| self.cell_count())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.tick_interval_ms))
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            palette_size: DEFAULT_PALETTE_SIZE,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            max_resolve_passes: None,
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
        }
    }
}
