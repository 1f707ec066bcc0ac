use crate::board::Board;
use crate::config::GameConfig;
use crate::gravity::settle;
use crate::matcher::{MatchDetector, Run};
use crate::rng::TokenSource;

/// Board-independent parameters shared by every resolution and swap check.
#[derive(Debug, Clone)]
pub struct Rules {
    pub detector: MatchDetector,
    pub palette_size: u8,
    pub max_passes: usize,
}

impl Rules {
    pub fn new(width: usize, palette_size: u8, max_passes: usize) -> Self {
        Self {
            detector: MatchDetector::new(width),
            palette_size,
            max_passes,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.width, config.palette_size, config.max_passes())
    }
}

/// Result of driving a board to a fixed point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub board: Board,
    pub score_delta: u32,
    /// Every cleared run, in clearing order.
    pub runs: Vec<Run>,
    pub passes: usize,
    /// Tokens drawn to refill the top row across all passes.
    pub spawned: usize,
    /// `true` when the pass cap stopped the loop before the board was stable.
    pub capped: bool,
}

impl Resolution {
    pub fn cleared_any(&self) -> bool {
        !self.runs.is_empty()
    }
}

/// Empties every cell of `run` and returns the points it is worth.
pub fn clear(board: &mut Board, run: &Run) -> u32 {
    for &index in &run.indices {
        board.set(index, None);
    }
    run.points()
}

/// Repeats detect, clear and settle until the board is full with no runs,
/// or `rules.max_passes` passes have run.
///
/// A pass clears the highest-priority run and settles once; a pass with no
/// run but with empty cells only settles, so a run-free board with holes
/// still comes back refilled. A full board with no run is returned untouched
/// with a zero delta.
pub fn resolve(board: &Board, rules: &Rules, source: &mut dyn TokenSource) -> Resolution {
    let mut next = board.clone();
    let mut score_delta = 0u32;
    let mut runs = Vec::new();
    let mut passes = 0usize;
    let mut spawned = 0usize;

    loop {
        let run = rules.detector.detect(&next);
        if run.is_none() && next.is_full() {
            break;
        }
        if passes >= rules.max_passes {
            tracing::warn!(
                passes,
                cleared = runs.len(),
                "resolution stopped at pass cap before the board was stable"
            );
            return Resolution {
                board: next,
                score_delta,
                runs,
                passes,
                spawned,
                capped: true,
            };
        }
        passes += 1;

        if let Some(run) = run {
            score_delta += clear(&mut next, &run);
            runs.push(run);
        }
        spawned += settle(&mut next, rules.palette_size, source).spawned;
    }

    Resolution {
        board: next,
        score_delta,
        runs,
        passes,
        spawned,
        capped: false,
    }
}
