use std::fmt;

use crate::board::{Board, Direction};
use crate::resolve::{Resolution, Rules, resolve};
use crate::rng::TokenSource;

/// Why a swap was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingSource,
    MissingDestination,
    OutOfBounds,
    NotAdjacent,
    NoMatch,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingSource => "missing_source",
            Self::MissingDestination => "missing_destination",
            Self::OutOfBounds => "out_of_bounds",
            Self::NotAdjacent => "not_adjacent",
            Self::NoMatch => "no_match",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapVerdict {
    Committed(Resolution),
    Rejected(Rejection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapResult {
    /// The resolved board on commit, the untouched input on rejection.
    pub board: Board,
    pub score_delta: u32,
    pub verdict: SwapVerdict,
}

impl SwapResult {
    pub fn accepted(&self) -> bool {
        matches!(self.verdict, SwapVerdict::Committed(_))
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self.verdict {
            SwapVerdict::Rejected(reason) => Some(reason),
            SwapVerdict::Committed(_) => None,
        }
    }
}

/// Swaps two orthogonal neighbors if, and only if, doing so creates a match.
///
/// The exchange is tried on a scratch copy. When it yields a run the scratch
/// board is resolved to a fixed point and returned; otherwise the input board
/// is returned as-is and `source` is not drawn from.
pub fn try_swap(
    board: &Board,
    from: usize,
    to: usize,
    rules: &Rules,
    source: &mut dyn TokenSource,
) -> SwapResult {
    let reject = |reason| rejected(board, reason);

    if from >= board.cell_count() || to >= board.cell_count() {
        return reject(Rejection::OutOfBounds);
    }
    if !board.are_adjacent(from, to) {
        return reject(Rejection::NotAdjacent);
    }

    let mut scratch = board.clone();
    scratch.swap(from, to);
    if !rules.detector.has_match(&scratch) {
        return reject(Rejection::NoMatch);
    }

    let resolution = resolve(&scratch, rules, source);
    SwapResult {
        board: resolution.board.clone(),
        score_delta: resolution.score_delta,
        verdict: SwapVerdict::Committed(resolution),
    }
}

/// Swap gesture state machine.
///
/// `Idle -> Armed -> Targeted`, then [`Gesture::release`] evaluates whatever
/// was captured and always lands back on `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Gesture {
    #[default]
    Idle,
    Armed {
        source: usize,
    },
    Targeted {
        source: usize,
        destination: usize,
    },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn source(&self) -> Option<usize> {
        match *self {
            Self::Idle => None,
            Self::Armed { source } | Self::Targeted { source, .. } => Some(source),
        }
    }

    pub fn destination(&self) -> Option<usize> {
        match *self {
            Self::Targeted { destination, .. } => Some(destination),
            _ => None,
        }
    }

    /// Captures the dragged cell. Starting again mid-gesture re-arms.
    pub fn begin(&mut self, source: usize) {
        *self = Self::Armed { source };
    }

    /// Captures or replaces the destination. Ignored while idle.
    pub fn target(&mut self, destination: usize) {
        if let Some(source) = self.source() {
            *self = Self::Targeted {
                source,
                destination,
            };
        }
    }

    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }

    /// Ends the gesture and evaluates the captured swap against `board`.
    pub fn release(
        &mut self,
        board: &Board,
        rules: &Rules,
        source: &mut dyn TokenSource,
    ) -> SwapResult {
        match std::mem::take(self) {
            Gesture::Idle => rejected(board, Rejection::MissingSource),
            Gesture::Armed { .. } => rejected(board, Rejection::MissingDestination),
            Gesture::Targeted {
                source: from,
                destination: to,
            } => try_swap(board, from, to, rules, source),
        }
    }

    /// Ends a touch gesture whose pointer moved `(dx, dy)` shell pixels.
    ///
    /// The destination is the neighbor on the dominant axis. A drag shorter
    /// than `threshold` has no destination; one pointing off the board is
    /// out of bounds.
    pub fn release_toward(
        &mut self,
        board: &Board,
        dx: f64,
        dy: f64,
        threshold: f64,
        rules: &Rules,
        source: &mut dyn TokenSource,
    ) -> SwapResult {
        let Some(from) = self.source() else {
            return self.release(board, rules, source);
        };
        match swipe_direction(dx, dy, threshold) {
            None => {
                *self = Self::Armed { source: from };
            }
            Some(direction) => match board.neighbor(from, direction) {
                Some(to) => self.target(to),
                None => {
                    self.cancel();
                    return rejected(board, Rejection::OutOfBounds);
                }
            },
        }
        self.release(board, rules, source)
    }
}

fn rejected(board: &Board, reason: Rejection) -> SwapResult {
    SwapResult {
        board: board.clone(),
        score_delta: 0,
        verdict: SwapVerdict::Rejected(reason),
    }
}

/// Dominant-axis direction of a pointer delta; screen `y` grows downward.
pub fn swipe_direction(dx: f64, dy: f64, threshold: f64) -> Option<Direction> {
    if !dx.is_finite() || !dy.is_finite() {
        return None;
    }
    let (ax, ay) = (dx.abs(), dy.abs());
    if ax.max(ay) < threshold.max(f64::MIN_POSITIVE) {
        return None;
    }
    if ax >= ay {
        Some(if dx > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        })
    } else {
        Some(if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        })
    }
}
