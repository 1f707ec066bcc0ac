use crate::board::Board;
use crate::rng::TokenSource;

/// What one settle sweep changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettleReport {
    pub spawned: usize,
    pub moved: usize,
}

impl SettleReport {
    pub fn changed(&self) -> bool {
        self.spawned > 0 || self.moved > 0
    }
}

/// One gravity sweep.
///
/// Each column is walked from row 0 down to the second-to-last row. An empty
/// top cell is refilled from `source` first; then, if the cell below is empty,
/// the current content drops into it. Because the walk continues downward, a
/// token can keep falling within the same sweep, but each column spawns at
/// most one new token per call. Deep holes need several calls to drain.
pub fn settle(board: &mut Board, palette_size: u8, source: &mut dyn TokenSource) -> SettleReport {
    let width = board.width();
    let mut report = SettleReport::default();

    for col in 0..width {
        for row in 0..width.saturating_sub(1) {
            let here = row * width + col;
            let below = here + width;

            if row == 0 && board.get(here) == Some(None) {
                board.set(here, Some(source.next_token(palette_size)));
                report.spawned += 1;
            }

            if board.get(below) == Some(None) {
                let cell = board.get(here).flatten();
                board.set(below, cell);
                board.set(here, None);
                if cell.is_some() {
                    report.moved += 1;
                }
            }
        }
    }

    report
}
