use crate::board::{Board, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Column,
    Row,
}

/// Three or four aligned cells sharing one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub token: Token,
    pub axis: Axis,
    /// Ordered top-to-bottom (columns) or left-to-right (rows).
    pub indices: Vec<usize>,
}

impl Run {
    /// Points awarded for clearing this run: one per cell.
    pub fn points(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Longest runs first, columns before rows.
const SCAN_ORDER: [(Axis, usize); 4] = [
    (Axis::Column, 4),
    (Axis::Row, 4),
    (Axis::Column, 3),
    (Axis::Row, 3),
];

/// Finds the highest-priority run on a board of a fixed width.
///
/// Row windows that would spill into the next row are excluded up front, one
/// mask per run length, so scans never need per-cell wrap checks.
#[derive(Debug, Clone)]
pub struct MatchDetector {
    width: usize,
    row_excluded_three: Vec<bool>,
    row_excluded_four: Vec<bool>,
}

impl MatchDetector {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            row_excluded_three: excluded_row_starts(width, 3),
            row_excluded_four: excluded_row_starts(width, 4),
        }
    }

    /// Returns the first run in priority order, scanning starting indices
    /// from lowest to highest within each pass.
    pub fn detect(&self, board: &Board) -> Option<Run> {
        if board.width() != self.width {
            return Self::new(board.width()).detect(board);
        }
        SCAN_ORDER
            .iter()
            .find_map(|&(axis, len)| self.scan(board, axis, len))
    }

    pub fn has_match(&self, board: &Board) -> bool {
        self.detect(board).is_some()
    }

    fn scan(&self, board: &Board, axis: Axis, len: usize) -> Option<Run> {
        let cells = board.cells();
        let step = match axis {
            Axis::Column => self.width,
            Axis::Row => 1,
        };
        let span = step * (len - 1);

        for start in 0..cells.len() {
            if start + span >= cells.len() {
                break;
            }
            if axis == Axis::Row && self.row_excluded(len, start) {
                continue;
            }
            let Some(token) = cells[start] else {
                continue;
            };
            let indices: Vec<usize> = (0..len).map(|k| start + k * step).collect();
            if indices.iter().all(|&i| cells[i] == Some(token)) {
                return Some(Run {
                    token,
                    axis,
                    indices,
                });
            }
        }

        None
    }

    fn row_excluded(&self, len: usize, start: usize) -> bool {
        let mask = if len == 4 {
            &self.row_excluded_four
        } else {
            &self.row_excluded_three
        };
        mask.get(start).copied().unwrap_or(true)
    }
}

/// `true` at every index whose `len`-wide row window crosses a row boundary.
fn excluded_row_starts(width: usize, len: usize) -> Vec<bool> {
    (0..width * width)
        .map(|i| i % width + len > width)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;

    const WIDTH: usize = 8;
    const PLANT: u8 = 5;

    fn idx(row: usize, col: usize) -> usize {
        row * WIDTH + col
    }

    /// Board with no runs anywhere: neighbors differ along both axes.
    fn quiet_cells() -> Vec<Cell> {
        (0..WIDTH * WIDTH)
            .map(|i| {
                let (row, col) = (i / WIDTH, i % WIDTH);
                Some(Token::new(((row + 2 * col) % 5) as u8))
            })
            .collect()
    }

    fn board_with(planted: &[usize]) -> Board {
        let mut cells = quiet_cells();
        for &i in planted {
            cells[i] = Some(Token::new(PLANT));
        }
        Board::from_cells(WIDTH, 6, cells).expect("valid board")
    }

    #[test]
    fn quiet_board_has_no_runs() {
        let detector = MatchDetector::new(WIDTH);

        assert_eq!(detector.detect(&board_with(&[])), None);
    }

    #[test]
    fn detects_row_of_three() {
        let detector = MatchDetector::new(WIDTH);
        let board = board_with(&[idx(2, 1), idx(2, 2), idx(2, 3)]);

        let run = detector.detect(&board).expect("run");

        assert_eq!(run.axis, Axis::Row);
        assert_eq!(run.token, Token::new(PLANT));
        assert_eq!(run.indices, vec![idx(2, 1), idx(2, 2), idx(2, 3)]);
        assert_eq!(run.points(), 3);
    }

    #[test]
    fn row_runs_never_wrap_across_rows() {
        let detector = MatchDetector::new(WIDTH);
        let three = board_with(&[idx(0, 6), idx(0, 7), idx(1, 0)]);
        let four = board_with(&[idx(3, 6), idx(3, 7), idx(4, 0), idx(4, 1)]);
        let last_cells = board_with(&[idx(7, 6), idx(7, 7)]);

        assert_eq!(detector.detect(&three), None);
        assert_eq!(detector.detect(&four), None);
        assert_eq!(detector.detect(&last_cells), None);
    }

    #[test]
    fn last_three_cells_of_a_row_still_match() {
        let detector = MatchDetector::new(WIDTH);
        let tail = board_with(&[idx(7, 5), idx(7, 6), idx(7, 7)]);
        let wrapped_four = board_with(&[idx(6, 5), idx(6, 6), idx(6, 7), idx(7, 0)]);

        let run = detector.detect(&tail).expect("run");
        assert_eq!(run.indices, vec![61, 62, 63]);

        // (6,5) cannot start a row of four, so only the in-row three is found.
        let run = detector.detect(&wrapped_four).expect("run");
        assert_eq!(run.indices, vec![idx(6, 5), idx(6, 6), idx(6, 7)]);
    }

    #[test]
    fn four_beats_overlapping_three_on_same_axis() {
        let detector = MatchDetector::new(WIDTH);
        let board = board_with(&[idx(5, 0), idx(5, 1), idx(5, 2), idx(5, 3)]);

        let run = detector.detect(&board).expect("run");

        assert_eq!(run.indices, vec![idx(5, 0), idx(5, 1), idx(5, 2), idx(5, 3)]);
    }

    #[test]
    fn column_four_beats_row_four_and_earlier_three() {
        let detector = MatchDetector::new(WIDTH);
        let mut planted = vec![idx(0, 0), idx(0, 1), idx(0, 2)];
        planted.extend([idx(4, 1), idx(4, 2), idx(4, 3), idx(4, 4)]);
        planted.extend([idx(2, 6), idx(3, 6), idx(4, 6), idx(5, 6)]);
        let board = board_with(&planted);

        let run = detector.detect(&board).expect("run");

        assert_eq!(run.axis, Axis::Column);
        assert_eq!(run.indices, vec![idx(2, 6), idx(3, 6), idx(4, 6), idx(5, 6)]);
    }

    #[test]
    fn column_three_beats_row_three() {
        let detector = MatchDetector::new(WIDTH);
        let mut planted = vec![idx(1, 0), idx(1, 1), idx(1, 2)];
        planted.extend([idx(5, 7), idx(6, 7), idx(7, 7)]);
        let board = board_with(&planted);

        let run = detector.detect(&board).expect("run");

        assert_eq!(run.axis, Axis::Column);
        assert_eq!(run.indices, vec![idx(5, 7), idx(6, 7), idx(7, 7)]);
    }

    #[test]
    fn lowest_start_wins_within_a_pass() {
        let detector = MatchDetector::new(WIDTH);
        let board = board_with(&[
            idx(6, 0),
            idx(6, 1),
            idx(6, 2),
            idx(1, 4),
            idx(1, 5),
            idx(1, 6),
        ]);

        let run = detector.detect(&board).expect("run");

        assert_eq!(run.indices[0], idx(1, 4));
    }

    #[test]
    fn empty_cells_never_match() {
        let detector = MatchDetector::new(WIDTH);
        let mut cells = quiet_cells();
        for col in 0..4 {
            cells[idx(3, col)] = None;
        }
        for row in 0..4 {
            cells[idx(row, 7)] = None;
        }
        let board = Board::from_cells(WIDTH, 6, cells).expect("valid board");

        assert_eq!(detector.detect(&board), None);
    }

    #[test]
    fn excluded_row_starts_follow_width() {
        let three = excluded_row_starts(WIDTH, 3);
        let four = excluded_row_starts(WIDTH, 4);

        let excluded_three: Vec<usize> = (0..64).filter(|&i| three[i]).collect();
        let excluded_four: Vec<usize> = (0..64).filter(|&i| four[i]).collect();

        assert_eq!(excluded_three.len(), 16);
        assert!(excluded_three.contains(&6) && excluded_three.contains(&63));
        assert_eq!(excluded_four.len(), 24);
        assert!(excluded_four.contains(&61));
        assert!(!excluded_four.contains(&60));
    }

    #[test]
    fn detector_adapts_to_board_width() {
        let detector = MatchDetector::new(WIDTH);
        let t = |v: u8| Some(Token::new(v));
        #[rustfmt::skip]
        let cells = vec![
            t(0), t(1), t(2), t(3), t(4),
            t(1), t(2), t(3), t(4), t(0),
            t(2), t(3), t(4), t(0), t(1),
            t(3), t(4), t(0), t(1), t(2),
            t(5), t(5), t(5), t(2), t(3),
        ];
        let board = Board::from_cells(5, 6, cells).expect("valid board");

        let run = detector.detect(&board).expect("run");

        assert_eq!(run.indices, vec![20, 21, 22]);
    }
}
