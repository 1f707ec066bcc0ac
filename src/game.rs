use tracing::instrument;
use web_time::Instant;

use crate::board::Board;
use crate::config::GameConfig;
use crate::error::EngineError;
use crate::resolve::{Resolution, Rules, resolve};
use crate::rng::{SeededTokenSource, TokenSource};
use crate::swap::{Gesture, SwapResult, SwapVerdict, try_swap};
use crate::ticker::AmbientTicker;
use crate::types::{GameState, SwapOutcome};

/// One play session: the live board and score plus the gesture in flight.
///
/// The session serializes the two stimuli the shell produces. Ambient ticks
/// are ignored from drag start until the gesture is released or cancelled.
pub struct GameInstance {
    config: GameConfig,
    rules: Rules,
    board: Board,
    pub score: u64,
    gesture: Gesture,
    ticker: AmbientTicker,
    last_cleared: Vec<u8>,
    tokens: Box<dyn TokenSource>,
}

impl GameInstance {
    pub fn new(config: GameConfig, mut tokens: Box<dyn TokenSource>) -> Result<Self, EngineError> {
        config.validate()?;
        let board = Board::random(config.width, config.palette_size, tokens.as_mut())?;
        Ok(Self {
            rules: Rules::from_config(&config),
            board,
            score: 0,
            gesture: Gesture::Idle,
            ticker: AmbientTicker::new(config.tick_interval()),
            last_cleared: Vec::new(),
            tokens,
            config,
        })
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, EngineError> {
        Self::new(config, Box::new(SeededTokenSource::new(seed)))
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Deals a fresh random board and zeroes the score.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        self.board = Board::random(
            self.config.width,
            self.config.palette_size,
            self.tokens.as_mut(),
        )?;
        self.score = 0;
        self.gesture = Gesture::Idle;
        self.ticker.reset();
        self.last_cleared.clear();
        Ok(())
    }

    /// Ambient tick. Resolves the board when no gesture is in progress and
    /// the tick interval has elapsed; returns the points scored if it ran.
    pub fn tick(&mut self, now: Instant) -> Option<u32> {
        if !self.gesture.is_idle() || !self.ticker.due(now) {
            return None;
        }
        Some(self.resolve_now())
    }

    /// Resolves the live board to a fixed point regardless of the ticker.
    pub fn resolve_now(&mut self) -> u32 {
        let resolution = resolve(&self.board, &self.rules, self.tokens.as_mut());
        let delta = resolution.score_delta;
        self.commit(resolution);
        delta
    }

    pub fn begin_drag(&mut self, index: usize) {
        self.gesture.begin(index);
    }

    /// Drag-over hover or drop: captures or replaces the destination.
    pub fn target(&mut self, index: usize) {
        self.gesture.target(index);
    }

    pub fn cancel(&mut self) {
        self.gesture.cancel();
    }

    /// Ends a mouse gesture and applies the captured swap if it matches.
    #[instrument(skip(self), fields(gesture = ?self.gesture))]
    pub fn release(&mut self) -> SwapOutcome {
        let result = self
            .gesture
            .release(&self.board, &self.rules, self.tokens.as_mut());
        self.apply(result)
    }

    /// Ends a touch gesture, inferring the destination from the drag delta.
    #[instrument(skip(self), fields(gesture = ?self.gesture))]
    pub fn release_toward(&mut self, dx: f64, dy: f64) -> SwapOutcome {
        let result = self.gesture.release_toward(
            &self.board,
            dx,
            dy,
            self.config.swipe_threshold,
            &self.rules,
            self.tokens.as_mut(),
        );
        self.apply(result)
    }

    /// Attempts a swap outright, abandoning any gesture in progress.
    #[instrument(skip(self))]
    pub fn try_swap(&mut self, from: usize, to: usize) -> SwapOutcome {
        self.gesture.cancel();
        let result = try_swap(&self.board, from, to, &self.rules, self.tokens.as_mut());
        self.apply(result)
    }

    pub fn to_game_state(&self) -> GameState {
        GameState {
            width: self.config.width as u8,
            board: self.board.to_array(),
            board_crc: self.board.digest(),
            score: self.score,
            dragged: self.gesture.source().and_then(to_u8),
            target: self.gesture.destination().and_then(to_u8),
            gesture_active: !self.gesture.is_idle(),
            last_cleared: self.last_cleared.clone(),
        }
    }

    fn apply(&mut self, result: SwapResult) -> SwapOutcome {
        let score_delta = result.score_delta;
        let rejection = result.rejection();
        match result.verdict {
            SwapVerdict::Committed(resolution) => {
                tracing::debug!(score_delta, runs = resolution.runs.len(), "swap committed");
                self.commit(resolution);
            }
            SwapVerdict::Rejected(reason) => {
                tracing::debug!(%reason, "swap rejected");
            }
        }

        SwapOutcome {
            accepted: rejection.is_none(),
            score_delta,
            rejection: rejection.map(|reason| reason.as_str()),
            state: self.to_game_state(),
        }
    }

    fn commit(&mut self, resolution: Resolution) {
        self.score += u64::from(resolution.score_delta);
        self.last_cleared = resolution
            .runs
            .iter()
            .flat_map(|run| run.indices.iter().copied())
            .filter_map(to_u8)
            .collect();
        self.board = resolution.board;
    }

    #[cfg(test)]
    fn set_board_for_test(&mut self, board: Board) {
        self.board = board;
        self.gesture = Gesture::Idle;
        self.last_cleared.clear();
    }
}

fn to_u8(index: usize) -> Option<u8> {
    u8::try_from(index).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, Token};
    use crate::rng::ScriptedTokenSource;
    use web_time::Duration;

    const WIDTH: usize = 8;
    const PLANT: u8 = 5;

    fn idx(row: usize, col: usize) -> usize {
        row * WIDTH + col
    }

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

    /// Same layout the swap tests use: (2,2) down into (3,2) makes a row of four.
    fn one_move_board() -> Board {
        board_with(&[idx(3, 0), idx(3, 1), idx(3, 3), idx(2, 2)])
    }

    fn game_with(board: Board) -> GameInstance {
        let mut game = GameInstance::with_seed(GameConfig::default(), 1).expect("valid config");
        game.set_board_for_test(board);
        game
    }

    #[test]
    fn initial_state_is_correct() {
        let game = GameInstance::with_seed(GameConfig::default(), 42).expect("valid config");
        let state = game.to_game_state();

        assert_eq!(state.width, 8);
        assert_eq!(state.board.len(), 64);
        assert!(state.board.iter().all(|&v| (1..=6).contains(&v)));
        assert_eq!(state.board_crc, crc32fast::hash(&state.board));
        assert_eq!(state.score, 0);
        assert_eq!(state.dragged, None);
        assert!(!state.gesture_active);
        assert!(state.last_cleared.is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = GameConfig {
            palette_size: 0,
            ..GameConfig::default()
        };

        let err = GameInstance::with_seed(config, 1).err();

        assert_eq!(err, Some(EngineError::InvalidPalette(0)));
    }

    #[test]
    fn drag_and_drop_commits_matching_swap() {
        let mut game = game_with(one_move_board());

        game.begin_drag(idx(2, 2));
        game.target(idx(3, 2));
        let state = game.to_game_state();
        assert_eq!(state.dragged, Some(idx(2, 2) as u8));
        assert_eq!(state.target, Some(idx(3, 2) as u8));
        assert!(state.gesture_active);

        let outcome = game.release();

        assert!(outcome.accepted);
        assert_eq!(outcome.rejection, None);
        assert!(outcome.score_delta >= 4);
        assert_eq!(game.score, u64::from(outcome.score_delta));
        assert_eq!(&outcome.state.last_cleared[..4], &[24, 25, 26, 27]);
        assert!(!outcome.state.gesture_active);
    }

    #[test]
    fn rejected_drop_leaves_board_and_score() {
        let board = one_move_board();
        let mut game = game_with(board.clone());

        game.begin_drag(idx(6, 6));
        game.target(idx(6, 7));
        let outcome = game.release();

        assert!(!outcome.accepted);
        assert_eq!(outcome.rejection, Some("no_match"));
        assert_eq!(game.board(), &board);
        assert_eq!(game.score, 0);
        assert!(game.gesture().is_idle());
    }

    #[test]
    fn right_edge_swipe_is_out_of_bounds() {
        let board = one_move_board();
        let mut game = game_with(board.clone());

        game.begin_drag(WIDTH - 1);
        let outcome = game.release_toward(40.0, 2.0);

        assert_eq!(outcome.rejection, Some("out_of_bounds"));
        assert_eq!(game.board(), &board);
    }

    #[test]
    fn direct_swap_to_next_row_start_is_not_adjacent() {
        let board = one_move_board();
        let mut game = game_with(board.clone());

        let outcome = game.try_swap(WIDTH - 1, WIDTH);

        assert_eq!(outcome.rejection, Some("not_adjacent"));
        assert_eq!(game.board(), &board);
    }

    #[test]
    fn ambient_tick_is_suppressed_during_gesture() {
        let board = board_with(&[idx(5, 0), idx(5, 1), idx(5, 2)]);
        let mut game = game_with(board.clone());
        let now = Instant::now();

        game.begin_drag(idx(0, 0));
        assert_eq!(game.tick(now), None);
        assert_eq!(game.board(), &board);

        game.cancel();
        let delta = game.tick(now).expect("tick runs once idle");
        assert!(delta >= 3);
        assert_eq!(game.score, u64::from(delta));
        assert_ne!(game.board(), &board);
    }

    #[test]
    fn ambient_tick_respects_interval() {
        let mut game = game_with(board_with(&[]));
        let now = Instant::now();

        assert_eq!(game.tick(now), Some(0));
        assert_eq!(game.tick(now + Duration::from_millis(50)), None);
        assert_eq!(game.tick(now + Duration::from_millis(100)), Some(0));
    }

    #[test]
    fn reset_deals_new_board_and_zeroes_score() {
        let mut game = GameInstance::new(
            GameConfig::default(),
            Box::new(ScriptedTokenSource::new(vec![0, 1, 2, 3, 4, 5, 1])),
        )
        .expect("valid config");
        game.score = 12;
        game.begin_drag(3);
        let before = game.board().clone();

        game.reset().expect("validated config");

        assert_eq!(game.score, 0);
        assert!(game.gesture().is_idle());
        assert!(game.board().is_full());
        assert_ne!(game.board(), &before);
    }
}
