use serde::Serialize;

/// Public game state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    pub width: u8,
    /// Row-major cells: 0=empty, n=token n-1.
    pub board: Vec<u8>,
    /// CRC32 of `board`; unchanged value means nothing to redraw.
    pub board_crc: u32,
    pub score: u64,
    /// Cell currently being dragged, if a gesture is in progress.
    pub dragged: Option<u8>,
    /// Cell currently targeted by the gesture.
    pub target: Option<u8>,
    /// Contract:
    /// - `true` from drag start until the gesture is released or cancelled.
    /// - Ambient ticks are suppressed while `true`.
    pub gesture_active: bool,
    /// Cells emptied by the most recent resolution, in clearing order.
    pub last_cleared: Vec<u8>,
}

/// Result of a swap attempt, committed or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapOutcome {
    pub accepted: bool,
    pub score_delta: u32,
    /// Contract:
    /// - `None` when `accepted` is `true`.
    /// - One of `missing_source`, `missing_destination`, `out_of_bounds`,
    ///   `not_adjacent`, `no_match` otherwise.
    pub rejection: Option<&'static str>,
    pub state: GameState,
}
