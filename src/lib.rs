use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;
use web_sys::console;
use web_time::Instant;

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod gravity;
pub mod matcher;
pub mod resolve;
pub mod rng;
pub mod swap;
pub mod ticker;
pub mod types;

pub use board::{Board, Cell, Direction, Token};
pub use config::GameConfig;
pub use error::EngineError;
pub use game::GameInstance;
pub use matcher::{Axis, MatchDetector, Run};
pub use resolve::{Resolution, Rules, clear, resolve};
pub use rng::{ScriptedTokenSource, SeededTokenSource, TokenSource};
pub use swap::{Gesture, Rejection, SwapResult, SwapVerdict, try_swap};

static SESSION: Lazy<Mutex<Option<GameInstance>>> = Lazy::new(|| Mutex::new(None));

#[wasm_bindgen(start)]
pub fn bootstrap() {
    console_error_panic_hook::set_once();
}

fn log(msg: &str) {
    console::log_1(&JsValue::from_str(msg));
}

fn lock_session() -> MutexGuard<'static, Option<GameInstance>> {
    SESSION
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn with_session<T>(f: impl FnOnce(&mut GameInstance) -> T) -> Result<T, JsValue> {
    let mut session = lock_session();
    let game = session.as_mut().ok_or_else(|| js_error(EngineError::NoSession))?;
    Ok(f(game))
}

fn js_error(err: EngineError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    to_value(value).map_err(Into::into)
}

#[wasm_bindgen(js_name = wasmReady)]
pub fn wasm_ready() -> bool {
    true
}

/// Starts a new session, replacing any previous one.
/// `config` may be `undefined` or a partial `GameConfig` object.
#[wasm_bindgen(js_name = newGame)]
pub fn new_game(config: JsValue, seed: u32) -> Result<JsValue, JsValue> {
    let config: GameConfig = if config.is_undefined() || config.is_null() {
        GameConfig::default()
    } else {
        from_value(config)?
    };
    let game = GameInstance::with_seed(config, u64::from(seed)).map_err(js_error)?;
    log(&format!(
        "[match3] new {0}x{0} board, {1} colors, seed {2}",
        game.config().width,
        game.config().palette_size,
        seed
    ));
    let state = game.to_game_state();
    *lock_session() = Some(game);
    to_js(&state)
}

#[wasm_bindgen(js_name = resetGame)]
pub fn reset_game() -> Result<JsValue, JsValue> {
    let state = with_session(|game| game.reset().map(|()| game.to_game_state()))?
        .map_err(js_error)?;
    to_js(&state)
}

#[wasm_bindgen(js_name = getState)]
pub fn get_state() -> Result<JsValue, JsValue> {
    to_js(&with_session(|game| game.to_game_state())?)
}

/// Ambient tick; call on a timer or every frame. No-op while dragging.
#[wasm_bindgen]
pub fn tick() -> Result<JsValue, JsValue> {
    let state = with_session(|game| {
        game.tick(Instant::now());
        game.to_game_state()
    })?;
    to_js(&state)
}

#[wasm_bindgen(js_name = dragStart)]
pub fn drag_start(index: u32) -> Result<(), JsValue> {
    with_session(|game| game.begin_drag(index as usize))
}

#[wasm_bindgen(js_name = dragOver)]
pub fn drag_over(index: u32) -> Result<(), JsValue> {
    with_session(|game| game.target(index as usize))
}

#[wasm_bindgen(js_name = dragDrop)]
pub fn drag_drop(index: u32) -> Result<(), JsValue> {
    with_session(|game| game.target(index as usize))
}

#[wasm_bindgen(js_name = dragEnd)]
pub fn drag_end() -> Result<JsValue, JsValue> {
    to_js(&with_session(|game| game.release())?)
}

/// Touch release; `dx`/`dy` is the pointer travel since `dragStart`.
#[wasm_bindgen(js_name = touchEnd)]
pub fn touch_end(dx: f64, dy: f64) -> Result<JsValue, JsValue> {
    to_js(&with_session(|game| game.release_toward(dx, dy))?)
}

#[wasm_bindgen(js_name = cancelDrag)]
pub fn cancel_drag() -> Result<(), JsValue> {
    with_session(|game| game.cancel())
}

#[wasm_bindgen(js_name = trySwap)]
pub fn try_swap_cells(from: u32, to: u32) -> Result<JsValue, JsValue> {
    to_js(&with_session(|game| game.try_swap(from as usize, to as usize))?)
}
