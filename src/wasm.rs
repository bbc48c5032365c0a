use tracing::debug;
use wasm_bindgen::prelude::*;

use crate::ai;
use crate::board::Board;
use crate::config::{self, EngineConfig};
use crate::game::Match;
use crate::types::{COLUMNS, Cell, Color, GameSnapshot, Position, ROWS};

pub const ENGINE_NAME: &str = "IA-DVG";

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}

#[wasm_bindgen]
pub fn engine_name() -> String {
    ENGINE_NAME.to_string()
}

/// Best move for the given grid as `[col, row]`, `[-1, -1]` when there is none.
/// A depth of zero or less returns `[-1, -1]`; depths above the maximum fail.
#[wasm_bindgen]
pub fn select_move(cells: JsValue, depth: i32, is_white: bool) -> Result<Vec<i32>, JsError> {
    let depth = config::search_depth(depth)?;
    let cells: [[Cell; ROWS]; COLUMNS] = serde_wasm_bindgen::from_value(cells)?;
    let best = ai::select_move(&Board::from_cells(cells), depth, Color::from_is_white(is_white));
    let (col, row) = Position::to_pair(best);
    Ok(vec![col, row])
}

/// Game handle owned by the browser shell.
#[wasm_bindgen]
pub struct WasmGame {
    inner: Match,
}

#[wasm_bindgen]
impl WasmGame {
    /// `config` may be `undefined` to use the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmGame, JsError> {
        let config = if config.is_undefined() || config.is_null() {
            EngineConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        Ok(Self {
            inner: Match::new_with_default_selector(config)?,
        })
    }

    pub fn new_game(&mut self) {
        self.inner.new_game();
    }

    pub fn play_move(&mut self, col: i32, row: i32, is_white: bool) -> bool {
        match self
            .inner
            .play_move(col, row, Color::from_is_white(is_white))
        {
            Ok(_) => true,
            Err(err) => {
                debug!(%err, "move rejected");
                false
            }
        }
    }

    /// Passes for the side to move; `false` while it still has a legal move.
    pub fn pass(&mut self) -> bool {
        match self.inner.pass() {
            Ok(()) => true,
            Err(err) => {
                debug!(%err, "pass rejected");
                false
            }
        }
    }

    pub fn is_playable(&self, col: i32, row: i32, is_white: bool) -> bool {
        self.inner
            .game()
            .is_playable(col, row, Color::from_is_white(is_white))
    }

    /// Lets the engine answer; returns the list of moves it played.
    pub fn engine_move(&mut self) -> Result<JsValue, JsError> {
        let outcomes = self.inner.play_engine_turns()?;
        Ok(serde_wasm_bindgen::to_value(&outcomes)?)
    }

    pub fn is_engine_turn(&self) -> bool {
        self.inner.is_engine_turn()
    }

    /// Column-major grid of `"empty" | "white" | "black"`.
    pub fn board(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(self.inner.game().board().cells())?)
    }

    pub fn playable_cells(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(self.inner.game().playable_cells())?)
    }

    pub fn is_over(&self) -> bool {
        self.inner.game().is_over()
    }

    pub fn white_turn(&self) -> bool {
        self.inner.game().white_turn()
    }

    pub fn score(&self, is_white: bool) -> u8 {
        self.inner.game().score(Color::from_is_white(is_white))
    }

    pub fn result(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.game().to_game_result())?)
    }

    pub fn snapshot(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.game().snapshot())?)
    }

    pub fn restore(&mut self, snapshot: JsValue) -> Result<(), JsError> {
        let snapshot: GameSnapshot = serde_wasm_bindgen::from_value(snapshot)?;
        self.inner.restore(&snapshot)?;
        Ok(())
    }
}
