//! WebAssembly bindings for the tic-tac-toe engine.
//!
//! This module exposes the game controller to JavaScript through wasm-bindgen.
//! Indices are 0-8 and marks are passed as `"Cross"` / `"Circle"`.

use wasm_bindgen::prelude::*;

use crate::actions::GameInput;
use crate::board::Player;
use crate::game::GameController;
use crate::opponent::Difficulty;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed game wrapper
#[wasm_bindgen]
pub struct WasmGame {
    controller: GameController,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a new session. `difficulty` is "easy", "medium" or "hard".
    #[wasm_bindgen(constructor)]
    pub fn new(difficulty: &str) -> Result<WasmGame, JsValue> {
        let difficulty: Difficulty = difficulty
            .parse()
            .map_err(|e: String| JsValue::from_str(&e))?;
        let controller = GameController::with_difficulty(difficulty, None)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(WasmGame { controller })
    }

    /// Pick the human's mark; returns events JSON
    #[wasm_bindgen(js_name = chooseShape)]
    pub fn choose_shape(&mut self, shape: &str) -> Result<String, JsValue> {
        let player = match shape {
            "Cross" | "cross" | "X" => Player::Cross,
            "Circle" | "circle" | "O" => Player::Circle,
            other => return Err(JsValue::from_str(&format!("Unknown shape: {}", other))),
        };
        self.apply(GameInput::ChooseShape(player))
    }

    /// Select a cell; returns events JSON
    #[wasm_bindgen(js_name = selectCell)]
    pub fn select_cell(&mut self, index: usize) -> Result<String, JsValue> {
        self.apply(GameInput::SelectCell(index))
    }

    /// Move the hover preview; pass `undefined` when the pointer leaves the board
    #[wasm_bindgen(js_name = hoverCell)]
    pub fn hover_cell(&mut self, index: Option<usize>) -> Result<(), JsValue> {
        self.apply(GameInput::HoverCell(index)).map(|_| ())
    }

    /// Check if the game is finished
    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&self) -> bool {
        self.controller.is_finished()
    }

    /// Get the whole game as JSON (for rendering)
    #[wasm_bindgen(js_name = getSnapshot)]
    pub fn get_snapshot(&self) -> String {
        serde_json::to_string(&self.controller.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Get the current phase as JSON
    #[wasm_bindgen(js_name = getPhase)]
    pub fn get_phase(&self) -> String {
        serde_json::to_string(&self.controller.phase())
            .unwrap_or_else(|_| "\"Unknown\"".to_string())
    }

    /// Start over with a fresh board
    pub fn restart(&mut self) {
        self.controller.restart();
    }
}

impl WasmGame {
    fn apply(&mut self, input: GameInput) -> Result<String, JsValue> {
        match self.controller.handle(input) {
            Ok(events) => Ok(serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())),
            Err(e) => Err(JsValue::from_str(&format!("Input rejected: {}", e))),
        }
    }
}
