//! Browser boundary: a wasm-bindgen class wrapping one engine
//!
//! Event capture stays on the JavaScript side. The page forwards
//! `KeyboardEvent.code` values and clicks here and calls [`BlockfallGame::frame`]
//! from its requestAnimationFrame loop; the engine answers with JSON
//! snapshots for the canvas renderer.

use wasm_bindgen::prelude::*;

use crate::config::GameConfig;
use crate::engine::{Engine, FrameEvent, PlayingField};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
}

/// One game surface as seen from JavaScript
#[wasm_bindgen]
pub struct BlockfallGame {
    engine: Engine,
}

#[wasm_bindgen]
impl BlockfallGame {
    /// Fresh game seeded from the wall clock
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let seed = js_sys::Date::now() as u64;
        log::info!("Game initialized with seed: {seed}");
        Self::with_seed(seed)
    }

    /// Fresh game with a fixed seed, for reproducible sessions
    #[wasm_bindgen(js_name = withSeed)]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            engine: Engine::new(GameConfig::default(), seed).expect("default config is valid"),
        }
    }

    /// Fresh game from a JSON config override
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(json: &str, seed: u64) -> Result<BlockfallGame, JsError> {
        let config =
            GameConfig::from_json(json).map_err(|error| JsError::new(&error.to_string()))?;
        let engine = Engine::new(config, seed).map_err(|error| JsError::new(&error.to_string()))?;
        Ok(Self { engine })
    }

    /// Begin the run and return the first snapshot
    pub fn start(&mut self) -> String {
        render(false, &self.engine.start())
    }

    /// Forward a key code; true when the engine consumed it (the page should
    /// then preventDefault)
    pub fn key(&mut self, code: &str) -> bool {
        self.engine.handle_key(code)
    }

    /// Forward a click; after game over this starts the next run
    pub fn click(&mut self) -> Option<String> {
        self.engine.click().map(|field| render(false, &field))
    }

    /// Advance to the given `performance.now()` timestamp.
    ///
    /// None while idle, otherwise a snapshot whose game-over marker tells
    /// the page to switch to the terminal screen.
    pub fn frame(&mut self, now_ms: f64) -> Option<String> {
        match self.engine.frame(now_ms) {
            FrameEvent::Idle => None,
            FrameEvent::Running(field) => Some(render(false, &field)),
            FrameEvent::GameOver(field) => Some(render(true, &field)),
        }
    }
}

fn render(game_over: bool, field: &PlayingField) -> String {
    serde_json::json!({ "gameOver": game_over, "field": field }).to_string()
}
