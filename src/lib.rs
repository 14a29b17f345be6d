//! Square Drag core crate.
//!
//! A timed drag game on a 2D canvas: press, drag out a rectangle before the
//! countdown runs out, release. Each drag that passes the rule is scored for
//! how square it is; after the configured number of rounds the scores go to
//! the result server and the page moves on to the ranking.
//!
//! The game core (`context`, `game`, `render`) is plain Rust and runs under
//! `cargo test` on the host. The browser shell lives in `web` and is only
//! compiled for `wasm32`.

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod game;
pub mod geometry;
pub mod render;

#[cfg(target_arch = "wasm32")]
mod web;

pub use config::GameConfig;
pub use context::{ContextEvent, Cue, GameContext, GameState, RoundOutcome};
pub use error::GameError;
pub use game::{Game, GameBuilder, Host, SessionId, Ticket};
pub use geometry::{Point, ScoreTier};
pub use render::Surface;

#[cfg(target_arch = "wasm32")]
pub use web::{BrowserHost, CanvasSurface};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// Entrypoints
// -----------------------------------------------------------------------------

/// Starts the game on `#canvas` with default settings.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::launch(GameConfig::default()).map_err(Into::into)
}

/// Starts the game with a (possibly partial) JSON `GameConfig`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json)?;
    web::launch(config).map_err(Into::into)
}

/// Tears down listeners, timers and the frame loop.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn stop_game() {
    web::shutdown();
}
