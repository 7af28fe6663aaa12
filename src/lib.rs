//! Dots & Boxes mini app board client.
//!
//! The bot opens the mini app with the game state packed into the location
//! fragment. This crate decodes it, draws the board as SVG, and sends the
//! chosen line back through the host bridge. Rules, scoring and turn order are
//! decided by the bot; nothing here mutates the game.

use wasm_bindgen::prelude::*;

pub mod board;
pub mod bridge;
pub mod config;
pub mod error;
pub mod fragment;
pub mod session;
pub mod state;

pub use board::layout::{BoardLayout, box_count, line_count};
pub use board::scene::{BoardScene, SceneOptions};
pub use board::status::{StatusMessage, StatusView};
pub use bridge::{HostBridge, TelegramBridge, ThemeParams};
pub use config::{BoardConfig, Palette};
pub use error::{BridgeError, DecodeError, LoadError, MoveError, StartupError};
pub use session::{BoardSession, MoveAction, MoveIntent, Phase, load_board};
pub use state::{GameState, Owner, Player, PlayerId, RoomCode, Seat};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Entry point called by the host page once the SVG shell is in the DOM.
#[wasm_bindgen]
pub fn start_board() -> Result<(), JsValue> {
    board::start_board_mode(BoardConfig::default())
}

/// Same as [`start_board`], with element ids / colours overridden by a JSON
/// object (see [`BoardConfig`]).
#[wasm_bindgen]
pub fn start_board_with_config(config_json: &str) -> Result<(), JsValue> {
    let config = BoardConfig::from_json(config_json)
        .map_err(|e| JsValue::from_str(&format!("invalid board config: {e}")))?;
    board::start_board_mode(config)
}
