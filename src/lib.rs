//! Pinyin Quiz core crate.
//!
//! Browser-side controller for the two-character pinyin quiz: the player types
//! the pinyin of the highlighted character, the server judges it, and this crate
//! reconciles hearts, score and character boxes with the server's reply.
//!
//! Everything except [`dom`] is plain Rust and runs under native `cargo test`.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod input;
pub mod logging;
pub mod protocol;

pub use config::{Config, InitialPage};
pub use controller::{BoxState, Followup, GameController, GameView, Request, Scheduled, Slot, WordProgress};
pub use error::ControllerError;
pub use protocol::{GameState, ServerResponse, Status, WordInfo};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init();
    if let Err(err) = dom::mount_when_ready() {
        log::error!("quiz controller not started: {err}");
    }
}

/// Mount the controller by hand (e.g. after injecting the game markup).
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    dom::mount().map(|_| ()).map_err(JsValue::from)
}
