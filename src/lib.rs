// ==================== Imports ====================
use wasm_bindgen::prelude::*;

pub mod browser;
pub mod engine;
pub mod game;
pub mod input;
pub mod sprite;

use engine::GameLoop;
use game::Platformer;

// TABLE:
// ┌───────────────────┬──────────────────────────────────────────────────┐
// │ Module            │ Role                                             │
// ├───────────────────┼──────────────────────────────────────────────────┤
// │ lib.rs            │ wasm entry, logging, panic hook                  │
// │ browser.rs        │ thin web-sys access (window, canvas, events)     │
// │ engine/           │ game loop, renderer, keyboard, body, animator    │
// │ input/            │ custom channel, aggregator, on-screen controls   │
// │ sprite/           │ skin × motion animation table                    │
// │ game/             │ play scene, character state machine, config      │
// └───────────────────┴──────────────────────────────────────────────────┘

// ==================== Main Functions ====================
/// Main entry for Webassembly module, called by the page once the module
/// is instantiated
/// - installs panic hook + console logger
/// - starts the game loop once assets are loaded
#[wasm_bindgen]
pub fn main_js() -> Result<(), JsValue> {
    // better panic messages in the console
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    if let Err(err) = console_log::init_with_level(level) {
        web_sys::console::warn_1(&format!("Logger already set : {}", err).into());
    }

    browser::spawn_local(async move {
        if let Err(err) = GameLoop::start(Platformer::new()).await {
            log::error!("Could not start game : {:#?}", err);
        }
    });

    Ok(())
}
