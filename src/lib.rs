// ==================== Modules ====================
#[macro_use]
mod browser;
mod engine;
mod entity;
mod game;

// ==================== Imports ====================
use engine::GameLoop;
use game::SummonerArena;
use wasm_bindgen::prelude::*;

// ==================== Main Functions ====================
/// Main entry for the WebAssembly module
/// - installs the panic hook for readable stack traces
/// - hands the game to the loop; the loop owns it from here on
#[wasm_bindgen]
pub fn main_js() -> Result<(), JsValue> {
    // setup better panic messages for debugging
    console_error_panic_hook::set_once();

    browser::spawn_local(async move {
        GameLoop::start(SummonerArena::new())
            .await
            .expect("Could not start game loop");
    });

    Ok(())
}
