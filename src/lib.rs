/// Aura - personal dashboard Chrome extension
/// Built with Rust + WASM + Yew

pub mod bounded_list;
pub mod cache;
pub mod presets;
pub mod propagation;
pub mod quote;
pub mod settings;
pub mod store;
pub mod ui;
pub mod wallpaper;
pub mod weather;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export hex normalization for JavaScript access
#[wasm_bindgen]
pub fn normalize_hex(input: &str) -> Option<String> {
    settings::normalize_hex_color(input)
}

// Start the Yew app for the new tab page
#[wasm_bindgen]
pub fn start_newtab() {
    yew::Renderer::<ui::newtab::App>::new().render();
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}
