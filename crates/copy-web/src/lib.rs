pub mod app;
pub mod components;
pub mod config;
pub mod controller;
pub mod error;
pub mod host;
pub mod pages;

#[cfg(feature = "hydrate")]
pub mod web;

#[cfg(test)]
mod fake_host;

/// wasm entry point, called by the Leptos hydration script once the module loads.
///
/// The page is static server-rendered markup and is not hydrated by Leptos;
/// the only client behaviour is the copy controller bound here.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    web::init_on_ready();
}
