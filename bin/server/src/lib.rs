//! Storefront web shell and identity gateway.
//!
//! This crate provides the Leptos-based storefront UI. Every screen is
//! wrapped in a route guard that asks the server, through the `check_route`
//! server function, whether the viewer may open it. On the server the
//! viewer's cookie is relayed to the identity service, so the browser only
//! ever talks to this origin.

#![allow(non_snake_case)]

pub mod app;
pub mod guard;
pub mod pages;
pub mod session;

#[cfg(feature = "ssr")]
pub mod config;
#[cfg(feature = "ssr")]
pub mod error;
#[cfg(feature = "ssr")]
pub mod state;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::App;
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
