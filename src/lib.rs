//! # banter
//!
//! A small chat front end with a swappable reply source, plus a standalone
//! proxy that forwards chat completions to a hosted provider.

pub mod ai;
pub mod session;
pub mod types;

#[cfg(feature = "ui")]
pub mod ui;
#[cfg(feature = "ui")]
pub mod views;

#[cfg(not(target_arch = "wasm32"))]
pub mod proxy;
