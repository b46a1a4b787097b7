//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logging backend
//! - Wall-clock time for seed derivation
//! - JS bindings for the frame scheduler and UI (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod web;

use chrono::{DateTime, Utc};

/// Install the logging backend for the current platform.
///
/// Safe to call more than once; later calls are ignored.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Install the logging backend for the current platform.
///
/// Safe to call more than once; later calls are ignored.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Current UTC time as seen by the host
#[cfg(target_arch = "wasm32")]
pub fn now_utc() -> DateTime<Utc> {
    let millis = js_sys::Date::now() as i64;
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

/// Current UTC time as seen by the host
#[cfg(not(target_arch = "wasm32"))]
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}
