//! Platform abstraction layer
//!
//! Handles browser/native differences for logging setup. Storage lives in
//! [`crate::persistence`].

/// Install the log backend for this target
///
/// Browser: panics and log records go to the devtools console.
/// Native: `env_logger`, `info` unless `RUST_LOG` says otherwise.
/// Calling it twice is harmless.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("Logger already initialized");
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let initialized = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .try_init();
    if initialized.is_err() {
        log::debug!("Logger already initialized");
    }
}
