//! Logging initialization

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable.
///
/// # Example
/// ```
/// sward::core::logging::init();
/// log::info!("Grass loader started");
/// ```
pub fn init() {
    // try_init so binaries and doctests can both call it
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).try_init();
}
