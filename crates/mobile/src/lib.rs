use std::sync::Once;

mod hunt;
mod logging;
mod records;

pub use hunt::TreasureHunt;
pub use records::{
    HuntConfig, HuntPhase, HuntSnapshot, LatLng, LocationFailure, PositionInput, Recording,
    TreasureHuntError,
};

uniffi::setup_scaffolding!();

/// Initialize the library with proper panic handling
/// Call this once at startup from Kotlin/Swift
#[uniffi::export]
pub fn init_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        eprintln!("=== RUST PANIC ===");
        eprintln!("{panic_info}");
        eprintln!("Backtrace:\n{backtrace}");
        eprintln!("=== END PANIC ===");
    }));
}

/// Route `tracing` output to logcat on Android and to stderr elsewhere.
/// Only the first call has an effect.
#[uniffi::export]
pub fn init_logging(verbose: bool) {
    static LOGGING_SETUP: Once = Once::new();

    LOGGING_SETUP.call_once(|| logging::setup(verbose));
}

/// Names of the shapes that ship with the game, for a shape picker.
#[uniffi::export]
pub fn builtin_shape_names() -> Vec<String> {
    treasure_hunt_core::ShapeRegistry::builtin()
        .names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}
