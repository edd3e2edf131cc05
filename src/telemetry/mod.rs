// Simulated telemetry: initial generation and per-tick updates

mod generator;
mod updater;

pub use generator::{
    generate_alerts, generate_devices, generate_efficiency_history, generate_suggestions,
    DeviceTemplate, DEVICE_TEMPLATES, LOCATIONS, STATUS_PATTERN,
};
pub use updater::{
    next_efficiency_sample, next_reading, push_bounded, update_device, update_devices,
    DEFAULT_SCORE,
};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Random source used by the store
///
/// Generation and update functions take any `rand::Rng`, so tests can pass a
/// seeded `StdRng` and get reproducible output.
pub type SimRng = StdRng;

/// Build the store's random source, seeded when a seed is configured
pub fn seeded_rng(seed: Option<u64>) -> SimRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Clamp `value` into `[min, max]`
pub(crate) fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Round to two decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
